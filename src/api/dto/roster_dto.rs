//! Roster DTOs for the read-only participant endpoint.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RosterEntry;

/// One joined participant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantDto {
    /// Connection identifier.
    pub connection_id: uuid::Uuid,
    /// Display name supplied on join.
    pub name: String,
}

impl From<&RosterEntry> for ParticipantDto {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            connection_id: *entry.connection_id().as_uuid(),
            name: entry.name().to_string(),
        }
    }
}

/// Response body for `GET /api/v1/roster`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterResponse {
    /// Joined participants in roster order.
    pub participants: Vec<ParticipantDto>,
    /// Number of joined participants.
    pub count: usize,
}

impl From<&[RosterEntry]> for RosterResponse {
    fn from(roster: &[RosterEntry]) -> Self {
        let participants: Vec<ParticipantDto> = roster.iter().map(ParticipantDto::from).collect();
        Self {
            count: participants.len(),
            participants,
        }
    }
}
