//! Events flowing through the relay.
//!
//! Inbound traffic decodes into [`ClientEvent`]; everything the relay fans
//! out is a [`ServerEvent`]. Drawing payloads are relayed untouched and carry
//! no session identity.

use serde_json::value::RawValue;

use super::RosterEntry;
use crate::error::RelayError;

/// Opaque JSON object carried by `start-drawing` and `drawing`.
///
/// Kept as the exact text the sender transmitted, so field names, number
/// formatting, and extra fields reach the other participants unchanged.
#[derive(Debug, Clone)]
pub struct StrokePayload(Box<RawValue>);

impl StrokePayload {
    /// Wraps a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedFrame`] if the value is not a JSON
    /// object.
    pub fn new(raw: Box<RawValue>) -> Result<Self, RelayError> {
        if raw.get().trim_start().starts_with('{') {
            Ok(Self(raw))
        } else {
            Err(RelayError::MalformedFrame(
                "drawing payload must be a JSON object".to_string(),
            ))
        }
    }

    /// Parses `json` as a payload.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedFrame`] if `json` is not valid JSON or
    /// not an object.
    pub fn from_json(json: &str) -> Result<Self, RelayError> {
        Self::new(RawValue::from_string(json.to_string())?)
    }

    /// The payload exactly as transmitted.
    #[must_use]
    pub fn as_raw(&self) -> &RawValue {
        &self.0
    }

    /// The payload text exactly as transmitted.
    #[must_use]
    pub fn as_json(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for StrokePayload {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

/// A drawing operation relayed broadcast-to-others.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingEvent {
    /// `start-drawing`: begins a new path (`x`, `y`, `color`, `strokeWidth`).
    StrokeStart(StrokePayload),
    /// `drawing`: extends the current path (`x`, `y`).
    StrokePoint(StrokePayload),
    /// `finish-drawing`
    StrokeEnd,
    /// `clear-canvas`
    ClearAll,
}

impl DrawingEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::StrokeStart(_) => "start-drawing",
            Self::StrokePoint(_) => "drawing",
            Self::StrokeEnd => "finish-drawing",
            Self::ClearAll => "clear-canvas",
        }
    }
}

/// Event received from a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Announce (or change) the participant's display name.
    Join {
        /// Requested display name, as sent.
        name: String,
    },
    /// A drawing operation.
    Drawing(DrawingEvent),
}

/// Event fanned out by the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Full current roster, sent broadcast-to-all.
    RosterUpdate(Vec<RosterEntry>),
    /// Drawing operation relayed from another participant.
    Drawing(DrawingEvent),
}

impl ServerEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::RosterUpdate(_) => "update-user-list",
            Self::Drawing(drawing) => drawing.event_name(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn payload_keeps_exact_text() {
        let text = r##"{"offsetX":10,"offsetY":12.50,"color":"#000","lineWidth":5,"tool":"pen"}"##;
        let Ok(payload) = StrokePayload::from_json(text) else {
            panic!("valid object rejected");
        };
        assert_eq!(payload.as_json(), text);
    }

    #[test]
    fn payload_must_be_an_object() {
        for text in ["[1,2]", "\"pen\"", "5", "null", "{broken"] {
            let Err(err) = StrokePayload::from_json(text) else {
                panic!("accepted non-object payload: {text}");
            };
            assert_eq!(err.kind(), "malformed_frame");
        }
    }

    #[test]
    fn event_names_match_wire_protocol() {
        assert_eq!(
            ServerEvent::RosterUpdate(Vec::new()).event_name(),
            "update-user-list"
        );
        assert_eq!(
            ServerEvent::Drawing(DrawingEvent::ClearAll).event_name(),
            "clear-canvas"
        );
        assert_eq!(DrawingEvent::StrokeEnd.event_name(), "finish-drawing");
        let Ok(point) = StrokePayload::from_json(r#"{"x":0,"y":0}"#) else {
            panic!("valid object rejected");
        };
        assert_eq!(DrawingEvent::StrokePoint(point).event_name(), "drawing");
    }
}
