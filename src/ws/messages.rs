//! WebSocket wire format.
//!
//! Every text frame is a named event with an optional payload:
//!
//! ```json
//! { "event": "start-drawing", "data": { "x": 10, "y": 10, "color": "#000", "strokeWidth": 5 } }
//! ```
//!
//! Inbound names accept the short aliases (`join`, `strokeStart`,
//! `strokePoint`, `strokeEnd`, `clearAll`) as well. Outbound frames always
//! use the canonical names. Drawing payloads only have to be JSON objects;
//! they are forwarded byte for byte, whatever fields the client uses.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::domain::{ClientEvent, DrawingEvent, ServerEvent, StrokePayload};
use crate::error::RelayError;

/// Inbound WebSocket frame envelope.
#[derive(Debug, Deserialize)]
pub struct WireFrame {
    /// Event name.
    pub event: String,
    /// Event-specific payload, untouched; `None` when absent or `null`.
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

/// Outbound envelope, borrowing its payload.
#[derive(Serialize)]
struct OutboundFrame<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a RawValue>,
}

/// Join payload: `{"name": "Alice"}` or just `"Alice"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JoinPayload {
    Named { name: String },
    Bare(String),
}

impl JoinPayload {
    fn into_name(self) -> String {
        match self {
            Self::Named { name } | Self::Bare(name) => name,
        }
    }
}

/// Decodes a client text frame.
///
/// # Errors
///
/// Returns [`RelayError::MalformedFrame`] for invalid JSON, an unknown
/// event name, or a payload that does not fit the event.
pub fn decode_client_event(text: &str) -> Result<ClientEvent, RelayError> {
    let frame: WireFrame = serde_json::from_str(text)?;

    let event = match frame.event.as_str() {
        "join-server" | "join" => {
            let raw = required_data(frame.data, &frame.event)?;
            let payload: JoinPayload = serde_json::from_str(raw.get())?;
            ClientEvent::Join {
                name: payload.into_name(),
            }
        }
        "start-drawing" | "strokeStart" => {
            let raw = required_data(frame.data, &frame.event)?;
            ClientEvent::Drawing(DrawingEvent::StrokeStart(StrokePayload::new(raw)?))
        }
        "drawing" | "strokePoint" => {
            let raw = required_data(frame.data, &frame.event)?;
            ClientEvent::Drawing(DrawingEvent::StrokePoint(StrokePayload::new(raw)?))
        }
        "finish-drawing" | "strokeEnd" => ClientEvent::Drawing(DrawingEvent::StrokeEnd),
        "clear-canvas" | "clearAll" => ClientEvent::Drawing(DrawingEvent::ClearAll),
        other => return Err(RelayError::MalformedFrame(format!("unknown event `{other}`"))),
    };

    Ok(event)
}

fn required_data(data: Option<Box<RawValue>>, event: &str) -> Result<Box<RawValue>, RelayError> {
    data.ok_or_else(|| RelayError::MalformedFrame(format!("`{event}` requires data")))
}

/// Encodes a relay event as a text frame.
///
/// # Errors
///
/// Returns [`RelayError::MalformedFrame`] if the roster cannot be
/// serialized.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, RelayError> {
    let roster_json;
    let data = match event {
        ServerEvent::RosterUpdate(roster) => {
            roster_json = serde_json::value::to_raw_value(roster)?;
            Some(&*roster_json)
        }
        ServerEvent::Drawing(
            DrawingEvent::StrokeStart(payload) | DrawingEvent::StrokePoint(payload),
        ) => Some(payload.as_raw()),
        ServerEvent::Drawing(DrawingEvent::StrokeEnd | DrawingEvent::ClearAll) => None,
    };

    let frame = OutboundFrame {
        event: event.event_name(),
        data,
    };
    Ok(serde_json::to_string(&frame)?)
}
