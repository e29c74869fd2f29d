//! # Wire Format
//!
//! The game transports drawing over a socket.io channel. A line is the event
//! `["drawcmd", 0, [x1, y1, x2, y2, erase, -thickness, color, 0, 0, {}]]`,
//! sent as a text frame with the `42` event prefix.

use glam::Vec2;
use serde_json::{Value, json};

use crate::color::Color;
use crate::render::DrawCommand;

pub const EVENT_NAME: &str = "drawcmd";
pub const FRAME_PREFIX: &str = "42";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    #[error("payload is not a drawcmd event")]
    NotDrawCommand,
    #[error("drawcmd arguments are malformed: {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Color(#[from] crate::color::ColorParseError),
}

/// Coordinates travel as plain decimals; trimming the f32 -> f64 noise keeps
/// frames short while preserving sub-pixel offsets.
fn wire_number(x: f32) -> f64 {
    (x as f64 * 1e8).round() / 1e8
}

/// Builds the event array for one command.
pub fn payload(cmd: &DrawCommand) -> Value {
    json!([
        EVENT_NAME,
        0,
        [
            wire_number(cmd.start.x),
            wire_number(cmd.start.y),
            wire_number(cmd.end.x),
            wire_number(cmd.end.y),
            cmd.erase,
            -wire_number(cmd.thickness),
            cmd.color.to_string(),
            0,
            0,
            {}
        ]
    ])
}

/// Encodes one command as a complete socket text frame.
pub fn encode_frame(cmd: &DrawCommand) -> String {
    format!("{}{}", FRAME_PREFIX, payload(cmd))
}

/// Parses an event array produced by [`payload`] (or by an external exporter).
pub fn decode_payload(value: &Value) -> Result<DrawCommand, WireError> {
    let event = value.as_array().ok_or(WireError::NotDrawCommand)?;
    if event.first().and_then(Value::as_str) != Some(EVENT_NAME) {
        return Err(WireError::NotDrawCommand);
    }
    let args = event
        .get(2)
        .and_then(Value::as_array)
        .ok_or(WireError::Malformed("missing argument list"))?;
    if args.len() < 7 {
        return Err(WireError::Malformed("too few arguments"));
    }

    let number = |idx: usize| -> Result<f32, WireError> {
        args[idx]
            .as_f64()
            .map(|v| v as f32)
            .ok_or(WireError::Malformed("coordinate is not a number"))
    };

    let erase = args[4]
        .as_bool()
        .ok_or(WireError::Malformed("erase flag is not a boolean"))?;
    let color: Color = args[6]
        .as_str()
        .ok_or(WireError::Malformed("color is not a string"))?
        .parse()?;

    Ok(DrawCommand {
        start: Vec2::new(number(0)?, number(1)?),
        end: Vec2::new(number(2)?, number(3)?),
        color,
        thickness: number(5)?.abs(),
        erase,
    })
}
