use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::config::Surface;
use crate::render::DrawCommand;
use crate::wire::{self, WireError};

/// Rough per-command transmission time used for the draw time estimate.
const SECONDS_PER_COMMAND: f64 = 0.02;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read or write command batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("command batch is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("command #{index} is invalid: {source}")]
    Command {
        index: usize,
        #[source]
        source: WireError,
    },
}

/// Descriptive header of a saved batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    /// Where the commands came from (source image, effect name).
    #[serde(default, rename = "original_image", alias = "source")]
    pub source: Option<String>,
    #[serde(default)]
    pub canvas_width: u32,
    #[serde(default)]
    pub canvas_height: u32,
    #[serde(default)]
    pub total_commands: usize,
    /// Human readable estimate such as `"12s"`.
    #[serde(default)]
    pub estimated_draw_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// A serializable snapshot of a batch: metadata plus raw wire events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedBatch {
    pub metadata: BatchMetadata,
    pub commands: Vec<Value>,
}

/// An ordered list of commands that can be replayed later.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandBatch {
    pub metadata: BatchMetadata,
    pub commands: Vec<DrawCommand>,
}

impl CommandBatch {
    pub fn new(source: impl Into<String>, commands: Vec<DrawCommand>, surface: &Surface) -> Self {
        let total = commands.len();
        Self {
            metadata: BatchMetadata {
                source: Some(source.into()),
                canvas_width: surface.width.round() as u32,
                canvas_height: surface.height.round() as u32,
                total_commands: total,
                estimated_draw_time: format!("{}s", (total as f64 * SECONDS_PER_COMMAND).round()),
                generated_at: Some(Utc::now()),
            },
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Serializes the batch into a `SavedBatch` payload.
    pub fn save(&self) -> SavedBatch {
        SavedBatch {
            metadata: BatchMetadata {
                total_commands: self.commands.len(),
                ..self.metadata.clone()
            },
            commands: self.commands.iter().map(wire::payload).collect(),
        }
    }

    /// Rebuilds a batch from a `SavedBatch`, rejecting the first malformed command.
    pub fn load(saved: SavedBatch) -> Result<Self, BatchError> {
        let commands = saved
            .commands
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                wire::decode_payload(raw).map_err(|source| BatchError::Command { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            metadata: saved.metadata,
            commands,
        })
    }

    pub fn to_json(&self) -> Result<String, BatchError> {
        Ok(serde_json::to_string(&self.save())?)
    }

    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        Self::load(serde_json::from_str(json)?)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), BatchError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
