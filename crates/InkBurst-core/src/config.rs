//! # Configuration
//!
//! Runtime knobs of a drawing session. Effect constants (counts, ratios) are
//! fixed in code; only pacing, the surface size and the random seed are
//! configurable.

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use stroke_canvas::Surface;

/// Delay used when the configured value is absent, negative or not a number.
pub const DEFAULT_DRAW_DELAY_MS: u64 = 10;

pub const ENV_DRAW_DELAY: &str = "INKBURST_DRAW_DELAY";
pub const ENV_SEED: &str = "INKBURST_SEED";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Pause after each replayed command or text pixel. Default: 10ms.
    #[serde(deserialize_with = "lenient_delay")]
    pub draw_delay_ms: u64,
    /// Pixel size of the remote surface. Default: 800x630.
    pub surface: Surface,
    /// Fixed seed for reproducible runs. Default: entropy.
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            draw_delay_ms: DEFAULT_DRAW_DELAY_MS,
            surface: Surface::default(),
            seed: None,
        }
    }
}

impl DrawConfig {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid drawing configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Applies `INKBURST_DRAW_DELAY` and `INKBURST_SEED` when they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_DRAW_DELAY) {
            self.draw_delay_ms = parse_draw_delay(Some(&raw));
        }
        if let Some(seed) = std::env::var(ENV_SEED)
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
        {
            self.seed = Some(seed);
        }
        self
    }
}

/// Parses a user-entered delay, falling back to the default for anything
/// that is not a non-negative integer.
pub fn parse_draw_delay(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(DEFAULT_DRAW_DELAY_MS)
}

fn lenient_delay<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_yaml::Value::Number(n) => n
            .as_i64()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_DRAW_DELAY_MS),
        serde_yaml::Value::String(s) => parse_draw_delay(Some(&s)),
        _ => DEFAULT_DRAW_DELAY_MS,
    })
}
