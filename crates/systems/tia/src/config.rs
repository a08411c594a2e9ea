//! Chip and display-sink configuration
//!
//! Loaded from JSON; every field is optional and falls back to the NTSC
//! defaults below.
//!
//! ```json
//! { "vblank_lines": 40, "wsync_resume_clock": 6, "frame_height": 192, "monochrome": false }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiaConfig {
    /// First scanline (after vertical sync) whose pixels reach the display sink
    pub vblank_lines: u32,
    /// Horizontal counter value at which a pending WSYNC releases the CPU
    pub wsync_resume_clock: u32,
    /// Rows in the software renderer's back buffer
    pub frame_height: u32,
    /// Render gray levels instead of hues
    pub monochrome: bool,
}

impl Default for TiaConfig {
    fn default() -> Self {
        Self {
            vblank_lines: 40,
            wsync_resume_clock: 6,
            frame_height: 192,
            monochrome: false,
        }
    }
}

impl TiaConfig {
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
