// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration, loadable from RON.

use crate::physics::CableParams;
use crate::registry::HitPolicy;
use crate::render::NeonStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A value is out of range
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Wiring engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    /// Port hit radius in screen units
    pub hit_radius: f32,
    /// Tie-break between ports inside the hit radius
    pub hit_policy: HitPolicy,
    /// Fixed physics step in seconds
    pub timestep: f32,
    /// Cap on physics steps run in a single frame
    pub max_steps_per_frame: u32,
    /// Committed cables
    pub panel_cable: CableParams,
    /// Cable following the pointer
    #[serde(with = "DragCableFields")]
    pub drag_cable: CableParams,
    /// Neon look
    pub style: NeonStyle,
}

/// `CableParams` as the drag cable reads it: missing fields come from the
/// drag preset rather than the panel one
#[derive(Serialize, Deserialize)]
#[serde(remote = "CableParams", default = "CableParams::drag_preview")]
struct DragCableFields {
    segments: usize,
    iterations: usize,
    gravity: f32,
    damping: f32,
    stiffness: f32,
    tension: f32,
}

impl Default for WiringConfig {
    fn default() -> Self {
        Self {
            hit_radius: 25.0,
            hit_policy: HitPolicy::Nearest,
            timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
            panel_cable: CableParams::panel(),
            drag_cable: CableParams::drag_preview(),
            style: NeonStyle::default(),
        }
    }
}

impl WiringConfig {
    /// Load and validate a RON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!("Loaded wiring config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            tracing::warn!("Rejected wiring config: {field} {reason}");
            Err(ConfigError::Invalid { field, reason })
        };

        if !is_positive(self.hit_radius) {
            return invalid("hit_radius", "must be positive");
        }
        if !is_positive(self.timestep) {
            return invalid("timestep", "must be positive");
        }
        if self.max_steps_per_frame == 0 {
            return invalid("max_steps_per_frame", "must be at least 1");
        }
        for (field, params) in [("panel_cable", &self.panel_cable), ("drag_cable", &self.drag_cable)] {
            if params.segments == 0 {
                return invalid(field, "segments must be at least 1");
            }
            if params.iterations == 0 {
                return invalid(field, "iterations must be at least 1");
            }
            if !is_positive(params.stiffness) || params.stiffness > 1.0 {
                return invalid(field, "stiffness must be in (0, 1]");
            }
            if !(0.0..=1.0).contains(&params.damping) {
                return invalid(field, "damping must be in [0, 1]");
            }
            if !(0.0..1.0).contains(&params.tension) {
                return invalid(field, "tension must be in [0, 1)");
            }
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
