//! # Engine Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! [gui]
//! screen_width = 1920
//! screen_height = 1080
//!
//! [camera]
//! near_clip = 0.1
//! far_clip = 5000.0
//! pitch_limit_degrees = 85.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GfxError, GfxResult};

/// Screen metrics used to resolve relative GUI coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Screen width in pixels.
    pub screen_width: u32,
    /// Screen height in pixels.
    pub screen_height: u32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280,
            screen_height: 720,
        }
    }
}

/// Defaults applied to new cameras and their behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Near clip distance.
    pub near_clip: f32,
    /// Far clip distance.
    pub far_clip: f32,
    /// Maximum absolute pitch for behaviors that clamp it.
    pub pitch_limit_degrees: f32,
    /// Lowest height an RTS camera may zoom to.
    pub rts_min_height: f32,
    /// Highest height an RTS camera may zoom to.
    pub rts_max_height: f32,
    /// Origin placement relative to the target for orbiting behaviors.
    pub default_relative_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near_clip: 0.1,
            far_clip: 1000.0,
            pitch_limit_degrees: 89.0,
            rts_min_height: 5.0,
            rts_max_height: 200.0,
            default_relative_position: [0.0, 3.0, -10.0],
        }
    }
}

/// Complete configuration for one GUI + scene context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// GUI settings.
    pub gui: GuiConfig,
    /// Camera settings.
    pub camera: CameraConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> GfxResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| GfxError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> GfxResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| GfxError::InvalidConfig(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loading engine config");
        Self::from_toml_str(&source)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> GfxResult<()> {
        if self.gui.screen_width == 0 || self.gui.screen_height == 0 {
            return Err(GfxError::InvalidConfig(format!(
                "screen size {}x{} must be positive",
                self.gui.screen_width, self.gui.screen_height
            )));
        }

        let cam = &self.camera;
        if cam.near_clip.is_nan() || cam.near_clip <= 0.0 {
            return Err(GfxError::InvalidConfig(format!(
                "near_clip {} must be positive",
                cam.near_clip
            )));
        }
        if cam.far_clip.is_nan() || cam.far_clip <= cam.near_clip {
            return Err(GfxError::InvalidConfig(format!(
                "far_clip {} must exceed near_clip {}",
                cam.far_clip, cam.near_clip
            )));
        }
        if !(0.0..90.0).contains(&cam.pitch_limit_degrees) {
            return Err(GfxError::InvalidConfig(format!(
                "pitch_limit_degrees {} must be in [0, 90)",
                cam.pitch_limit_degrees
            )));
        }
        if cam.rts_min_height > cam.rts_max_height {
            return Err(GfxError::InvalidConfig(format!(
                "rts_min_height {} exceeds rts_max_height {}",
                cam.rts_min_height, cam.rts_max_height
            )));
        }
        Ok(())
    }
}
