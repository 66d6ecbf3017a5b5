//! Rig Configuration
//!
//! All tuning for a character rig in one serde struct: locomotion, chase
//! camera, key bindings and update order. Every section has defaults, so a
//! config file only needs the values it changes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use escape_run_engine::config::RigConfig;
//!
//! let config = RigConfig::load("config/rig.json")?;
//! let rig = CharacterRig::new(&config, spawn_point, &world);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::camera::ChaseCameraConfig;
use crate::error::ConfigError;
use crate::frame::UpdateOrder;
use crate::input::{Binding, KeyBindings, default_bindings};
use crate::player::LocomotionConfig;

/// Input section: key layout and the starting cursor lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub bindings: Vec<Binding>,
    pub cursor_locked: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
            cursor_locked: true,
        }
    }
}

impl InputConfig {
    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings::from_bindings(&self.bindings)
    }
}

/// Complete rig configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub locomotion: LocomotionConfig,
    pub camera: ChaseCameraConfig,
    pub input: InputConfig,
    pub update_order: UpdateOrder,
}

impl RigConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(target: "config", path = %path.display(), "loaded rig config");
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.to_json()?).map_err(io_error)?;
        info!(target: "config", path = %path.display(), "saved rig config");
        Ok(())
    }

    /// Reject values the rig cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        positive("locomotion.walk_speed", loco.walk_speed)?;
        positive("locomotion.run_speed", loco.run_speed)?;
        positive("locomotion.crouch_speed", loco.crouch_speed)?;
        positive("locomotion.rotation_speed", loco.rotation_speed)?;
        positive("locomotion.roll_duration", loco.roll_duration)?;
        non_negative("locomotion.jump_height", loco.jump_height)?;
        non_negative("locomotion.roll_distance", loco.roll_distance)?;
        non_negative("locomotion.input_deadzone", loco.input_deadzone)?;
        if loco.gravity >= 0.0 || !loco.gravity.is_finite() {
            return Err(ConfigError::invalid("locomotion.gravity", "must be negative"));
        }
        if loco.grounded_velocity > 0.0 {
            return Err(ConfigError::invalid(
                "locomotion.grounded_velocity",
                "must not be positive",
            ));
        }
        positive("locomotion.shapes.standing.height", loco.shapes.standing.height)?;
        positive("locomotion.shapes.crouching.height", loco.shapes.crouching.height)?;

        let cam = &self.camera;
        positive("camera.min_distance", cam.min_distance)?;
        if cam.min_distance > cam.max_distance {
            return Err(ConfigError::invalid(
                "camera.min_distance",
                format!("{} exceeds max_distance {}", cam.min_distance, cam.max_distance),
            ));
        }
        if cam.min_pitch_deg > cam.max_pitch_deg {
            return Err(ConfigError::invalid(
                "camera.min_pitch_deg",
                format!("{} exceeds max_pitch_deg {}", cam.min_pitch_deg, cam.max_pitch_deg),
            ));
        }
        if cam.min_pitch_deg <= -90.0 || cam.max_pitch_deg >= 90.0 {
            return Err(ConfigError::invalid(
                "camera.max_pitch_deg",
                "pitch limits must stay inside (-90, 90)",
            ));
        }
        non_negative("camera.position_smoothing", cam.position_smoothing)?;
        non_negative("camera.rotation_smoothing", cam.rotation_smoothing)?;
        non_negative("camera.collision.radius", cam.collision.radius)?;
        non_negative("camera.collision.buffer", cam.collision.buffer)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must not be negative, got {value}")))
    }
}
