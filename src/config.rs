//! Viewer tunables.
//! Defaults match the shipped frame set; a page may override any subset through an
//! inline `<script id="viewer-config" type="application/json">` block.

use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::JsCast;

pub const CONFIG_ELEMENT_ID: &str = "viewer-config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Number of frames in the rotation sequence (N).
    pub total_frames: u32,
    /// Frames advanced per pixel of horizontal drag.
    pub sensitivity: f64,
    /// Share of the remaining rotation distance covered each tick.
    pub lerp_factor: f64,
    /// Velocity multiplier applied once per tick while coasting.
    pub momentum_decay: f64,
    /// Velocities below this magnitude snap to zero.
    pub min_velocity: f64,
    /// Fraction of a drag step carried over as velocity.
    pub drag_velocity_factor: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_sensitivity: f64,
    /// Share of the remaining zoom distance covered each tick.
    pub zoom_ease: f64,
    pub asset_dir: String,
    pub asset_extension: String,
    /// Zero padding width of the frame number in asset paths.
    pub frame_digits: usize,
    /// Pause between the last frame settling and hiding the loading overlay.
    pub reveal_delay_ms: i32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            total_frames: 150,
            sensitivity: 0.3,
            lerp_factor: 0.2,
            momentum_decay: 0.85,
            min_velocity: 0.01,
            drag_velocity_factor: 0.3,
            min_zoom: 1.0,
            max_zoom: 3.0,
            zoom_sensitivity: 0.001,
            zoom_ease: 0.1,
            asset_dir: "images".to_string(),
            asset_extension: "jpg".to_string(),
            frame_digits: 4,
            reveal_delay_ms: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The JSON block could not be parsed
    Parse(String),
    /// A field holds a value the simulation cannot work with
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid config field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: ViewerConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_frames == 0 {
            return Err(invalid("total_frames", "must be at least 1"));
        }
        let rates = [
            ("sensitivity", self.sensitivity),
            ("min_velocity", self.min_velocity),
            ("drag_velocity_factor", self.drag_velocity_factor),
            ("zoom_sensitivity", self.zoom_sensitivity),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a finite non-negative number"));
            }
        }
        // easing shares must lie in (0, 1] for a tick to converge
        for (field, value) in [("lerp_factor", self.lerp_factor), ("zoom_ease", self.zoom_ease)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(field, "must be in (0, 1]"));
            }
        }
        if !(0.0..1.0).contains(&self.momentum_decay) {
            return Err(invalid("momentum_decay", "must be in [0, 1)"));
        }
        if !self.min_zoom.is_finite() || self.min_zoom <= 0.0 {
            return Err(invalid("min_zoom", "must be a finite positive number"));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.min_zoom {
            return Err(invalid("max_zoom", "must be finite and not below min_zoom"));
        }
        if self.reveal_delay_ms < 0 {
            return Err(invalid("reveal_delay_ms", "must not be negative"));
        }
        Ok(())
    }

    /// Reads the inline config block from the page, falling back to defaults.
    pub fn load_from_document() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.dyn_into::<web_sys::HtmlScriptElement>().ok())
            .and_then(|script| script.text().ok());
        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(cfg) => {
                    log::debug!("viewer config loaded: {} frames", cfg.total_frames);
                    cfg
                }
                Err(e) => {
                    log::warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ViewerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let cfg = ViewerConfig::from_json(r#"{ "total_frames": 36, "max_zoom": 4.0 }"#).unwrap();
        assert_eq!(cfg.total_frames, 36);
        assert_eq!(cfg.max_zoom, 4.0);
        assert_eq!(cfg.sensitivity, 0.3);
        assert_eq!(cfg.asset_dir, "images");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ViewerConfig::from_json("{ total_frames: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let err = ViewerConfig::from_json(r#"{ "min_zoom": 2.0, "max_zoom": 1.5 }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "max_zoom",
                reason: "must be finite and not below min_zoom"
            }
        );
    }

    #[test]
    fn zero_frames_and_runaway_decay_are_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "total_frames": 0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "momentum_decay": 1.0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "lerp_factor": -0.2 }"#).is_err());
    }

    #[test]
    fn easing_shares_must_converge() {
        for raw in [
            r#"{ "lerp_factor": 2.0 }"#,
            r#"{ "lerp_factor": 0.0 }"#,
            r#"{ "zoom_ease": 2.0 }"#,
            r#"{ "zoom_ease": 0.0 }"#,
        ] {
            let err = ViewerConfig::from_json(raw).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    reason: "must be in (0, 1]",
                    ..
                }
            ));
        }
        let full = ViewerConfig::from_json(r#"{ "lerp_factor": 1.0, "zoom_ease": 1.0 }"#).unwrap();
        let mut motion = crate::model::MotionState::new(&full);
        motion.nudge_target(30.0);
        motion.set_target_zoom(2.0);
        motion.tick(crate::model::TickContext::default());
        assert!(motion.is_settled());
    }

    #[test]
    fn error_messages_name_the_field() {
        let msg = invalid("zoom_ease", "must be a finite non-negative number").to_string();
        assert!(msg.contains("zoom_ease"));
    }
}
