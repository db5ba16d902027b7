use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Color, Result, WayfinderError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WayfinderConfig {
    pub navigation: NavigationConfig,
    pub input: InputConfig,
    pub marker: MarkerStyle,
}

impl WayfinderConfig {
    /// Parses and validates a JSON configuration document. Missing fields take
    /// their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        check_range(
            "navigation.loading_distance",
            self.navigation.loading_distance,
            0.1,
            50.0,
        )?;
        check_range("input.touch_latency", self.input.touch_latency, 0.01, 1.0)?;
        check_range(
            "input.max_interaction_distance",
            self.input.max_interaction_distance,
            0.1,
            50.0,
        )?;

        let marker = &self.marker;
        if !(marker.period > 0.0) {
            return Err(WayfinderError::invalid_argument(
                "marker.period must be positive",
            ));
        }
        if !(marker.wave_delay_step >= 0.0) {
            return Err(WayfinderError::invalid_argument(
                "marker.wave_delay_step must not be negative",
            ));
        }
        if marker.signal_threshold == marker.pre_signal_threshold {
            return Err(WayfinderError::invalid_argument(
                "marker.signal_threshold must differ from marker.pre_signal_threshold",
            ));
        }
        Ok(())
    }
}

/// Proximity settings for indication mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// A waypoint is materialized once the viewpoint is closer than this.
    pub loading_distance: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            loading_distance: 5.0,
        }
    }
}

/// Touch handling while authoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Seconds to wait after the last press before acting, so multi-finger
    /// taps are recognised as one gesture.
    pub touch_latency: f32,
    /// Reach of the erase gesture when picking an existing marker.
    pub max_interaction_distance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            touch_latency: 0.05,
            max_interaction_distance: 5.0,
        }
    }
}

/// Visual style shared by every materialized marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub base_size: f32,
    pub amplitude: f32,
    pub period: f32,
    /// Extra phase delay given to each successive marker.
    pub wave_delay_step: f32,
    pub pre_signal_threshold: f32,
    pub signal_threshold: f32,
    pub normal_color: Color,
    pub signal_color: Color,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            base_size: 1.0,
            amplitude: 0.1,
            period: 1.0,
            wave_delay_step: 0.2,
            pre_signal_threshold: 0.05,
            signal_threshold: 0.1,
            normal_color: Color::WHITE,
            signal_color: Color::RED,
        }
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(WayfinderError::invalid_argument(format!(
            "{name} must be within [{min}, {max}], got {value}"
        )))
    }
}
