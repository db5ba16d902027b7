//! Time-driven pulse animation for materialized markers.
//!
//! Every marker oscillates around its base size. Once the oscillation swells
//! past a pre-signal threshold its color starts blending towards a warning
//! color, reaching it fully at the signal threshold. Markers are created with
//! increasing phase delays so a path pulses as a travelling wave.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::MarkerStyle;

/// Size of a marker at `elapsed` seconds:
/// `base_size + amplitude * sin((elapsed - phase_delay) * 2π / period)`.
pub fn evaluate(
    elapsed: f32,
    base_size: f32,
    amplitude: f32,
    period: f32,
    phase_delay: f32,
) -> f32 {
    base_size + inflation(elapsed, amplitude, period, phase_delay)
}

/// Deviation from the base size at `elapsed` seconds; negative while the
/// marker is shrinking.
pub fn inflation(elapsed: f32, amplitude: f32, period: f32, phase_delay: f32) -> f32 {
    amplitude * ((elapsed - phase_delay) * TAU / period).sin()
}

/// Position of `inflation` between the two thresholds, as a ratio. The value
/// is unclamped; callers clamp before blending. Equal thresholds are a
/// configuration error rejected by [`crate::WayfinderConfig::validate`].
pub fn signal_strength(
    inflation: f32,
    pre_signal_threshold: f32,
    signal_threshold: f32,
) -> f32 {
    (inflation - pre_signal_threshold) / (signal_threshold - pre_signal_threshold)
}

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Blends towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// What a renderer should draw for one marker at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerVisual {
    pub size: f32,
    pub color: Color,
}

/// Per-marker pulse parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPulse {
    pub base_size: f32,
    pub amplitude: f32,
    pub period: f32,
    pub phase_delay: f32,
    pub pre_signal_threshold: f32,
    pub signal_threshold: f32,
    pub normal_color: Color,
    pub signal_color: Color,
}

impl MarkerPulse {
    /// Pulse for the marker with the given phase delay, styled by `style`.
    pub fn from_style(style: &MarkerStyle, phase_delay: f32) -> Self {
        Self {
            base_size: style.base_size,
            amplitude: style.amplitude,
            period: style.period,
            phase_delay,
            pre_signal_threshold: style.pre_signal_threshold,
            signal_threshold: style.signal_threshold,
            normal_color: style.normal_color,
            signal_color: style.signal_color,
        }
    }

    pub fn sample(&self, elapsed: f32) -> MarkerVisual {
        let swell = inflation(elapsed, self.amplitude, self.period, self.phase_delay);
        let strength = signal_strength(swell, self.pre_signal_threshold, self.signal_threshold);
        MarkerVisual {
            size: self.base_size + swell,
            color: self.normal_color.lerp(self.signal_color, strength),
        }
    }
}
