//! Chart behaviour and rendering-surface parameters.
//!
//! Both structs are plain data read once when a chart is built. Every field has a default so a
//! data file only needs to list what it changes.

use crate::animation::{Easing, Timing};
use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Line height multiplier used when stacking wrapped label lines.
pub const LINE_SPACING: f64 = 1.2;
/// Estimated average glyph width, as a fraction of the font size.
pub const AVG_CHAR_WIDTH_FACTOR: f64 = 0.65;
/// Extra degrees added to each wedge's end angle to hide anti-aliasing seams.
pub const WEDGE_OVERLAP_DEGREES: f64 = 0.05;
/// Degrees around 12 and 6 o'clock where labels are centred instead of side-anchored.
pub const ANCHOR_TOLERANCE_DEGREES: f64 = 5.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("length factors must satisfy 0 < min <= max <= 1 (got min={min}, max={max})")]
    LengthFactorRange { min: f64, max: f64 },
    #[error("hover_max_length_factor must be >= 1 (got {0})")]
    HoverFactor(f64),
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    #[serde(default = "default_primary")]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: [
                "#beebdb", "#a5d6da", "#e5e3d6", "#588D91", "#EB7D7A", "#5D9AA3", "#DD5D5C",
                "#93BCC0", "#D99D98",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl ColorPalette {
    /// Palette used when the data file cannot be loaded.
    pub fn fallback() -> Self {
        Self {
            primary: default_primary(),
            secondary: [
                "#588D91", "#EB7D7A", "#5D9AA3", "#DD5D5C", "#93BCC0", "#D99D98",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

fn default_primary() -> Vec<String> {
    ["#75c9b9", "#2aa1b9", "#4c8e9a", "#f16867", "#094054"]
        .map(String::from)
        .to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Shortest wedge, as a fraction of the radial space outside the centre circle.
    pub min_length_factor: f64,
    pub max_length_factor: f64,
    /// Scale applied to the hovered item's label.
    pub label_hover_scale: f64,
    /// Scale applied to every other label while an item is hovered.
    pub text_shrink_scale: f64,
    /// Seconds.
    pub animation_duration: f64,
    pub colors: ColorPalette,
    /// Fixes the random length jitter and colour picks.
    pub seed: Option<u64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_length_factor: 0.4,
            max_length_factor: 1.0,
            label_hover_scale: 1.8,
            text_shrink_scale: 0.8,
            animation_duration: 0.33,
            colors: ColorPalette::default(),
            seed: None,
        }
    }
}

impl ChartConfig {
    pub fn fallback() -> Self {
        Self {
            colors: ColorPalette::fallback(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("min_length_factor", self.min_length_factor)?;
        require_positive("max_length_factor", self.max_length_factor)?;
        require_positive("label_hover_scale", self.label_hover_scale)?;
        require_positive("text_shrink_scale", self.text_shrink_scale)?;
        require_positive("animation_duration", self.animation_duration)?;
        if self.min_length_factor > self.max_length_factor || self.max_length_factor > 1.0 {
            return Err(ConfigError::LengthFactorRange {
                min: self.min_length_factor,
                max: self.max_length_factor,
            });
        }
        Ok(())
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.animation_duration).unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Side of the square drawing surface, in user units.
    pub surface_size: f64,
    /// Radius of the centre circle; wedges grow outwards from its edge.
    pub inner_radius: f64,
    pub center_color: Color,
    pub logo: Option<PathBuf>,
    pub logo_size_factor: f64,
    pub marker_radius: f64,
    /// Where along the wedge's span the marker sits (0 = start edge, 1 = end edge).
    pub marker_arc_offset_factor: f64,
    pub hover_max_length_factor: f64,
    pub shrink_scale: f64,
    pub label_offset: f64,
    pub font_size: f64,
    pub connector_color: Color,
    pub connector_width: f64,
    pub connector_dash: Vec<f64>,
    pub box_stroke: Color,
    pub box_stroke_width: f64,
    pub box_padding: f64,
    pub box_corner_radius: f64,
    pub box_max_width: f64,
    pub easing: Easing,
    /// Seconds the description panel takes to fade out before it is hidden.
    pub panel_fade: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            surface_size: 600.0,
            inner_radius: 60.0,
            center_color: Color::WHITE,
            logo: None,
            logo_size_factor: 0.6,
            marker_radius: 7.0,
            marker_arc_offset_factor: 0.8,
            hover_max_length_factor: 1.05,
            shrink_scale: 0.95,
            label_offset: 30.0,
            font_size: 12.0,
            connector_color: Color::rgb(0x77, 0x77, 0x77),
            connector_width: 1.0,
            connector_dash: vec![3.0, 3.0],
            box_stroke: Color::WHITE,
            box_stroke_width: 1.0,
            box_padding: 5.0,
            box_corner_radius: 3.0,
            box_max_width: 150.0,
            easing: Easing::EaseOut,
            panel_fade: 0.5,
        }
    }
}

impl ChartStyle {
    /// Checks the values that do not depend on the surface geometry.
    ///
    /// `inner_radius` and `surface_size` are checked together when the chart is laid out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("marker_radius", self.marker_radius)?;
        require_positive("font_size", self.font_size)?;
        require_positive("box_max_width", self.box_max_width)?;
        require_positive("shrink_scale", self.shrink_scale)?;
        require_positive("panel_fade", self.panel_fade)?;
        if !(self.hover_max_length_factor.is_finite() && self.hover_max_length_factor >= 1.0) {
            return Err(ConfigError::HoverFactor(self.hover_max_length_factor));
        }
        Ok(())
    }

    pub fn panel_fade(&self) -> Duration {
        Duration::try_from_secs_f64(self.panel_fade).unwrap_or(Duration::ZERO)
    }

    pub fn timing(&self, config: &ChartConfig) -> Timing {
        Timing::new(config.animation_duration(), self.easing)
    }
}
