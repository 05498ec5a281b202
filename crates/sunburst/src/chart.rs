//! Chart construction: items and parameters in, resting wedge and label geometry out.
//!
//! Construction runs once per data document. Invalid surface parameters abort it; a single bad
//! item (non-finite length, unparseable colour, degenerate outline) is logged and left out, so
//! the chart shows one wedge fewer instead of nothing.

use crate::color::Color;
use crate::config::{ChartConfig, ChartStyle, ConfigError, WEDGE_OVERLAP_DEGREES};
use crate::data::{ChartData, Item};
use crate::distribute::distribute;
use crate::geometry::{
    self, PathData, Point, Rect, connector_start, curved_connector, polar_to_cartesian,
    wedge_path,
};
use crate::text::{
    LabelLayout, LabelMetrics, MeasuredLabel, TextAnchor, TextMeasurer, measure_label, place_box,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("surface size must be a positive finite number (got {0})")]
    SurfaceSize(f64),
    #[error("inner radius must be a finite number >= 0 (got {0})")]
    InnerRadius(f64),
    #[error(
        "no radial space left for wedges: inner radius {inner_radius} must be less than half of surface size {surface_size}"
    )]
    NoRadialSpace { inner_radius: f64, surface_size: f64 },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Resting geometry of one wedge.
#[derive(Debug, Clone, PartialEq)]
pub struct WedgeGeometry {
    /// Position of the item in the input list. Angles derive from it, so a skipped item leaves
    /// a gap.
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub length_factor: f64,
    pub outer_radius: f64,
    pub color: Color,
    pub path_data: PathData,
    pub marker_angle: f64,
    pub marker_pos: Point,
    pub item: Item,
}

impl WedgeGeometry {
    pub fn mid_angle(&self) -> f64 {
        geometry::mid_angle(self.start_angle, self.end_angle)
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Outline and marker of a wedge drawn at some radius.
#[derive(Debug, Clone, PartialEq)]
pub struct WedgeShape {
    pub path: PathData,
    pub marker: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub surface_size: f64,
    pub center: Point,
    pub inner_radius: f64,
    pub available_space: f64,
    /// Outer radius of the hovered wedge.
    pub hover_radius: f64,
    /// Outer radius shared by every other wedge while one is hovered.
    pub shrunk_radius: f64,
    pub marker_radius: f64,
    pub angle_per_wedge: f64,
    pub wedges: Vec<WedgeGeometry>,
    /// Parallel to `wedges`.
    pub labels: Vec<LabelLayout>,
    pub metrics: Option<LabelMetrics>,
    pub logo: Option<Rect>,
    pub palette_exhausted: bool,
}

struct Pending {
    wedge: WedgeGeometry,
    anchor_point: Point,
    anchor: TextAnchor,
    measured: MeasuredLabel,
}

fn check_surface(style: &ChartStyle) -> Result<(f64, f64), LayoutError> {
    let size = style.surface_size;
    if !(size.is_finite() && size > 0.0) {
        return Err(LayoutError::SurfaceSize(size));
    }
    let inner = style.inner_radius;
    if !(inner.is_finite() && inner >= 0.0) {
        return Err(LayoutError::InnerRadius(inner));
    }
    let space = size / 2.0 - inner;
    if space <= 0.0 {
        return Err(LayoutError::NoRadialSpace {
            inner_radius: inner,
            surface_size: size,
        });
    }
    Ok((size / 2.0, space))
}

impl ChartLayout {
    /// Lays out `items` around the circle.
    pub fn build<R: Rng + ?Sized>(
        items: &[Item],
        config: &ChartConfig,
        style: &ChartStyle,
        measurer: &dyn TextMeasurer,
        rng: &mut R,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        style.validate()?;
        let (half, space) = check_surface(style)?;
        let center = Point::new(half, half);
        let inner = style.inner_radius;

        let logo = style.logo.as_ref().map(|_| {
            let diameter = inner * 2.0 * style.logo_size_factor;
            Rect::centered(center, diameter, diameter)
        });

        let mut layout = Self {
            surface_size: style.surface_size,
            center,
            inner_radius: inner,
            available_space: space,
            hover_radius: inner + space * style.hover_max_length_factor,
            shrunk_radius: inner + space * config.min_length_factor * style.shrink_scale,
            marker_radius: style.marker_radius,
            angle_per_wedge: 0.0,
            wedges: Vec::new(),
            labels: Vec::new(),
            metrics: None,
            logo,
            palette_exhausted: false,
        };

        if items.is_empty() {
            log::warn!("No items to display");
            return Ok(layout);
        }

        let n = items.len();
        let dist = distribute(n, config, rng);
        if dist.palette_exhausted {
            log::warn!("Palette is empty, every wedge uses the fallback color");
        }
        layout.palette_exhausted = dist.palette_exhausted;
        layout.angle_per_wedge = 360.0 / n as f64;

        // Labels sit outside the longest possible resting wedge.
        let label_radius = inner + space + style.label_offset;

        let mut pending: Vec<Pending> = Vec::with_capacity(n);
        for (index, item) in items.iter().enumerate() {
            let Some(wedge) =
                layout.resting_wedge(index, item, &dist.length_factors, &dist.colors, style)
            else {
                continue;
            };
            let mid = wedge.start_angle + layout.angle_per_wedge / 2.0;
            pending.push(Pending {
                anchor_point: polar_to_cartesian(center, label_radius, mid),
                anchor: TextAnchor::for_angle(mid),
                measured: measure_label(item.name.as_str(), style, measurer),
                wedge,
            });
        }

        let measured: Vec<MeasuredLabel> = pending.iter().map(|p| p.measured.clone()).collect();
        let metrics = LabelMetrics::shared(&measured, style);
        log::debug!(
            "Label boxes: width={} line height={}",
            metrics.box_width,
            metrics.line_height
        );

        for p in pending {
            let height = metrics.box_height(p.measured.lines.len());
            let rect = place_box(p.anchor_point, p.anchor, metrics.box_width, height);
            layout.labels.push(LabelLayout {
                lines: p.measured.lines,
                rect,
                text_anchor: p.anchor,
                fill: p.wedge.color,
                text_color: p.wedge.color.contrast_text(),
            });
            layout.wedges.push(p.wedge);
        }
        layout.metrics = Some(metrics);

        log::info!("Laid out {} of {} items", layout.wedges.len(), n);
        Ok(layout)
    }

    /// Builds the layout of a loaded document, seeding the randomness from its `seed` if set.
    pub fn from_data(data: &ChartData, measurer: &dyn TextMeasurer) -> Result<Self, LayoutError> {
        let mut rng = match data.chart.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(&data.items, &data.chart, &data.style, measurer, &mut rng)
    }

    fn resting_wedge(
        &self,
        index: usize,
        item: &Item,
        factors: &[f64],
        colors: &[String],
        style: &ChartStyle,
    ) -> Option<WedgeGeometry> {
        let name = &item.name;
        let length_factor = match factors.get(index) {
            Some(f) if f.is_finite() => *f,
            other => {
                log::warn!("Invalid length factor {other:?} for item {index} '{name}', skipping");
                return None;
            }
        };
        let color = match colors.get(index).map(|c| c.parse::<Color>()) {
            Some(Ok(color)) => color,
            Some(Err(e)) => {
                log::warn!("Item {index} '{name}': {e}, skipping");
                return None;
            }
            None => {
                log::warn!("Missing color for item {index} '{name}', skipping");
                return None;
            }
        };

        let start_angle = index as f64 * self.angle_per_wedge;
        let end_angle = start_angle + self.angle_per_wedge + WEDGE_OVERLAP_DEGREES;
        let outer_radius = self.inner_radius + self.available_space * length_factor;
        let path_data = wedge_path(self.center, outer_radius, start_angle, end_angle);
        if !outer_radius.is_finite() || path_data.is_fallback() {
            log::warn!("Degenerate outline for item {index} '{name}', skipping");
            return None;
        }

        let marker_angle = start_angle + self.angle_per_wedge * style.marker_arc_offset_factor;
        let marker_pos = polar_to_cartesian(self.center, outer_radius, marker_angle);

        Some(WedgeGeometry {
            index,
            start_angle,
            end_angle,
            length_factor,
            outer_radius,
            color,
            path_data,
            marker_angle,
            marker_pos,
            item: item.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.wedges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wedges.is_empty()
    }

    /// Outline and marker of wedge `pos` with its outer edge at `radius`.
    pub fn shape_at(&self, pos: usize, radius: f64) -> Option<WedgeShape> {
        let wedge = self.wedges.get(pos)?;
        Some(WedgeShape {
            path: wedge_path(self.center, radius, wedge.start_angle, wedge.end_angle),
            marker: polar_to_cartesian(self.center, radius, wedge.marker_angle),
        })
    }

    /// Connector of label `pos` when its marker sits at `marker`.
    pub fn connector(&self, pos: usize, marker: Point) -> Option<PathData> {
        let label = self.labels.get(pos)?;
        let start = connector_start(self.center, marker, self.marker_radius);
        Some(curved_connector(start, label.box_center()))
    }

    /// Angle of `point` around the centre, clockwise from 12 o'clock, in `[0, 360)`.
    pub fn angle_of(&self, point: Point) -> f64 {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        dx.atan2(-dy).to_degrees().rem_euclid(360.0)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.wedges
            .iter()
            .position(|w| w.item.name.as_str() == name)
    }
}
