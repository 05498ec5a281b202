//! Renderer-neutral snapshot of the scene at one instant.
//!
//! Produced by [`ChartState::frame`](crate::interaction::ChartState::frame) and consumed by the
//! SVG writer and the cairo front-end alike.

use crate::color::Color;
use crate::data::ItemName;
use crate::geometry::{PathData, Point, Rect};
use crate::interaction::WedgeState;
use crate::panel::PanelContent;
use crate::text::TextAnchor;

#[derive(Debug, Clone, PartialEq)]
pub struct WedgeFrame {
    pub index: usize,
    pub name: ItemName,
    pub state: WedgeState,
    pub color: Color,
    pub start_angle: f64,
    pub end_angle: f64,
    pub radius: f64,
    pub path: PathData,
    pub marker: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelFrame {
    pub lines: Vec<String>,
    /// Unscaled box; `scale` applies around its centre.
    pub rect: Rect,
    pub text_anchor: TextAnchor,
    pub fill: Color,
    pub text_color: Color,
    pub scale: f64,
    pub opacity: f64,
    pub connector: PathData,
    pub connector_start: Point,
    pub connector_control: Point,
    pub connector_end: Point,
    pub connector_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    pub content: PanelContent,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: f64,
    pub center: Point,
    pub inner_radius: f64,
    pub center_color: Color,
    pub logo: Option<Rect>,
    pub marker_radius: f64,
    pub wedges: Vec<WedgeFrame>,
    /// Parallel to `wedges`.
    pub labels: Vec<LabelFrame>,
    pub panel: Option<PanelFrame>,
}

impl Frame {
    /// Index into `wedges`/`labels` of the active wedge, if any.
    pub fn active(&self) -> Option<usize> {
        self.wedges.iter().position(|w| w.state == WedgeState::Active)
    }

    /// Labels in paint order: the active one last so it ends up on top.
    pub fn labels_in_paint_order(&self) -> impl Iterator<Item = &LabelFrame> {
        let active = self.active();
        self.labels
            .iter()
            .enumerate()
            .filter(move |(pos, _)| Some(*pos) != active)
            .chain(active.and_then(|pos| self.labels.get(pos).map(|l| (pos, l))))
            .map(|(_, label)| label)
    }
}
