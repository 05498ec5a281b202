//! Hover state machine.
//!
//! The chart is either resting or has exactly one active wedge. Entering a wedge grows it to
//! the hover radius, pulls every other wedge in to one shared shrunk radius, enlarges the
//! active label and fades the rest. Leaving restores the resting geometry. Each transition
//! restarts the animations of every wedge it touches from wherever they currently are.
//!
//! Wedges are addressed by their position in [`ChartLayout::wedges`].

use crate::animation::{Animated, Timing};
use crate::chart::ChartLayout;
use crate::color::Color;
use crate::config::{ChartConfig, ChartStyle};
use crate::frame::{Frame, LabelFrame, PanelFrame, WedgeFrame};
use crate::geometry::{
    FALLBACK_WEDGE_PATH, PathData, Point, connector_control_point, connector_start,
    polar_to_cartesian,
};
use crate::panel::{DescriptionPanel, PanelContent, PanelSide};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Resting,
    Active(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WedgeState {
    Resting,
    Active,
    Inactive,
}

/// Outcome of a pointer event that changed the phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// Wedges whose in-flight animation was cut short.
    pub interrupted: Vec<usize>,
}

/// Targets for one wedge and its label.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    radius: f64,
    marker: Point,
    label_scale: f64,
    label_opacity: f64,
    connector_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct WedgeAnimation {
    radius: Animated<f64>,
    marker: Animated<Point>,
    label_scale: Animated<f64>,
    label_opacity: Animated<f64>,
    connector_opacity: Animated<f64>,
}

impl WedgeAnimation {
    fn at(pose: Pose) -> Self {
        Self {
            radius: Animated::new(pose.radius),
            marker: Animated::new(pose.marker),
            label_scale: Animated::new(pose.label_scale),
            label_opacity: Animated::new(pose.label_opacity),
            connector_opacity: Animated::new(pose.connector_opacity),
        }
    }

    /// Restarts every property towards `pose`. Returns whether anything was in flight.
    fn retarget(&mut self, pose: Pose, now: Duration, timing: Timing) -> bool {
        // Non-short-circuiting so every property is restarted.
        self.radius.animate_to(pose.radius, now, timing)
            | self.marker.animate_to(pose.marker, now, timing)
            | self.label_scale.animate_to(pose.label_scale, now, timing)
            | self.label_opacity.animate_to(pose.label_opacity, now, timing)
            | self.connector_opacity.animate_to(pose.connector_opacity, now, timing)
    }

    fn tick(&mut self, now: Duration) {
        self.radius.tick(now);
        self.marker.tick(now);
        self.label_scale.tick(now);
        self.label_opacity.tick(now);
        self.connector_opacity.tick(now);
    }

    fn finish(&mut self) {
        self.radius.finish();
        self.marker.finish();
        self.label_scale.finish();
        self.label_opacity.finish();
        self.connector_opacity.finish();
    }

    fn is_animating(&self) -> bool {
        self.radius.is_animating()
            || self.marker.is_animating()
            || self.label_scale.is_animating()
            || self.label_opacity.is_animating()
            || self.connector_opacity.is_animating()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    layout: ChartLayout,
    phase: Phase,
    wedges: Vec<WedgeAnimation>,
    panel: DescriptionPanel,
    timing: Timing,
    label_hover_scale: f64,
    text_shrink_scale: f64,
    center_color: Color,
}

impl ChartState {
    pub fn new(layout: ChartLayout, config: &ChartConfig, style: &ChartStyle) -> Self {
        let timing = style.timing(config);
        let panel = DescriptionPanel::new(Timing::new(style.panel_fade(), timing.easing));
        let mut state = Self {
            layout,
            phase: Phase::Resting,
            wedges: Vec::new(),
            panel,
            timing,
            label_hover_scale: config.label_hover_scale,
            text_shrink_scale: config.text_shrink_scale,
            center_color: style.center_color,
        };
        state.wedges = (0..state.layout.len())
            .map(|pos| WedgeAnimation::at(state.resting_pose(pos)))
            .collect();
        state
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn panel(&self) -> &DescriptionPanel {
        &self.panel
    }

    pub fn wedge_state(&self, pos: usize) -> WedgeState {
        match self.phase {
            Phase::Resting => WedgeState::Resting,
            Phase::Active(active) if active == pos => WedgeState::Active,
            Phase::Active(_) => WedgeState::Inactive,
        }
    }

    /// Current outer radius of wedge `pos`.
    pub fn radius(&self, pos: usize) -> Option<f64> {
        self.wedges.get(pos).map(|w| w.radius.value())
    }

    /// Outer radius wedge `pos` is heading to.
    pub fn target_radius(&self, pos: usize) -> Option<f64> {
        self.wedges.get(pos).map(|w| w.radius.target())
    }

    pub fn marker(&self, pos: usize) -> Option<Point> {
        self.wedges.get(pos).map(|w| w.marker.value())
    }

    fn resting_pose(&self, pos: usize) -> Pose {
        let wedge = &self.layout.wedges[pos];
        Pose {
            radius: wedge.outer_radius,
            marker: wedge.marker_pos,
            label_scale: 1.0,
            label_opacity: 1.0,
            connector_opacity: 1.0,
        }
    }

    fn pose_at(&self, pos: usize, radius: f64, label_scale: f64, opacity: f64) -> Pose {
        let wedge = &self.layout.wedges[pos];
        Pose {
            radius,
            marker: polar_to_cartesian(self.layout.center, radius, wedge.marker_angle),
            label_scale,
            label_opacity: opacity,
            connector_opacity: opacity,
        }
    }

    fn target_pose(&self, pos: usize, phase: Phase) -> Pose {
        match phase {
            Phase::Resting => self.resting_pose(pos),
            Phase::Active(active) if active == pos => {
                self.pose_at(pos, self.layout.hover_radius, self.label_hover_scale, 1.0)
            }
            Phase::Active(_) => {
                self.pose_at(pos, self.layout.shrunk_radius, self.text_shrink_scale, 0.0)
            }
        }
    }

    fn transition_to(&mut self, to: Phase, now: Duration) -> Transition {
        let from = self.phase;
        self.phase = to;
        let mut interrupted = Vec::new();
        for pos in 0..self.wedges.len() {
            let pose = self.target_pose(pos, to);
            if self.wedges[pos].retarget(pose, now, self.timing) {
                interrupted.push(pos);
            }
        }
        if !interrupted.is_empty() {
            log::debug!("Transition {from:?} -> {to:?} interrupted wedges {interrupted:?}");
        }
        Transition {
            from,
            to,
            interrupted,
        }
    }

    fn panel_content(&self, pos: usize) -> PanelContent {
        let wedge = &self.layout.wedges[pos];
        PanelContent {
            title: wedge.item.name.to_string(),
            body: wedge.item.description_or_default().to_string(),
            accent: wedge.color,
            side: PanelSide::opposite(wedge.mid_angle()),
        }
    }

    /// Pointer entered wedge `pos`.
    pub fn handle_pointer_enter(&mut self, pos: usize, now: Duration) -> Option<Transition> {
        if pos >= self.wedges.len() {
            log::warn!("Pointer enter on unknown wedge {pos}");
            return None;
        }
        let content = self.panel_content(pos);
        self.panel.show(content, now);
        Some(self.transition_to(Phase::Active(pos), now))
    }

    /// Pointer left wedge `pos`. Ignored unless `pos` is the active wedge.
    pub fn handle_pointer_leave(&mut self, pos: usize, now: Duration) -> Option<Transition> {
        if self.phase != Phase::Active(pos) {
            return None;
        }
        self.panel.hide(now);
        Some(self.transition_to(Phase::Resting, now))
    }

    /// Wedge under `point`: inside its angular span and its current radius (outside the centre
    /// circle), or inside its marker.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        if !point.is_finite() {
            return None;
        }
        let center = self.layout.center;
        let distance = center.distance(point);
        let angle = self.layout.angle_of(point);

        // Later wedges are drawn on top.
        (0..self.wedges.len()).rev().find(|&pos| {
            let anim = &self.wedges[pos];
            if anim.marker.value().distance(point) <= self.layout.marker_radius {
                return true;
            }
            let wedge = &self.layout.wedges[pos];
            distance >= self.layout.inner_radius
                && distance <= anim.radius.value()
                && (wedge.contains_angle(angle) || wedge.contains_angle(angle + 360.0))
        })
    }

    /// Translates pointer motion into leave/enter transitions.
    pub fn pointer_moved(&mut self, point: Point, now: Duration) -> Vec<Transition> {
        let hit = self.hit_test(point);
        let mut transitions = Vec::new();
        if let Phase::Active(active) = self.phase
            && hit != Some(active)
        {
            transitions.extend(self.handle_pointer_leave(active, now));
        }
        if let Some(pos) = hit
            && self.phase != Phase::Active(pos)
        {
            transitions.extend(self.handle_pointer_enter(pos, now));
        }
        transitions
    }

    /// Pointer left the chart surface.
    pub fn pointer_left(&mut self, now: Duration) -> Option<Transition> {
        match self.phase {
            Phase::Active(active) => self.handle_pointer_leave(active, now),
            Phase::Resting => None,
        }
    }

    pub fn tick(&mut self, now: Duration) {
        for w in &mut self.wedges {
            w.tick(now);
        }
        self.panel.tick(now);
    }

    /// Jumps every animation to its end state.
    pub fn settle(&mut self) {
        for w in &mut self.wedges {
            w.finish();
        }
        self.panel.settle();
    }

    pub fn is_animating(&self) -> bool {
        self.panel.is_animating() || self.wedges.iter().any(WedgeAnimation::is_animating)
    }

    /// Snapshot of the scene as it looks right now.
    pub fn frame(&self) -> Frame {
        let layout = &self.layout;
        let mut wedges = Vec::with_capacity(self.wedges.len());
        let mut labels = Vec::with_capacity(self.wedges.len());

        for (pos, anim) in self.wedges.iter().enumerate() {
            let geometry = &layout.wedges[pos];
            let radius = anim.radius.value();
            let marker = anim.marker.value();
            let path = layout
                .shape_at(pos, radius)
                .map(|s| s.path)
                .unwrap_or_else(|| geometry.path_data.clone());
            wedges.push(WedgeFrame {
                index: geometry.index,
                name: geometry.item.name.clone(),
                state: self.wedge_state(pos),
                color: geometry.color,
                start_angle: geometry.start_angle,
                end_angle: geometry.end_angle,
                radius,
                path,
                marker,
            });

            let label = &layout.labels[pos];
            let start = connector_start(layout.center, marker, layout.marker_radius);
            let end = label.box_center();
            labels.push(LabelFrame {
                lines: label.lines.clone(),
                rect: label.rect,
                text_anchor: label.text_anchor,
                fill: label.fill,
                text_color: label.text_color,
                scale: anim.label_scale.value(),
                opacity: anim.label_opacity.value(),
                connector: layout
                    .connector(pos, marker)
                    .unwrap_or_else(|| PathData::new(FALLBACK_WEDGE_PATH)),
                connector_start: start,
                connector_control: connector_control_point(start, end),
                connector_end: end,
                connector_opacity: anim.connector_opacity.value(),
            });
        }

        let panel = self
            .panel
            .content()
            .filter(|_| self.panel.is_visible())
            .map(|content| PanelFrame {
                content: content.clone(),
                opacity: self.panel.opacity(),
            });

        Frame {
            size: layout.surface_size,
            center: layout.center,
            inner_radius: layout.inner_radius,
            center_color: self.center_color,
            logo: layout.logo,
            marker_radius: layout.marker_radius,
            wedges,
            labels,
            panel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Item;
    use crate::text::EstimatingMeasurer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn state(n: usize) -> ChartState {
        let items: Vec<Item> = (1..=n)
            .map(|i| Item::named(format!("Service {i}")).with_description(format!("About {i}")))
            .collect();
        let config = ChartConfig::default();
        let style = ChartStyle::default();
        let mut rng = StdRng::seed_from_u64(3);
        let layout =
            ChartLayout::build(&items, &config, &style, &EstimatingMeasurer, &mut rng).unwrap();
        ChartState::new(layout, &config, &style)
    }

    #[test]
    fn test_starts_resting() {
        let s = state(7);
        assert_eq!(s.phase(), Phase::Resting);
        assert!(!s.is_animating());
        assert!(!s.panel().is_visible());
        for pos in 0..7 {
            assert_eq!(s.wedge_state(pos), WedgeState::Resting);
            assert_eq!(s.radius(pos), Some(s.layout().wedges[pos].outer_radius));
        }
    }

    #[test]
    fn test_enter_targets() {
        let mut s = state(7);
        let t = s.handle_pointer_enter(2, ms(0)).unwrap();
        assert_eq!(t.from, Phase::Resting);
        assert_eq!(t.to, Phase::Active(2));
        assert!(t.interrupted.is_empty());
        assert!(s.is_animating());

        s.tick(ms(1000));
        assert!(!s.is_animating());
        let layout = s.layout().clone();
        for pos in 0..7 {
            let r = s.radius(pos).unwrap();
            if pos == 2 {
                assert_eq!(s.wedge_state(pos), WedgeState::Active);
                assert_eq!(r, layout.hover_radius);
            } else {
                assert_eq!(s.wedge_state(pos), WedgeState::Inactive);
                assert_eq!(r, layout.shrunk_radius);
            }
        }

        let frame = s.frame();
        assert_eq!(frame.labels[2].scale, 1.8);
        assert_eq!(frame.labels[2].opacity, 1.0);
        assert_eq!(frame.labels[0].scale, 0.8);
        assert_eq!(frame.labels[0].opacity, 0.0);
        assert_eq!(frame.labels[0].connector_opacity, 0.0);

        let panel = frame.panel.unwrap();
        assert_eq!(panel.content.title, "Service 3");
        assert_eq!(panel.content.body, "About 3");
        assert_eq!(panel.content.accent, layout.wedges[2].color);
        // Mid-angle of wedge 2 of 7 is about 128 degrees.
        assert_eq!(panel.content.side, PanelSide::Left);
        assert_eq!(panel.opacity, 1.0);
    }

    #[test]
    fn test_enter_leave_restores_resting_frame_exactly() {
        let mut s = state(7);
        let before = s.frame();

        s.handle_pointer_enter(3, ms(0));
        s.tick(ms(100));
        s.tick(ms(400));
        s.handle_pointer_leave(3, ms(400));
        s.tick(ms(550));
        s.tick(ms(2000));

        assert!(!s.is_animating());
        assert_eq!(s.phase(), Phase::Resting);
        assert_eq!(s.frame(), before);
    }

    #[test]
    fn test_enter_cancels_in_flight_leave_of_other_wedge() {
        let mut s = state(7);
        s.handle_pointer_enter(5, ms(0));
        s.tick(ms(1000));
        s.handle_pointer_leave(5, ms(1000));
        s.tick(ms(1100));

        let mid_flight = s.radius(5).unwrap();
        let resting = s.layout().wedges[5].outer_radius;
        let hover = s.layout().hover_radius;
        assert!(mid_flight < hover && mid_flight > resting.min(hover));

        let t = s.handle_pointer_enter(3, ms(1100)).unwrap();
        assert_eq!(t.from, Phase::Resting);
        assert!(t.interrupted.contains(&5));
        assert_eq!(s.target_radius(5), Some(s.layout().shrunk_radius));

        // Continues from where the leave left it, straight towards the shrunk radius.
        assert_eq!(s.radius(5), Some(mid_flight));
        s.tick(ms(1150));
        let next = s.radius(5).unwrap();
        assert!(next < mid_flight);

        s.tick(ms(2000));
        assert_eq!(s.radius(5), Some(s.layout().shrunk_radius));
        assert_eq!(s.wedge_state(5), WedgeState::Inactive);
        assert_eq!(s.wedge_state(3), WedgeState::Active);
    }

    #[test]
    fn test_leave_of_inactive_wedge_is_ignored() {
        let mut s = state(4);
        assert!(s.handle_pointer_leave(1, ms(0)).is_none());
        s.handle_pointer_enter(1, ms(0));
        assert!(s.handle_pointer_leave(2, ms(10)).is_none());
        assert_eq!(s.phase(), Phase::Active(1));
        assert!(s.handle_pointer_enter(9, ms(10)).is_none());
    }

    #[test]
    fn test_pointer_motion() {
        let mut s = state(4);
        let center = s.layout().center;
        let inside_first = polar_to_cartesian(center, s.layout().inner_radius + 5.0, 45.0);
        let inside_third = polar_to_cartesian(center, s.layout().inner_radius + 5.0, 225.0);

        assert_eq!(s.hit_test(center), None);
        assert_eq!(s.hit_test(inside_first), Some(0));

        let t = s.pointer_moved(inside_first, ms(0));
        assert_eq!(t.len(), 1);
        assert_eq!(s.phase(), Phase::Active(0));
        assert!(s.pointer_moved(inside_first, ms(10)).is_empty());

        let t = s.pointer_moved(inside_third, ms(20));
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].to, Phase::Resting);
        assert_eq!(t[1].to, Phase::Active(2));

        let t = s.pointer_left(ms(30)).unwrap();
        assert_eq!(t.to, Phase::Resting);
        assert!(s.pointer_left(ms(40)).is_none());
    }

    #[test]
    fn test_marker_is_hit() {
        let s = state(4);
        let marker = s.marker(1).unwrap();
        assert_eq!(s.hit_test(Point::new(marker.x + 3.0, marker.y)), Some(1));
    }

    #[test]
    fn test_settle_reaches_targets() {
        let mut s = state(5);
        s.handle_pointer_enter(0, ms(0));
        s.settle();
        assert!(!s.is_animating());
        assert_eq!(s.radius(0), Some(s.layout().hover_radius));
        assert!(s.panel().is_visible());
    }

    #[test]
    fn test_empty_chart() {
        let mut s = state(0);
        assert!(s.hit_test(Point::new(300.0, 300.0)).is_none());
        assert!(s.pointer_moved(Point::new(10.0, 10.0), ms(0)).is_empty());
        assert!(s.frame().wedges.is_empty());
    }
}
