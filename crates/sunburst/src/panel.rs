//! The description panel shown beside the chart while an item is hovered.

use crate::animation::{Animated, Timing};
use crate::color::Color;
use std::time::Duration;
use strum::Display as StrumDisplay;

/// Which side of the chart the panel is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PanelSide {
    Left,
    Right,
}

impl PanelSide {
    /// Opposite the wedge: a wedge in the right half (`mid_angle < 180`) puts the panel left.
    pub fn opposite(mid_angle: f64) -> Self {
        if mid_angle.rem_euclid(360.0) < 180.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelContent {
    pub title: String,
    pub body: String,
    pub accent: Color,
    pub side: PanelSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionPanel {
    content: Option<PanelContent>,
    opacity: Animated<f64>,
    visible: bool,
    hide_at: Option<Duration>,
    fade: Timing,
}

impl DescriptionPanel {
    pub fn new(fade: Timing) -> Self {
        Self {
            content: None,
            opacity: Animated::new(0.0),
            visible: false,
            hide_at: None,
            fade,
        }
    }

    /// Replaces the content and fades in. Cancels a pending hide.
    pub fn show(&mut self, content: PanelContent, now: Duration) {
        if self.hide_at.take().is_some() {
            log::debug!("Panel hide cancelled by show of '{}'", content.title);
        }
        self.content = Some(content);
        self.visible = true;
        self.opacity.animate_to(1.0, now, self.fade);
    }

    /// Fades out, then drops out of layout once the fade has had time to finish.
    pub fn hide(&mut self, now: Duration) {
        if !self.visible {
            return;
        }
        self.opacity.animate_to(0.0, now, self.fade);
        self.hide_at = Some(now + self.fade.duration);
    }

    pub fn tick(&mut self, now: Duration) {
        self.opacity.tick(now);
        if let Some(at) = self.hide_at
            && now >= at
        {
            self.hide_at = None;
            // Only if no show happened in between.
            if self.opacity.target() == 0.0 {
                self.opacity.set(0.0);
                self.visible = false;
            }
        }
    }

    /// Completes the fade and any pending hide.
    pub fn settle(&mut self) {
        self.opacity.finish();
        if self.hide_at.take().is_some() && self.opacity.value() == 0.0 {
            self.visible = false;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.opacity.is_animating() || self.hide_at.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.value()
    }

    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }
}
