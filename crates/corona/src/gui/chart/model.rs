use super::LOGO_PIXELS;
use gdk_pixbuf::Pixbuf;
use std::path::Path;
use std::time::Duration;
use sunburst::color::Color;
use sunburst::geometry::Point;
use sunburst::panel::PanelSide;
use sunburst::text::TextMeasurer;
use sunburst::{ChartData, ChartLayout, ChartState, LayoutError, Phase};

/// Maps widget coordinates onto the square chart surface, centred and scaled to fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::default(),
        }
    }
}

impl Viewport {
    pub fn fit(width: f64, height: f64, surface_size: f64) -> Self {
        let scale = if surface_size > 0.0 {
            (width.min(height) / surface_size).max(0.0)
        } else {
            0.0
        };
        let side = surface_size * scale;
        Self {
            scale,
            offset: Point::new((width - side) / 2.0, (height - side) / 2.0),
        }
    }

    pub fn to_chart(&self, p: Point) -> Option<Point> {
        (self.scale > 0.0).then(|| {
            Point::new(
                (p.x - self.offset.x) / self.scale,
                (p.y - self.offset.y) / self.scale,
            )
        })
    }
}

/// What the description panel widget should currently show.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub visible: bool,
    pub opacity: f64,
    pub title: String,
    pub body: String,
    pub side: PanelSide,
    pub accent: Option<Color>,
}

impl Default for PanelView {
    fn default() -> Self {
        Self {
            visible: false,
            opacity: 0.0,
            title: String::new(),
            body: String::new(),
            side: PanelSide::Left,
            accent: None,
        }
    }
}

pub struct State {
    pub chart: ChartState,
    pub data: ChartData,
    pub viewport: Viewport,
    pub logo: Option<Pixbuf>,
}

impl State {
    pub fn new(data: ChartData, measurer: &dyn TextMeasurer) -> Result<Self, LayoutError> {
        let layout = ChartLayout::from_data(&data, measurer)?;
        let chart = ChartState::new(layout, &data.chart, &data.style);
        let logo = data.style.logo.as_deref().and_then(load_logo);
        Ok(Self {
            chart,
            data,
            viewport: Viewport::default(),
            logo,
        })
    }

    /// Swaps in a new document. The current chart stays if the new one cannot be laid out.
    pub fn reload(&mut self, data: ChartData, measurer: &dyn TextMeasurer) -> Result<(), LayoutError> {
        let mut next = Self::new(data, measurer)?;
        next.viewport = Viewport::fit(
            self.viewport_width(),
            self.viewport_height(),
            next.data.style.surface_size,
        );
        *self = next;
        Ok(())
    }

    fn viewport_width(&self) -> f64 {
        self.data.style.surface_size * self.viewport.scale + 2.0 * self.viewport.offset.x
    }

    fn viewport_height(&self) -> f64 {
        self.data.style.surface_size * self.viewport.scale + 2.0 * self.viewport.offset.y
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::fit(width, height, self.data.style.surface_size);
    }

    fn hovered(&self) -> Option<usize> {
        match self.chart.phase() {
            Phase::Active(pos) => Some(pos),
            Phase::Resting => None,
        }
    }

    pub fn update_cursor(&mut self, cursor: Point, now: Duration) -> CursorAction {
        let Some(point) = self.viewport.to_chart(cursor) else {
            return CursorAction::default();
        };
        let transitions = self.chart.pointer_moved(point, now);
        CursorAction::new(!transitions.is_empty(), self.hovered())
    }

    pub fn leave(&mut self, now: Duration) -> CursorAction {
        let changed = self.chart.pointer_left(now).is_some();
        CursorAction::new(changed, None)
    }

    pub fn tick(&mut self, now: Duration) {
        self.chart.tick(now);
    }

    pub fn is_animating(&self) -> bool {
        self.chart.is_animating()
    }

    pub fn panel_view(&self) -> PanelView {
        let panel = self.chart.panel();
        match panel.content() {
            Some(content) => PanelView {
                visible: panel.is_visible(),
                opacity: panel.opacity(),
                title: content.title.clone(),
                body: content.body.clone(),
                side: content.side,
                accent: Some(content.accent),
            },
            None => PanelView::default(),
        }
    }
}

fn load_logo(path: &Path) -> Option<Pixbuf> {
    Pixbuf::from_file_at_scale(path, LOGO_PIXELS, LOGO_PIXELS, true)
        .map_err(|e| log::warn!("Failed to load logo {}: {}", path.display(), e))
        .ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CursorAction {
    pub should_redraw: bool,
    pub hovered: Option<usize>,
}

impl CursorAction {
    pub fn new(should_redraw: bool, hovered: Option<usize>) -> Self {
        Self {
            should_redraw,
            hovered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunburst::data::NO_DESCRIPTION;
    use sunburst::geometry::polar_to_cartesian;
    use sunburst::text::EstimatingMeasurer;

    fn state() -> State {
        let mut data = ChartData::fallback();
        data.chart.seed = Some(2);
        let mut state = State::new(data, &EstimatingMeasurer).unwrap();
        state.resize(800.0, 600.0);
        state
    }

    #[test]
    fn test_viewport_fit() {
        let v = Viewport::fit(800.0, 600.0, 600.0);
        assert_eq!(v.scale, 1.0);
        assert_eq!(v.offset, Point::new(100.0, 0.0));
        assert_eq!(v.to_chart(Point::new(400.0, 300.0)), Some(Point::new(300.0, 300.0)));

        let v = Viewport::fit(300.0, 300.0, 600.0);
        assert_eq!(v.to_chart(Point::new(150.0, 150.0)), Some(Point::new(300.0, 300.0)));

        assert_eq!(Viewport::fit(0.0, 600.0, 600.0).to_chart(Point::default()), None);
    }

    #[test]
    fn test_hover_and_leave() {
        let mut s = state();
        // Wedge 0 of 4 spans 12 to 3 o'clock; the chart is shifted 100px right in the widget.
        let inside = polar_to_cartesian(Point::new(400.0, 300.0), 70.0, 45.0);

        let action = s.update_cursor(inside, Duration::ZERO);
        assert!(action.should_redraw);
        assert_eq!(action.hovered, Some(0));

        let panel = s.panel_view();
        assert!(panel.visible);
        assert_eq!(panel.title, "Service 1");
        assert_eq!(panel.body, NO_DESCRIPTION);
        assert_eq!(panel.side, PanelSide::Left);

        let action = s.update_cursor(inside, Duration::from_millis(10));
        assert!(!action.should_redraw);

        let action = s.leave(Duration::from_millis(20));
        assert!(action.should_redraw);
        assert_eq!(action.hovered, None);
        s.tick(Duration::from_secs(2));
        assert!(!s.is_animating());
        assert!(!s.panel_view().visible);
    }

    #[test]
    fn test_reload_keeps_chart_on_layout_error() {
        let mut s = state();
        let before = s.chart.layout().len();

        let mut bad = ChartData::fallback();
        bad.style.inner_radius = 1000.0;
        assert!(s.reload(bad, &EstimatingMeasurer).is_err());
        assert_eq!(s.chart.layout().len(), before);

        let mut good = ChartData::fallback();
        good.items.truncate(2);
        s.reload(good, &EstimatingMeasurer).unwrap();
        assert_eq!(s.chart.layout().len(), 2);
        assert_eq!(s.viewport, Viewport::fit(800.0, 600.0, 600.0));
    }
}
