use super::chart::{PANEL_MARGIN, PANEL_WIDTH};
use gtk::prelude::*;
use gtk4 as gtk;
use sunburst::config::ChartStyle;
use sunburst::panel::PanelSide;

/// Window size that leaves room for the panel on either side of the chart.
pub fn default_size(style: &ChartStyle) -> (i32, i32) {
    let side = style.surface_size.round().max(1.0) as i32;
    (side + 2 * (PANEL_WIDTH + PANEL_MARGIN), side)
}

pub fn panel_halign(side: PanelSide) -> gtk::Align {
    match side {
        PanelSide::Left => gtk::Align::Start,
        PanelSide::Right => gtk::Align::End,
    }
}

pub fn set_hover_cursor(area: &gtk::DrawingArea, hovering: bool) {
    area.set_cursor_from_name(hovering.then_some("pointer"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let style = ChartStyle::default();
        assert_eq!(default_size(&style), (600 + 2 * (PANEL_WIDTH + PANEL_MARGIN), 600));
    }

    #[test]
    fn test_panel_halign() {
        assert_eq!(panel_halign(PanelSide::Left), gtk::Align::Start);
        assert_eq!(panel_halign(PanelSide::Right), gtk::Align::End);
    }
}
