pub mod measure;
pub mod model;
pub mod view;

pub use measure::CairoMeasurer;
pub use model::{CursorAction, PanelView, State, Viewport};
pub use view::draw;

pub const FONT_FAMILY: &str = "Sans";
pub const LOGO_PIXELS: i32 = 256;
pub const PANEL_WIDTH: i32 = 300;
pub const PANEL_MARGIN: i32 = 24;
pub const CENTER_RING_WIDTH: f64 = 1.5;
