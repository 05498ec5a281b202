pub mod macros;

pub mod animation;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod distribute;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod panel;
pub mod svg;
pub mod text;

pub use chart::{ChartLayout, LayoutError};
pub use data::{ChartData, Item};
pub use interaction::{ChartState, Phase, Transition, WedgeState};
