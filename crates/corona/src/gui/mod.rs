pub mod app;
pub mod chart;
pub mod theme;
pub mod window;
