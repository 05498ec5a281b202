#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The chart data file changed on disk.
    DataReload,
}
