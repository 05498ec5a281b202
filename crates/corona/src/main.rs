use corona::config;
use corona::gui::app::AppModel;
use corona::gui::chart::{CairoMeasurer, State};
use corona::sys::runtime;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let data = config::load_or_setup();
    let state = State::new(data, &CairoMeasurer::new())?;

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.corona");
    app.run::<AppModel>((state, rx));
    Ok(())
}
