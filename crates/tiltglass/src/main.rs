use relm4::prelude::*;
use tiltglass::config;
use tiltglass::gui::app::AppModel;
use tiltglass::sys::runtime;
use tiltglass::sys::sampler::SamplerControl;
use tokio::sync::watch;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);
    let (control_tx, control_rx) =
        watch::channel(SamplerControl::inactive(config.sensor.rate.period()));

    // Start Background Services
    runtime::start_background_services(tx, control_rx, config.sensor.clone());

    let app = RelmApp::new("org.tiltglass.app");

    app.run::<AppModel>((config, control_tx, rx));
}
