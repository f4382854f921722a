use crate::config::SensorConfig;
use crate::events::AppEvent;
use crate::sys::sampler::{self, SamplerControl};
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;
use tokio::sync::watch;

pub fn start_background_services(
    tx: Sender<AppEvent>,
    control: watch::Receiver<SamplerControl>,
    sensor: SensorConfig,
) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    sampler::run_sampler(tx, control, sensor).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
