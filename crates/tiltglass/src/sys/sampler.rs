use crate::config::SensorConfig;
use crate::events::AppEvent;
use async_channel::Sender;
use gyrio::Gyroscope;
use std::time::Duration;
use tokio::sync::watch;

/// Desired sampler state, pushed from the UI over a watch channel.
/// Entering the visualization screen registers interest (polling starts);
/// leaving it deregisters (the task parks, nothing is read or sent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerControl {
    pub active: bool,
    /// Poll period, from the configured delivery-rate hint.
    pub period: Duration,
}

impl SamplerControl {
    pub fn inactive(period: Duration) -> Self {
        Self {
            active: false,
            period,
        }
    }
}

pub async fn run_sampler(
    tx: Sender<AppEvent>,
    mut control: watch::Receiver<SamplerControl>,
    sensor: SensorConfig,
) {
    let gyro = match Gyroscope::discover(sensor.device.as_ref()) {
        Some(g) => g,
        None => {
            match &sensor.device {
                Some(name) => {
                    log::warn!("configured gyroscope '{}' not found; water stays centered", name)
                }
                None => log::warn!("no gyroscope on the IIO bus; water stays centered"),
            }
            return;
        }
    };
    log::info!("sampling gyroscope '{}'", gyro.name());

    loop {
        let current = *control.borrow_and_update();
        if !current.active {
            if control.changed().await.is_err() {
                return;
            }
            continue;
        }

        let mut ticks = tokio::time::interval(current.period);
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    match gyro.read() {
                        Ok(sample) => {
                            if tx.send(AppEvent::Sample(sample)).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => log::error!("gyroscope read failed: {}", e),
                    }
                }
                changed = control.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // re-evaluate activation and period
                    break;
                }
            }
        }
    }
}
