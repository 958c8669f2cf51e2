use super::stats::PipelineStats;
use super::types::TickOutcome;
use super::MocapPipeline;
use crate::events::ControlEvent;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

impl MocapPipeline {
    /// Drive the pipeline until the device ends, a shutdown arrives or the token fires
    pub async fn run(
        mut self,
        mut control: mpsc::Receiver<ControlEvent>,
        tick_interval: Duration,
        cancellation_token: CancellationToken,
    ) -> PipelineStats {
        info!("Capture loop running at {:?} per tick", tick_interval);

        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut control_open = true;

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    info!("Capture loop cancelled");
                    break;
                }
                event = control.recv(), if control_open => {
                    match event {
                        Some(event) => {
                            if !self.handle_control(event).await {
                                break;
                            }
                        }
                        None => control_open = false,
                    }
                }
                _ = ticker.tick() => {
                    if self.tick(Instant::now()) == TickOutcome::Ended {
                        info!("Sensor stream ended");
                        break;
                    }
                }
            }
        }

        self.finish().await;

        let stats = self.stats().clone();
        info!(
            "Capture loop stopped: {} frames, {} skeletons ({:.0}% tracked), {} exported",
            stats.frames_received,
            stats.skeletons_selected,
            stats.tracking_rate() * 100.0,
            stats.recordings_exported
        );
        stats
    }
}
