/// Capture loop counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_received: u64,
    pub ticks_skipped: u64,
    pub skeletons_selected: u64,
    pub tracking_losses: u64,
    pub frames_recorded: u64,
    pub recordings_exported: u64,
    pub export_failures: u64,
}

impl PipelineStats {
    pub fn record_skip(&mut self) {
        self.ticks_skipped += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames_received += 1;
    }

    pub fn record_selection(&mut self, recorded: bool) {
        self.skeletons_selected += 1;
        if recorded {
            self.frames_recorded += 1;
        }
    }

    pub fn record_loss(&mut self) {
        self.tracking_losses += 1;
    }

    pub fn record_export(&mut self, succeeded: bool) {
        if succeeded {
            self.recordings_exported += 1;
        } else {
            self.export_failures += 1;
        }
    }

    /// Share of received frames that produced a skeleton
    pub fn tracking_rate(&self) -> f64 {
        if self.frames_received == 0 {
            0.0
        } else {
            self.skeletons_selected as f64 / self.frames_received as f64
        }
    }
}
