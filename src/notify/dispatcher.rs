use std::path::Path;

use tracing::{info, warn};

use crate::config::RunSettings;
use crate::monitor::RunReport;
use crate::notify::NotificationSink;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub sent: usize,
    pub failed: usize,
    /// Alerts held back because the mode does not dispatch.
    pub suppressed: usize,
}

/// Forwards a finished run to the notification sink according to the mode.
/// Failures are logged and counted; they never abort the run.
pub struct Dispatcher<'a> {
    sink: &'a dyn NotificationSink,
    channel: String,
    settings: RunSettings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(sink: &'a dyn NotificationSink, channel: impl Into<String>, settings: RunSettings) -> Self {
        Self {
            sink,
            channel: channel.into(),
            settings,
        }
    }

    pub async fn dispatch(&self, report: &RunReport, series_file: Option<&Path>) -> DispatchStats {
        let mut stats = DispatchStats::default();
        let mode = self.settings.mode;

        for alert in &report.alerts {
            warn!(severity = %alert.severity, label = %alert.label, "{}", alert.message);
            if !mode.dispatches_alerts() {
                stats.suppressed += 1;
                continue;
            }
            match self.sink.send_message(&self.channel, &alert.message).await {
                Ok(()) => stats.sent += 1,
                Err(e) => {
                    warn!("Alert dispatch failed for {}: {e}", alert.label);
                    stats.failed += 1;
                }
            }
        }

        if mode.dispatches_summary() {
            match self.sink.send_message(&self.channel, &report.render()).await {
                Ok(()) => stats.sent += 1,
                Err(e) => {
                    warn!("Summary dispatch failed: {e}");
                    stats.failed += 1;
                }
            }
            if let Some(path) = series_file {
                match self.sink.send_file(&self.channel, path).await {
                    Ok(()) => stats.sent += 1,
                    Err(e) => {
                        warn!("Series upload failed for {}: {e}", path.display());
                        stats.failed += 1;
                    }
                }
            }
        }

        info!(
            mode = %mode,
            sent = stats.sent,
            failed = stats.failed,
            suppressed = stats.suppressed,
            "Dispatch finished"
        );
        stats
    }
}
