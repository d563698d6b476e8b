use crate::{error::ScanFailure, scanner::CycleSummary};
use alttrend_notify::Alert;
use parking_lot::Mutex;
use tracing::{error, info, warn};

/// Collaborator notified of everything noteworthy the [`Scanner`](crate::scanner::Scanner)
/// does. Observers are the only place failures surface.
pub trait ScanObserver {
    fn on_failure(&self, failure: ScanFailure);

    fn on_alert(&self, alert: &Alert);

    fn on_cycle(&self, summary: &CycleSummary);
}

/// [`ScanObserver`] that logs every notification with `tracing`.
#[derive(Debug, Copy, Clone, Default)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_failure(&self, failure: ScanFailure) {
        let ScanFailure {
            stage,
            symbol,
            timeframe,
            error,
        } = failure;
        let symbol = symbol.as_ref().map(|symbol| symbol.as_str());
        let timeframe = timeframe.as_ref().map(|timeframe| timeframe.as_str());

        if error.is_soft() {
            warn!(%stage, symbol, timeframe, kind = %error.kind(), ?error, "scan degraded");
        } else {
            error!(%stage, symbol, timeframe, kind = %error.kind(), ?error, "scan failed");
        }
    }

    fn on_alert(&self, alert: &Alert) {
        info!(
            symbol = %alert.symbol,
            timeframe = %alert.timeframe,
            chart = alert.chart.is_some(),
            message = %alert.message,
            "EMA compression detected"
        );
    }

    fn on_cycle(&self, summary: &CycleSummary) {
        info!(
            cycle = summary.cycle,
            pairs = summary.pairs,
            alerts = summary.alerts,
            failures = summary.failures,
            elapsed = ?summary.elapsed,
            "scan cycle complete"
        );
    }
}

/// [`ScanObserver`] that stores every notification in memory.
#[derive(Debug, Default)]
pub struct VecObserver {
    pub failures: Mutex<Vec<ScanFailure>>,
    pub alerts: Mutex<Vec<Alert>>,
    pub cycles: Mutex<Vec<CycleSummary>>,
}

impl ScanObserver for VecObserver {
    fn on_failure(&self, failure: ScanFailure) {
        self.failures.lock().push(failure);
    }

    fn on_alert(&self, alert: &Alert) {
        self.alerts.lock().push(alert.clone());
    }

    fn on_cycle(&self, summary: &CycleSummary) {
        self.cycles.lock().push(*summary);
    }
}
