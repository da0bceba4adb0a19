//! Periodic metrics reporting
//!
//! A metrics session polls the UE and DU metrics providers on a fixed
//! period and pushes a snapshot report to its notifier. Reporting stops
//! when the session handle is stopped or dropped.

use std::sync::Arc;
use std::time::Duration;

use gnbcu_common::{DuIndex, UeIndex};
use tracing::debug;

use crate::async_task::ManualEvent;

/// Per-UE metrics snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UeMetrics {
    /// UE identity.
    pub ue_index: UeIndex,
    /// DU currently serving the UE.
    pub du_index: DuIndex,
}

/// Per-DU metrics snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuMetrics {
    /// DU identity.
    pub du_index: DuIndex,
    /// Number of UEs served by the DU.
    pub nof_ues: usize,
}

/// Snapshot report pushed to the report notifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricsReport {
    /// Per-UE entries.
    pub ues: Vec<UeMetrics>,
    /// Per-DU entries.
    pub dus: Vec<DuMetrics>,
}

/// Source of per-UE metrics.
pub trait UeMetricsProvider: Send + Sync {
    /// Returns the current per-UE metrics.
    fn ue_metrics(&self) -> Vec<UeMetrics>;
}

/// Source of per-DU metrics.
pub trait DuMetricsProvider: Send + Sync {
    /// Returns the current per-DU metrics.
    fn du_metrics(&self) -> Vec<DuMetrics>;
}

/// Sink for periodic metrics reports.
pub trait MetricsReportNotifier: Send + Sync {
    /// Delivers one report.
    fn notify_metrics_report(&self, report: MetricsReport);
}

/// Builds periodic report sessions over a pair of metrics providers.
pub struct MetricsHandler {
    ue_provider: Arc<dyn UeMetricsProvider>,
    du_provider: Arc<dyn DuMetricsProvider>,
}

impl MetricsHandler {
    /// Creates a handler over the given providers.
    pub fn new(
        ue_provider: Arc<dyn UeMetricsProvider>,
        du_provider: Arc<dyn DuMetricsProvider>,
    ) -> Self {
        Self {
            ue_provider,
            du_provider,
        }
    }

    /// Takes a snapshot report from the providers.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            ues: self.ue_provider.ue_metrics(),
            dus: self.du_provider.du_metrics(),
        }
    }

    /// Starts a periodic report session.
    ///
    /// One report is pushed to `notifier` per `period`, starting one period
    /// after the call. The session ends when the returned handle is stopped
    /// or dropped. Must be called from within a tokio runtime context.
    pub fn create_periodic_report_session(
        &self,
        period: Duration,
        notifier: Arc<dyn MetricsReportNotifier>,
    ) -> MetricsSession {
        let stop = ManualEvent::<()>::new();
        let ue_provider = self.ue_provider.clone();
        let du_provider = self.du_provider.clone();

        let session_stop = stop.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    () = session_stop.wait() => break,
                    _ = interval.tick() => {
                        notifier.notify_metrics_report(MetricsReport {
                            ues: ue_provider.ue_metrics(),
                            dus: du_provider.du_metrics(),
                        });
                    }
                }
            }
            debug!("metrics report session ended");
        });

        MetricsSession { stop }
    }
}

/// Handle to a running periodic report session.
///
/// Dropping the handle ends the session.
pub struct MetricsSession {
    stop: ManualEvent<()>,
}

impl MetricsSession {
    /// Ends the session. Idempotent.
    pub fn stop(&self) {
        self.stop.try_set(());
    }
}

impl Drop for MetricsSession {
    fn drop(&mut self) {
        self.stop.try_set(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockProviders {
        ues: Mutex<Vec<UeMetrics>>,
        dus: Mutex<Vec<DuMetrics>>,
    }

    impl UeMetricsProvider for MockProviders {
        fn ue_metrics(&self) -> Vec<UeMetrics> {
            self.ues.lock().unwrap().clone()
        }
    }

    impl DuMetricsProvider for MockProviders {
        fn du_metrics(&self) -> Vec<DuMetrics> {
            self.dus.lock().unwrap().clone()
        }
    }

    struct CollectingNotifier {
        reports: Mutex<Vec<MetricsReport>>,
        first: ManualEvent<()>,
    }

    impl MetricsReportNotifier for CollectingNotifier {
        fn notify_metrics_report(&self, report: MetricsReport) {
            self.reports.lock().unwrap().push(report);
            self.first.try_set(());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_periodic_report_reflects_provider_state() {
        let providers = Arc::new(MockProviders::default());
        providers.ues.lock().unwrap().push(UeMetrics {
            ue_index: UeIndex(1),
            du_index: DuIndex(0),
        });
        providers.dus.lock().unwrap().push(DuMetrics {
            du_index: DuIndex(0),
            nof_ues: 1,
        });

        let handler = MetricsHandler::new(providers.clone(), providers.clone());
        let notifier = Arc::new(CollectingNotifier {
            reports: Mutex::new(Vec::new()),
            first: ManualEvent::new(),
        });

        let session = handler
            .create_periodic_report_session(Duration::from_millis(10), notifier.clone());

        notifier.first.wait().await;
        session.stop();

        let reports = notifier.reports.lock().unwrap();
        assert!(!reports.is_empty());
        assert_eq!(reports[0].ues.len(), 1);
        assert_eq!(reports[0].ues[0].ue_index, UeIndex(1));
        assert_eq!(reports[0].dus[0].nof_ues, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropping_session_stops_reporting() {
        let providers = Arc::new(MockProviders::default());
        let handler = MetricsHandler::new(providers.clone(), providers.clone());
        let notifier = Arc::new(CollectingNotifier {
            reports: Mutex::new(Vec::new()),
            first: ManualEvent::new(),
        });

        let session = handler
            .create_periodic_report_session(Duration::from_millis(10), notifier.clone());
        notifier.first.wait().await;
        drop(session);

        // Allow any in-flight tick to land, then verify reporting stopped.
        tokio::time::sleep(Duration::from_millis(30)).await;
        let count = notifier.reports.lock().unwrap().len();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(notifier.reports.lock().unwrap().len(), count);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_direct_snapshot() {
        let providers = Arc::new(MockProviders::default());
        let handler = MetricsHandler::new(providers.clone(), providers.clone());
        assert_eq!(handler.report(), MetricsReport::default());
    }
}
