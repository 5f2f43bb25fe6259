use crate::bridge::Bridge;
use crate::rows::flatten;
use crate::selection::Selection;
use crate::surface::DisplaySurface;

// One reconciliation pass per timer tick: pull the full snapshot, rebuild the
// row table from scratch, re-apply the selection by id. A failed poll must
// leave the displayed rows exactly as they were; only the first failure of a
// streak is surfaced to the operator.
pub struct Reconciler {
    poll_failed: bool,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self { poll_failed: false }
    }

    pub async fn pass(
        &mut self,
        bridge: &dyn Bridge,
        surface: &mut dyn DisplaySurface,
        selection: &Selection,
    ) {
        let snapshot = selection.current().to_string();

        let status = match bridge.status().await {
            Ok(status) => status,
            Err(error) => {
                if self.poll_failed {
                    log::debug!("[reconciler] status poll still failing: {error}");
                } else {
                    self.poll_failed = true;
                    log::warn!("[reconciler] status poll failed: {error}");
                    surface.alert(&error.to_string());
                }
                return;
            }
        };

        if self.poll_failed {
            self.poll_failed = false;
            log::info!("[reconciler] status poll recovered");
        }

        let rows = flatten(&status.contexts);
        log::debug!(
            "[reconciler] {} contexts flattened into {} rows",
            status.contexts.len(),
            rows.len()
        );

        surface.set_rows(rows);
        if !snapshot.is_empty() {
            // Select-by-id; an id that vanished from the snapshot leaves the
            // selection effectively empty until the operator picks again.
            surface.select_row(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeError;
    use crate::mock::{MockBridge, RecordingSurface};
    use crate::status::{ContextStatus, ServiceStatus, StatusData};

    fn snapshot(contexts: &[(&str, &[&str])]) -> StatusData {
        StatusData {
            contexts: contexts
                .iter()
                .map(|(name, services)| ContextStatus {
                    name: name.to_string(),
                    services: services
                        .iter()
                        .map(|service| ServiceStatus {
                            name: service.to_string(),
                            status: "running".to_string(),
                            ..ServiceStatus::default()
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn selection_survives_a_poll_when_the_id_is_still_present() {
        let bridge = MockBridge::new().with_status(snapshot(&[("db", &["pg"])]));
        let (mut surface, log) = RecordingSurface::new();
        let mut selection = Selection::new();
        selection.set("db.pg".to_string());

        let mut reconciler = Reconciler::new();
        reconciler.pass(&bridge, &mut surface, &selection).await;
        reconciler.pass(&bridge, &mut surface, &selection).await;

        assert_eq!(log.borrow().selected, "db.pg");
        assert_eq!(log.borrow().set_rows_calls, 2);
    }

    #[tokio::test]
    async fn vanished_selection_becomes_empty_without_error() {
        let bridge = MockBridge::new().with_status(snapshot(&[("db", &["pg"])]));
        bridge.queue_status(Ok(snapshot(&[("db", &[])])));

        let (mut surface, log) = RecordingSurface::new();
        let mut selection = Selection::new();
        selection.set("db.pg".to_string());

        let mut reconciler = Reconciler::new();
        reconciler.pass(&bridge, &mut surface, &selection).await;

        assert_eq!(log.borrow().rows.len(), 1);
        assert!(log.borrow().selected.is_empty());
    }

    #[tokio::test]
    async fn failed_poll_leaves_rows_untouched() {
        let bridge = MockBridge::new().with_status(snapshot(&[("db", &["pg"])]));
        let (mut surface, log) = RecordingSurface::new();
        let selection = Selection::new();

        let mut reconciler = Reconciler::new();
        reconciler.pass(&bridge, &mut surface, &selection).await;
        let rows_before = log.borrow().rows.clone();

        bridge.queue_status(Err(BridgeError::Transport("connect: refused".to_string())));
        reconciler.pass(&bridge, &mut surface, &selection).await;

        assert_eq!(log.borrow().rows, rows_before);
        assert_eq!(log.borrow().set_rows_calls, 1);
    }

    #[tokio::test]
    async fn failure_streak_is_reported_once() {
        let bridge = MockBridge::new();
        bridge.queue_status(Err(BridgeError::Transport("down".to_string())));
        bridge.queue_status(Err(BridgeError::Transport("down".to_string())));
        bridge.queue_status(Ok(snapshot(&[("db", &[])])));
        bridge.queue_status(Err(BridgeError::Transport("down again".to_string())));

        let (mut surface, log) = RecordingSurface::new();
        let selection = Selection::new();
        let mut reconciler = Reconciler::new();

        for _ in 0..4 {
            reconciler.pass(&bridge, &mut surface, &selection).await;
        }

        // Two failure streaks, one alert each; the success in between clears
        // the flag.
        let alerts = log.borrow().alerts.clone();
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].contains("down"));
        assert!(alerts[1].contains("down again"));
    }

    #[tokio::test]
    async fn rows_follow_the_latest_snapshot_exactly() {
        let bridge = MockBridge::new();
        bridge.queue_status(Ok(snapshot(&[("db", &["pg"]), ("cache", &["redis"])])));
        bridge.queue_status(Ok(snapshot(&[("db", &["pg"])])));

        let (mut surface, log) = RecordingSurface::new();
        let selection = Selection::new();
        let mut reconciler = Reconciler::new();

        reconciler.pass(&bridge, &mut surface, &selection).await;
        assert_eq!(log.borrow().rows.len(), 4);

        reconciler.pass(&bridge, &mut surface, &selection).await;
        let ids: Vec<String> = log
            .borrow()
            .rows
            .iter()
            .map(|row| row.record_id.clone())
            .collect();
        assert_eq!(ids, ["db", "db.pg"]);
    }
}
