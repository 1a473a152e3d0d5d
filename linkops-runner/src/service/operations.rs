//! Operations service
//!
//! Controller behind the operations tab. It owns the selection, resolves ids
//! against the catalog and roster, triggers runs on the dispatcher and keeps
//! the history up to date.

use chrono::Utc;
use linkops_core::domain::operation::OperationRecord;
use linkops_core::domain::run::RunReport;
use linkops_core::domain::selection::{SelectionState, Toggle};
use linkops_core::{OperationError, ScriptCatalog, TargetRoster};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::history::OperationHistory;
use crate::dispatcher::{DispatcherState, ExecutionDispatcher};
use crate::probe::TargetProbe;
use crate::sink::OutputSink;

pub struct OperationsService {
    catalog: ScriptCatalog,
    roster: TargetRoster,
    selection: Mutex<SelectionState>,
    dispatcher: ExecutionDispatcher,
    sink: Arc<dyn OutputSink>,
    history: OperationHistory,
}

impl OperationsService {
    /// Creates the service with an empty selection and the demo history
    pub fn new(
        catalog: ScriptCatalog,
        roster: TargetRoster,
        probe: Arc<dyn TargetProbe>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self::with_history(catalog, roster, probe, sink, OperationHistory::seeded(Utc::now()))
    }

    pub fn with_history(
        catalog: ScriptCatalog,
        roster: TargetRoster,
        probe: Arc<dyn TargetProbe>,
        sink: Arc<dyn OutputSink>,
        history: OperationHistory,
    ) -> Self {
        Self {
            catalog,
            roster,
            selection: Mutex::new(SelectionState::new()),
            dispatcher: ExecutionDispatcher::new(probe, Arc::clone(&sink)),
            sink,
            history,
        }
    }

    pub fn catalog(&self) -> &ScriptCatalog {
        &self.catalog
    }

    pub fn roster(&self) -> &TargetRoster {
        &self.roster
    }

    /// Copy of the current selection
    pub fn selection(&self) -> SelectionState {
        self.selection.lock().unwrap().clone()
    }

    pub fn toggle_script(&self, script_id: &str) -> Result<Toggle, OperationError> {
        let script = self
            .catalog
            .get(script_id)
            .ok_or_else(|| OperationError::UnknownScript(script_id.to_string()))?;

        let toggle = self.selection.lock().unwrap().toggle_script(script)?;
        debug!("Script {} {:?}", script_id, toggle);
        Ok(toggle)
    }

    /// Toggles a flag; `None` when the script is not selected or the flag is not offered
    pub fn toggle_flag(&self, script_id: &str, flag: &str) -> Option<Toggle> {
        self.selection.lock().unwrap().toggle_flag(script_id, flag)
    }

    /// Toggles an eligible target; unreachable or unenrolled machines are rejected
    pub fn toggle_target(&self, target_id: &str) -> Result<Toggle, OperationError> {
        let target = self
            .roster
            .find(target_id)
            .ok_or_else(|| OperationError::UnknownTarget(target_id.to_string()))?;

        let toggle = self.selection.lock().unwrap().toggle_target(target);
        debug!("Target {} {:?}", target_id, toggle);
        Ok(toggle)
    }

    pub fn clear_selection(&self) {
        self.selection.lock().unwrap().clear();
    }

    /// Runs the current selection to its terminal event
    ///
    /// The dispatcher clears the transcript only after it has accepted the
    /// run, so a rejected trigger leaves the previous or live output in place.
    pub async fn run(&self) -> Result<RunReport, OperationError> {
        let run = self.selection.lock().unwrap().snapshot();
        let report = self.dispatcher.execute_fresh(run.clone()).await?;

        let record = self.history.record(&run, &report);
        info!("Recorded {} as {}", record.id, record.status);
        Ok(report)
    }

    /// Requests cancellation of the run in flight
    pub fn cancel(&self) -> bool {
        self.dispatcher.cancel_current()
    }

    /// Resets the transcript to its placeholder
    pub fn clear_output(&self) {
        self.sink.clear();
    }

    pub fn state(&self) -> DispatcherState {
        self.dispatcher.state()
    }

    /// History entries, newest first
    pub fn history(&self) -> Vec<OperationRecord> {
        self.history.records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockProbe;
    use crate::sink::TranscriptSink;
    use linkops_core::domain::event::{EventKind, OutputEvent, PLACEHOLDER};
    use linkops_core::domain::operation::OperationStatus;
    use linkops_core::domain::run::RunStatus;
    use linkops_core::domain::target::Target;
    use std::time::Duration;

    fn service(success_rate: f64) -> (OperationsService, TranscriptSink) {
        let sink = TranscriptSink::new();
        let service = OperationsService::with_history(
            ScriptCatalog::builtin(),
            TargetRoster::builtin(),
            Arc::new(MockProbe::new(success_rate)),
            Arc::new(sink.clone()),
            OperationHistory::new(),
        );
        (service, sink)
    }

    fn first_target(service: &OperationsService) -> String {
        service.roster().eligible().next().unwrap().id.clone()
    }

    #[test]
    fn test_toggle_unknown_ids() {
        let (service, _) = service(1.0);
        assert_eq!(
            service.toggle_script("rm_rf"),
            Err(OperationError::UnknownScript("rm_rf".to_string()))
        );
        assert_eq!(
            service.toggle_target("nowhere"),
            Err(OperationError::UnknownTarget("nowhere".to_string()))
        );
        assert!(service.selection().is_empty());
    }

    #[test]
    fn test_ineligible_target_is_rejected() {
        let mut offline = Target::new("vm-offline", "vm-offline");
        offline.reachable = false;
        let roster = TargetRoster::new(vec![offline]).unwrap();

        let service = OperationsService::with_history(
            ScriptCatalog::builtin(),
            roster,
            Arc::new(MockProbe::new(1.0)),
            Arc::new(TranscriptSink::new()),
            OperationHistory::new(),
        );
        assert!(matches!(
            service.toggle_target("vm-offline"),
            Err(OperationError::UnknownTarget(_))
        ));
    }

    #[test]
    fn test_selection_limit_through_service() {
        let (service, _) = service(1.0);
        let ids: Vec<String> = service
            .catalog()
            .scripts()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        for id in &ids {
            assert_eq!(service.toggle_script(id), Ok(Toggle::Added));
        }
        assert_eq!(service.selection().scripts().len(), ids.len());
        // removing and re-adding stays within the limit
        assert_eq!(service.toggle_script(&ids[0]), Ok(Toggle::Removed));
        assert_eq!(service.toggle_script(&ids[0]), Ok(Toggle::Added));
    }

    #[tokio::test]
    async fn test_empty_run_keeps_transcript() {
        let (service, sink) = service(1.0);
        assert_eq!(service.run().await.unwrap_err(), OperationError::EmptySelection);
        assert_eq!(sink.lines(), vec![PLACEHOLDER]);
        assert!(service.history().is_empty());
        assert_eq!(service.state(), DispatcherState::Idle);
    }

    #[tokio::test]
    async fn test_run_records_history() {
        let (service, sink) = service(1.0);
        let target = first_target(&service);

        service.toggle_script("baseline").unwrap();
        assert_eq!(service.toggle_flag("baseline", "--verbose"), Some(Toggle::Added));
        service.toggle_target(&target).unwrap();

        let report = service.run().await.unwrap();
        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.succeeded(), 1);

        let events = sink.events();
        assert_eq!(events.first().unwrap().kind, EventKind::RunStart);
        assert_eq!(events.last().unwrap().kind, EventKind::RunComplete);

        let history = service.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, OperationStatus::Success);
        assert_eq!(history[0].title(), "Baseline Check");

        // the selection survives the run
        assert!(service.selection().is_script_selected("baseline"));
    }

    #[tokio::test]
    async fn test_second_run_replaces_transcript() {
        let (service, sink) = service(0.0);
        service.toggle_script("update_system").unwrap();
        service.toggle_target(&first_target(&service)).unwrap();

        service.run().await.unwrap();
        let first = sink.lines();
        let report = service.run().await.unwrap();

        assert_eq!(sink.lines(), first);
        assert_eq!(report.failed(), 1);
        assert_eq!(service.history()[0].status, OperationStatus::Failed);
        assert_eq!(service.history().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_output() {
        let (service, sink) = service(1.0);
        service.toggle_script("install_nano").unwrap();
        service.toggle_target(&first_target(&service)).unwrap();
        service.run().await.unwrap();
        assert!(!sink.is_empty());

        service.clear_output();
        assert_eq!(sink.lines(), vec![PLACEHOLDER]);
    }

    #[test]
    fn test_cancel_without_run() {
        let (service, _) = service(1.0);
        assert!(!service.cancel());
    }

    /// Sink whose `clear` is slow enough for a second trigger to overlap it
    struct SlowClearSink {
        inner: TranscriptSink,
        delay: Duration,
    }

    impl OutputSink for SlowClearSink {
        fn append(&self, event: OutputEvent) {
            self.inner.append(event);
        }

        fn clear(&self) {
            std::thread::sleep(self.delay);
            self.inner.clear();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_rejected_trigger_keeps_live_transcript() {
        let transcript = TranscriptSink::new();
        let sink = SlowClearSink {
            inner: transcript.clone(),
            delay: Duration::from_millis(100),
        };
        let probe = MockProbe::new(1.0).with_latency(Duration::from_millis(200));
        let service = Arc::new(OperationsService::with_history(
            ScriptCatalog::builtin(),
            TargetRoster::builtin(),
            Arc::new(probe),
            Arc::new(sink),
            OperationHistory::new(),
        ));
        service.toggle_script("baseline").unwrap();
        service.toggle_target(&first_target(&service)).unwrap();

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.run().await })
        };
        while service.state() != DispatcherState::Running {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let second = service.run().await;
        assert_eq!(second.unwrap_err(), OperationError::RunAlreadyInProgress);

        let report = first.await.unwrap().unwrap();
        assert_eq!(report.status, RunStatus::Completed);

        let events = transcript.events();
        assert_eq!(events.first().unwrap().kind, EventKind::RunStart);
        assert_eq!(events.last().unwrap().kind, EventKind::RunComplete);
        assert_eq!(events.len(), 7);
        assert_eq!(service.history().len(), 1);
    }
}
