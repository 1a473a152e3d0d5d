//! Execution dispatcher
//!
//! Runs an `ExecutionRun` as a two-level schedule:
//! - an outer sequential loop over scripts, in list order
//! - per script, a concurrent fan-out of one probe call per target, closed by
//!   a fan-in barrier that waits for every outcome before the script finishes
//!
//! Probe results are released to the sink in target submission order,
//! whatever order the probes resolve in. Failed targets are outcomes, not
//! errors: they never abort the run or skip sibling work.
//!
//! Only one run may be in flight per dispatcher. A run can be cancelled; the
//! script in progress always runs to its barrier, and no further script is
//! started.

mod emitter;
mod reorder;

pub use reorder::ReorderBuffer;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use linkops_core::OperationError;
use linkops_core::domain::event::{
    EventKind, EventLevel, position_marker, run_cancelled_text, run_complete_text,
    run_start_text, script_finish_text, script_start_text, separator_text, target_result_level,
    target_result_text,
};
use linkops_core::domain::outcome::TargetOutcome;
use linkops_core::domain::run::{ExecutionRun, RunReport, RunStatus, ScriptInvocation, ScriptReport};
use linkops_core::domain::target::Target;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use self::emitter::EventEmitter;
use crate::probe::TargetProbe;
use crate::sink::OutputSink;

/// Lifecycle of the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No run has been started yet
    Idle,
    /// A run is in flight; new triggers are rejected
    Running,
    /// The last run reached its terminal event
    Completed,
}

#[derive(Debug)]
struct RunSlot {
    state: DispatcherState,
    current_run: Option<Uuid>,
    /// Scripts of the current run not started yet
    pending_scripts: usize,
    cancel_requested: bool,
}

/// Sequential-scripts, concurrent-targets executor
pub struct ExecutionDispatcher {
    probe: Arc<dyn TargetProbe>,
    sink: Arc<dyn OutputSink>,
    slot: Mutex<RunSlot>,
}

impl ExecutionDispatcher {
    /// Creates a dispatcher that probes through `probe` and reports to `sink`
    pub fn new(probe: Arc<dyn TargetProbe>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            probe,
            sink,
            slot: Mutex::new(RunSlot {
                state: DispatcherState::Idle,
                current_run: None,
                pending_scripts: 0,
                cancel_requested: false,
            }),
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.slot.lock().unwrap().state
    }

    /// Id of the run in flight, if any
    pub fn current_run(&self) -> Option<Uuid> {
        self.slot.lock().unwrap().current_run
    }

    /// Executes a run to its terminal event
    ///
    /// Fails with `EmptySelection` (no events emitted, no state change) when
    /// the run has no scripts or no targets, and with `RunAlreadyInProgress`
    /// when another run is in flight.
    pub async fn execute(&self, run: ExecutionRun) -> Result<RunReport, OperationError> {
        self.start(run, false).await
    }

    /// Like `execute`, but resets the sink once the run has been accepted
    ///
    /// A rejected trigger never touches the sink, so the transcript of a run
    /// in flight survives a second trigger.
    pub async fn execute_fresh(&self, run: ExecutionRun) -> Result<RunReport, OperationError> {
        self.start(run, true).await
    }

    async fn start(&self, run: ExecutionRun, clear_sink: bool) -> Result<RunReport, OperationError> {
        if run.is_empty() {
            warn!("Rejected run {}: empty selection", run.id);
            return Err(OperationError::EmptySelection);
        }

        self.begin(&run)?;
        let _guard = RunGuard { dispatcher: self };

        if clear_sink {
            self.sink.clear();
        }

        Ok(self.drive(&run).await)
    }

    /// Requests cancellation of the given run
    ///
    /// Returns `false` when that run is not the one in flight, or when every
    /// one of its scripts has already started and there is nothing left to
    /// skip.
    pub fn cancel(&self, run_id: Uuid) -> bool {
        let mut slot = self.slot.lock().unwrap();
        if slot.state != DispatcherState::Running || slot.current_run != Some(run_id) {
            return false;
        }
        if slot.pending_scripts == 0 {
            debug!("Ignoring cancel for run {}: last script already started", run_id);
            return false;
        }

        info!("Cancellation requested for run {}", run_id);
        slot.cancel_requested = true;
        true
    }

    /// Requests cancellation of whatever run is in flight
    pub fn cancel_current(&self) -> bool {
        match self.current_run() {
            Some(run_id) => self.cancel(run_id),
            None => false,
        }
    }

    fn begin(&self, run: &ExecutionRun) -> Result<(), OperationError> {
        let mut slot = self.slot.lock().unwrap();
        if slot.state == DispatcherState::Running {
            warn!(
                "Rejected run {}: run {:?} still in progress",
                run.id, slot.current_run
            );
            return Err(OperationError::RunAlreadyInProgress);
        }

        slot.state = DispatcherState::Running;
        slot.current_run = Some(run.id);
        slot.pending_scripts = run.scripts.len();
        slot.cancel_requested = false;
        Ok(())
    }

    /// Claims the next script, unless the run has been cancelled
    fn next_script(&self) -> bool {
        let mut slot = self.slot.lock().unwrap();
        if slot.cancel_requested || slot.pending_scripts == 0 {
            return false;
        }
        slot.pending_scripts -= 1;
        true
    }

    fn finish(&self) {
        let mut slot = self.slot.lock().unwrap();
        slot.state = DispatcherState::Completed;
        slot.current_run = None;
        slot.pending_scripts = 0;
        slot.cancel_requested = false;
    }

    /// Outer loop: one script at a time, each closed by its barrier
    async fn drive(&self, run: &ExecutionRun) -> RunReport {
        let started_at = Utc::now();
        let total = run.scripts.len();

        info!(
            "Starting run {}: {} script(s) on {} target(s)",
            run.id,
            total,
            run.targets.len()
        );

        let mut emitter = EventEmitter::new(self.sink.as_ref());
        emitter.emit(
            EventKind::RunStart,
            EventLevel::Info,
            run_start_text(total, run.targets.len()),
        );
        emitter.emit(EventKind::Separator, EventLevel::Muted, separator_text());

        let mut scripts = Vec::with_capacity(total);
        for (index, invocation) in run.scripts.iter().enumerate() {
            if !self.next_script() {
                break;
            }

            let marker = position_marker(index, total);
            info!(
                "Executing script {}/{}: {}",
                index + 1,
                total,
                invocation.script.id
            );
            emitter.emit(
                EventKind::ScriptStart,
                EventLevel::Info,
                script_start_text(&marker, &invocation.script),
            );

            let outcomes = self.fan_out(invocation, &run.targets, &mut emitter).await;

            emitter.emit(
                EventKind::ScriptFinish,
                EventLevel::Info,
                script_finish_text(&marker, &invocation.script),
            );

            scripts.push(ScriptReport {
                script_id: invocation.script.id.clone(),
                script_name: invocation.script.name.clone(),
                outcomes,
            });
        }

        emitter.emit(EventKind::Separator, EventLevel::Muted, separator_text());

        let remaining = total - scripts.len();
        let status = if remaining == 0 {
            emitter.emit(
                EventKind::RunComplete,
                EventLevel::Success,
                run_complete_text(),
            );
            RunStatus::Completed
        } else {
            emitter.emit(
                EventKind::RunCancelled,
                EventLevel::Error,
                run_cancelled_text(remaining),
            );
            RunStatus::Cancelled
        };

        let report = RunReport {
            run_id: run.id,
            status,
            target_count: run.targets.len(),
            scripts,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Run {} {:?}: {} succeeded, {} failed, {} event(s)",
            run.id,
            report.status,
            report.succeeded(),
            report.failed(),
            emitter.emitted()
        );

        report
    }

    /// Inner fan-out/fan-in over all targets for one script
    async fn fan_out(
        &self,
        invocation: &ScriptInvocation,
        targets: &[Target],
        emitter: &mut EventEmitter<'_>,
    ) -> Vec<TargetOutcome> {
        let probe = self.probe.as_ref();

        let mut pending: FuturesUnordered<_> = targets
            .iter()
            .enumerate()
            .map(|(index, target)| async move { (index, probe.probe(invocation, target).await) })
            .collect();

        let mut buffer = ReorderBuffer::new(targets.len());
        let mut outcomes = Vec::with_capacity(targets.len());

        while !buffer.is_complete() {
            let Some((index, status)) = pending.next().await else {
                break;
            };

            if index != buffer.released() {
                debug!(
                    "Holding result for target #{} until #{} resolves ({} held)",
                    index,
                    buffer.released(),
                    buffer.held() + 1
                );
            }

            for (index, status) in buffer.insert(index, status) {
                let target = &targets[index];
                emitter.emit(
                    EventKind::TargetResult,
                    target_result_level(status),
                    target_result_text(target, status),
                );
                outcomes.push(TargetOutcome {
                    target: target.clone(),
                    status,
                });
            }
        }

        if !buffer.is_complete() {
            error!(
                "Script {} finished with {}/{} target results",
                invocation.script.id,
                buffer.released(),
                targets.len()
            );
        }

        outcomes
    }
}

/// Marks the run finished however `execute` exits, including when its future is dropped
struct RunGuard<'a> {
    dispatcher: &'a ExecutionDispatcher,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.finish();
    }
}
