/*!
 * Process Worker
 *
 * One background execution unit per simulated process. The unit starts
 * paused and only consumes time the control loop grants it, one chunk at a
 * time, pacing every chunk through the shared clock. Shared execution state
 * (`executed_time`, `paused`, `finished`) lives behind a mutex paired with a
 * condvar the unit blocks on; identity fields are immutable and read freely.
 */

use super::core::types::{ProcessMetrics, ProcessRecord, ProcessReport, ProcessState};
use crate::core::clock::Clock;
use crate::core::errors::{ProcessError, ProcessResult};
use crate::core::types::{Millis, Pid};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// State shared between the execution unit and the control loop
#[derive(Debug)]
struct ExecutionState {
    executed_time: Millis,
    paused: bool,
    finished: bool,
    /// Execution time granted by the control loop, not yet picked up
    grant: Option<Millis>,
    /// Time actually consumed for the last grant
    consumed: Option<Millis>,
}

struct WorkerShared {
    state: Mutex<ExecutionState>,
    signal: Condvar,
}

/// A simulated process and its execution unit
pub struct ProcessWorker {
    record: ProcessRecord,
    lifecycle: ProcessState,
    metrics: Option<ProcessMetrics>,
    shared: Arc<WorkerShared>,
    handle: Option<JoinHandle<()>>,
}

impl ProcessWorker {
    /// Spawn the execution unit in the paused state
    pub fn spawn(
        record: ProcessRecord,
        chunk_ms: Millis,
        clock: Arc<dyn Clock>,
    ) -> ProcessResult<Self> {
        let shared = Arc::new(WorkerShared {
            state: Mutex::new(ExecutionState {
                executed_time: 0,
                paused: true,
                finished: false,
                grant: None,
                consumed: None,
            }),
            signal: Condvar::new(),
        });

        let unit = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(format!("process-{}", record.id))
            .spawn(move || execution_loop(unit, record, chunk_ms, clock))
            .map_err(|e| ProcessError::SpawnFailed {
                pid: record.id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            record,
            lifecycle: ProcessState::Waiting,
            metrics: None,
            shared,
            handle: Some(handle),
        })
    }

    #[inline]
    pub fn id(&self) -> Pid {
        self.record.id
    }

    #[inline]
    pub fn record(&self) -> &ProcessRecord {
        &self.record
    }

    /// Current lifecycle state
    #[inline]
    pub fn state(&self) -> ProcessState {
        self.lifecycle
    }

    pub fn executed_time(&self) -> Millis {
        self.shared.state.lock().executed_time
    }

    pub fn remaining_time(&self) -> Millis {
        self.record.burst_time - self.executed_time()
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    pub fn is_finished(&self) -> bool {
        self.shared.state.lock().finished
    }

    /// Exported record, available once metrics are stored
    pub fn report(&self) -> Option<ProcessReport> {
        self.metrics
            .as_ref()
            .map(|metrics| ProcessReport::new(&self.record, metrics))
    }

    /// Waiting -> Ready, when the arrival time has elapsed
    pub fn mark_ready(&mut self) -> ProcessResult<()> {
        self.transition(ProcessState::Ready)
    }

    /// Let the execution unit run. Resuming a running process is a no-op.
    pub fn resume(&mut self) -> ProcessResult<()> {
        if self.lifecycle == ProcessState::Running {
            return Ok(());
        }
        if self.lifecycle == ProcessState::Paused {
            self.transition(ProcessState::Ready)?;
        }
        self.transition(ProcessState::Running)?;

        let mut state = self.shared.state.lock();
        state.paused = false;
        self.shared.signal.notify_all();
        drop(state);

        debug!(pid = self.record.id, "resuming process");
        Ok(())
    }

    /// Stop the execution unit at the next chunk boundary
    pub fn pause(&mut self) -> ProcessResult<()> {
        self.transition(ProcessState::Paused)?;
        self.shared.state.lock().paused = true;
        debug!(pid = self.record.id, "pausing process");
        Ok(())
    }

    /// Grant the running unit up to `min(budget, chunk)` ms and wait for it
    ///
    /// Returns the time actually consumed, which is smaller than the grant
    /// when the burst completes inside the chunk.
    pub fn execute(&self, budget: Millis) -> ProcessResult<Millis> {
        let mut state = self.shared.state.lock();
        if state.finished || budget == 0 {
            return Ok(0);
        }
        if state.paused {
            return Err(ProcessError::NotRunning(self.record.id));
        }

        state.consumed = None;
        state.grant = Some(budget);
        self.shared.signal.notify_all();
        self.shared
            .signal
            .wait_while(&mut state, |s| s.consumed.is_none());

        Ok(state.consumed.take().unwrap_or(0))
    }

    /// Record completion metrics; called once, right after the process finished
    pub fn store_data(&mut self, finish_time: Millis) -> ProcessResult<ProcessMetrics> {
        let pid = self.record.id;
        if self.metrics.is_some() {
            return Err(ProcessError::MetricsAlreadyStored(pid));
        }
        if !self.is_finished() {
            return Err(ProcessError::NotFinished(pid));
        }

        let earliest = self.record.arrival_time + self.record.burst_time;
        if finish_time < earliest {
            return Err(ProcessError::InvalidCompletion {
                pid,
                completion_time: finish_time,
                earliest,
            });
        }

        self.transition(ProcessState::Finished)?;

        let turnaround_time = finish_time - self.record.arrival_time;
        let metrics = ProcessMetrics {
            completion_time: finish_time,
            turnaround_time,
            waiting_time: turnaround_time - self.record.burst_time,
        };
        self.metrics = Some(metrics);

        debug!(
            pid,
            completion = metrics.completion_time,
            turnaround = metrics.turnaround_time,
            waiting = metrics.waiting_time,
            "process finished"
        );
        Ok(metrics)
    }

    fn transition(&mut self, to: ProcessState) -> ProcessResult<()> {
        if !self.lifecycle.can_transition_to(to) {
            return Err(ProcessError::InvalidStateTransition {
                pid: self.record.id,
                from: self.lifecycle,
                to,
            });
        }
        self.lifecycle = to;
        Ok(())
    }
}

/// Execution unit body: consume granted chunks until the burst is done
fn execution_loop(
    shared: Arc<WorkerShared>,
    record: ProcessRecord,
    chunk_ms: Millis,
    clock: Arc<dyn Clock>,
) {
    let mut state = shared.state.lock();

    loop {
        shared
            .signal
            .wait_while(&mut state, |s| !s.finished && (s.paused || s.grant.is_none()));
        if state.finished {
            break;
        }
        let Some(budget) = state.grant.take() else {
            continue;
        };

        let slice = budget
            .min(chunk_ms)
            .min(record.burst_time - state.executed_time);

        // Pace without holding the lock so the control loop can observe us
        MutexGuard::unlocked(&mut state, || clock.sleep_ms(slice));

        state.executed_time += slice;
        if state.executed_time >= record.burst_time {
            state.finished = true;
        }
        state.consumed = Some(slice);
        trace!(
            pid = record.id,
            slice,
            executed = state.executed_time,
            "chunk executed"
        );
        shared.signal.notify_all();
    }

    shared.signal.notify_all();
}

impl Drop for ProcessWorker {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.finished = true;
            // Release a control loop that might still wait on a grant
            if state.grant.take().is_some() {
                state.consumed = Some(0);
            }
        }
        self.shared.signal.notify_all();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(pid = self.record.id, "execution unit panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::VirtualClock;

    fn worker(burst: Millis, chunk: Millis) -> (ProcessWorker, Arc<VirtualClock>) {
        let clock = Arc::new(VirtualClock::new());
        let record = ProcessRecord {
            id: 1,
            arrival_time: 0,
            burst_time: burst,
            priority: 0,
        };
        let worker = ProcessWorker::spawn(record, chunk, clock.clone()).unwrap();
        (worker, clock)
    }

    #[test]
    fn test_starts_paused() {
        let (w, _) = worker(30, 10);
        assert!(w.is_paused());
        assert!(!w.is_finished());
        assert_eq!(w.state(), ProcessState::Waiting);
        assert_eq!(w.executed_time(), 0);
    }

    #[test]
    fn test_execute_requires_running() {
        let (w, _) = worker(30, 10);
        assert_eq!(w.execute(10), Err(ProcessError::NotRunning(1)));
    }

    #[test]
    fn test_chunks_are_clamped_to_burst() {
        let (mut w, clock) = worker(25, 10);
        w.mark_ready().unwrap();
        w.resume().unwrap();

        assert_eq!(w.execute(100).unwrap(), 10);
        assert_eq!(w.execute(10).unwrap(), 10);
        assert_eq!(w.remaining_time(), 5);
        assert_eq!(w.execute(10).unwrap(), 5);
        assert!(w.is_finished());
        assert_eq!(w.executed_time(), 25);
        assert_eq!(clock.now_ms(), 25);

        // Nothing left to run
        assert_eq!(w.execute(10).unwrap(), 0);
    }

    #[test]
    fn test_pause_stops_execution() {
        let (mut w, _) = worker(30, 10);
        w.mark_ready().unwrap();
        w.resume().unwrap();
        w.execute(10).unwrap();
        w.pause().unwrap();
        assert_eq!(w.state(), ProcessState::Paused);
        assert_eq!(w.execute(10), Err(ProcessError::NotRunning(1)));
        assert_eq!(w.executed_time(), 10);

        w.resume().unwrap();
        assert_eq!(w.state(), ProcessState::Running);
        assert_eq!(w.execute(10).unwrap(), 10);
    }

    #[test]
    fn test_resume_is_idempotent() {
        let (mut w, _) = worker(30, 10);
        w.mark_ready().unwrap();
        w.resume().unwrap();
        w.resume().unwrap();
        assert_eq!(w.state(), ProcessState::Running);
    }

    #[test]
    fn test_store_data_contract() {
        let (mut w, _) = worker(10, 10);
        w.mark_ready().unwrap();
        w.resume().unwrap();
        assert_eq!(w.store_data(10), Err(ProcessError::NotFinished(1)));

        w.execute(10).unwrap();
        assert!(matches!(
            w.store_data(5),
            Err(ProcessError::InvalidCompletion { earliest: 10, .. })
        ));

        let metrics = w.store_data(14).unwrap();
        assert_eq!(metrics.turnaround_time, 14);
        assert_eq!(metrics.waiting_time, 4);
        assert_eq!(w.state(), ProcessState::Finished);
        assert_eq!(w.store_data(14), Err(ProcessError::MetricsAlreadyStored(1)));
    }

    #[test]
    fn test_drop_joins_paused_unit() {
        let (w, _) = worker(1_000, 10);
        drop(w);
    }
}
