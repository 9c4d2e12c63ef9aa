/*!
 * Scheduler Core Operations
 * Process registration, the shared dispatch loop and metadata export
 */

use super::ready::{ArrivalGate, ReadyOrdering, ReadyQueue};
use super::{DispatchContext, SchedulerEngine};
use crate::core::errors::{ConfigError, SchedResult, SchedulerError};
use crate::core::types::{Millis, Pid};
use crate::io::traits::{MetadataSink, TimelineSink};
use crate::monitoring::tracer::generate_run_id;
use crate::process::core::types::{
    ProcessReport, ProcessSpec, RunSummary, SchedulingPolicy, TimelineSample,
};
use crate::process::validation::validate_spec;
use crate::process::worker::ProcessWorker;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, info_span};

impl SchedulerEngine {
    /// Add one process; its execution unit is spawned paused
    pub fn add_process(&mut self, spec: ProcessSpec) -> SchedResult<()> {
        self.add_processes(std::iter::once(spec))
    }

    /// Add a batch of processes
    ///
    /// The whole batch is validated before any worker is spawned, so a bad
    /// record leaves the process set untouched.
    pub fn add_processes<I>(&mut self, specs: I) -> SchedResult<()>
    where
        I: IntoIterator<Item = ProcessSpec>,
    {
        if self.has_run {
            return Err(SchedulerError::AlreadyRun);
        }

        let mut ids: HashSet<Pid> = self.workers.iter().map(|w| w.id()).collect();
        let mut records = Vec::new();
        for spec in specs {
            let record = validate_spec(&spec)?;
            if !ids.insert(record.id) {
                return Err(ConfigError::DuplicatePid(record.id).into());
            }
            records.push(record);
        }

        for record in records {
            let worker =
                ProcessWorker::spawn(record, self.config.chunk_ms, Arc::clone(&self.clock))?;
            debug!(
                pid = record.id,
                arrival = record.arrival_time,
                burst = record.burst_time,
                priority = record.priority,
                "process added"
            );
            self.workers.push(worker);
        }

        Ok(())
    }

    /// Run the policy until every process has finished
    ///
    /// Samples go to `sink` only when `record_timeline` is set.
    pub fn run(
        &mut self,
        record_timeline: bool,
        sink: &mut dyn TimelineSink,
    ) -> SchedResult<RunSummary> {
        if self.has_run {
            return Err(SchedulerError::AlreadyRun);
        }
        self.has_run = true;

        let run_id = generate_run_id();
        let span = info_span!("scheduler_run", policy = %self.policy, run_id = %run_id);
        let _guard = span.enter();
        info!(processes = self.workers.len(), "simulation started");

        let mut ctx = DispatchContext {
            start: self.clock.now_ms(),
            record_timeline,
            sink,
            gate: ArrivalGate::new(&self.workers),
            ready: ReadyQueue::new(ReadyOrdering::for_policy(self.policy)),
            next_sample_at: 0,
            current: None,
            finished: 0,
        };

        while ctx.finished < self.workers.len() {
            self.admit_arrivals(&mut ctx)?;

            let Some(next) = ctx.ready.select(&self.workers, ctx.current) else {
                self.idle_tick(&mut ctx)?;
                continue;
            };

            match self.policy {
                SchedulingPolicy::Fcfs => self.dispatch_fcfs(&mut ctx, next)?,
                SchedulingPolicy::Sjf => self.dispatch_sjf(&mut ctx, next)?,
                SchedulingPolicy::Srtf => self.dispatch_srtf(&mut ctx, next)?,
                SchedulingPolicy::RoundRobin => self.dispatch_round_robin(&mut ctx, next)?,
                SchedulingPolicy::Priority => self.dispatch_priority(&mut ctx, next)?,
            }
        }

        let makespan_ms = self.elapsed(&ctx);
        let stats = self.stats.snapshot();
        info!(
            makespan_ms,
            context_switches = stats.context_switches,
            preemptions = stats.preemptions,
            "scheduling complete"
        );

        Ok(RunSummary {
            policy: self.policy,
            run_id,
            makespan_ms,
            processes: self.workers.len(),
            stats,
        })
    }

    /// Finished-process records in insertion order
    pub fn reports(&self) -> SchedResult<Vec<ProcessReport>> {
        self.workers
            .iter()
            .map(|w| w.report().ok_or(SchedulerError::IncompleteRun(w.id())))
            .collect()
    }

    /// Emit one record per process into `sink`
    pub fn export_metadata(&self, sink: &mut dyn MetadataSink) -> SchedResult<()> {
        for report in self.reports()? {
            sink.record(&report)?;
        }
        Ok(())
    }

    pub fn process(&self, pid: Pid) -> Option<&ProcessWorker> {
        self.workers.iter().find(|w| w.id() == pid)
    }

    pub fn processes(&self) -> impl Iterator<Item = &ProcessWorker> {
        self.workers.iter()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    // -- shared dispatch skeleton --------------------------------------------

    pub(super) fn elapsed(&self, ctx: &DispatchContext<'_>) -> Millis {
        self.clock.now_ms().saturating_sub(ctx.start)
    }

    /// Move every arrived process from the gate into the ready queue
    pub(super) fn admit_arrivals(&mut self, ctx: &mut DispatchContext<'_>) -> SchedResult<usize> {
        let now = self.elapsed(ctx);
        let arrived = ctx.gate.admit(now, &self.workers);
        for &index in &arrived {
            self.workers[index].mark_ready()?;
            ctx.ready.push(index);
            debug!(pid = self.workers[index].id(), now, "process arrived");
        }
        Ok(arrived.len())
    }

    /// Nothing ready: sample the grid points already reached as idle, then
    /// wait for the next grid point or arrival, whichever comes first
    fn idle_tick(&mut self, ctx: &mut DispatchContext<'_>) -> SchedResult<()> {
        let now = self.elapsed(ctx);
        while ctx.next_sample_at <= now {
            let at = ctx.next_sample_at;
            self.stats.inc_idle_samples();
            self.emit(ctx, TimelineSample::idle(at))?;
            ctx.next_sample_at += self.config.sample_interval_ms;
        }

        let until = ctx
            .gate
            .next_arrival(&self.workers)
            .map_or(ctx.next_sample_at, |arrival| arrival.min(ctx.next_sample_at));
        self.clock.sleep_ms(until.saturating_sub(now).max(1));
        Ok(())
    }

    /// Make `next` the running process, pausing the previous selection if it differs
    pub(super) fn switch_to(&mut self, ctx: &mut DispatchContext<'_>, next: usize) -> SchedResult<()> {
        if ctx.current != Some(next) {
            if let Some(prev) = ctx.current {
                if !self.workers[prev].is_finished() {
                    self.workers[prev].pause()?;
                    self.stats.inc_preemptions();
                    debug!(
                        preempted = self.workers[prev].id(),
                        by = self.workers[next].id(),
                        "process preempted"
                    );
                }
            }
            self.stats.inc_context_switches();
            ctx.current = Some(next);
        }

        self.workers[next].resume()?;
        Ok(())
    }

    /// Grant one chunk of at most `budget` ms and sample the grid points it covered
    pub(super) fn execute_chunk(
        &mut self,
        ctx: &mut DispatchContext<'_>,
        index: usize,
        budget: Millis,
    ) -> SchedResult<Millis> {
        let started = self.elapsed(ctx);
        let consumed = self.workers[index].execute(budget.min(self.config.chunk_ms))?;
        self.stats.inc_dispatches();

        let pid = self.workers[index].id();
        let end = started + consumed;
        while ctx.next_sample_at < end {
            let at = ctx.next_sample_at;
            self.emit(ctx, TimelineSample::running(at, pid))?;
            ctx.next_sample_at += self.config.sample_interval_ms;
        }

        Ok(consumed)
    }

    /// Record metrics of a finished process and drop it from the ready queue
    pub(super) fn complete(&mut self, ctx: &mut DispatchContext<'_>, index: usize) -> SchedResult<()> {
        let now = self.elapsed(ctx);
        self.workers[index].store_data(now)?;
        ctx.ready.remove(index);
        ctx.finished += 1;
        if ctx.current == Some(index) {
            ctx.current = None;
        }
        Ok(())
    }

    fn emit(&self, ctx: &mut DispatchContext<'_>, sample: TimelineSample) -> SchedResult<()> {
        if ctx.record_timeline {
            ctx.sink.record(sample)?;
            self.stats.add_timeline_samples(1);
        }
        Ok(())
    }
}
