/*!
 * Scheduling Policies
 *
 * Per-policy dispatch rules on top of the shared skeleton. The ready queue
 * has already chosen `next` according to the policy's ordering; each handler
 * decides how long it runs and what happens to it afterwards.
 */

use super::{DispatchContext, SchedulerEngine};
use crate::core::errors::SchedResult;
use tracing::debug;

impl SchedulerEngine {
    /// FCFS: earliest arrival runs to completion, never paused
    pub(super) fn dispatch_fcfs(
        &mut self,
        ctx: &mut DispatchContext<'_>,
        next: usize,
    ) -> SchedResult<()> {
        debug!(
            pid = self.workers[next].id(),
            arrival = self.workers[next].record().arrival_time,
            "dispatching earliest arrival"
        );
        self.run_to_completion(ctx, next)
    }

    /// SJF: smallest total burst among arrived processes runs to completion
    pub(super) fn dispatch_sjf(
        &mut self,
        ctx: &mut DispatchContext<'_>,
        next: usize,
    ) -> SchedResult<()> {
        debug!(
            pid = self.workers[next].id(),
            burst = self.workers[next].record().burst_time,
            ready = ctx.ready.len(),
            "dispatching shortest job"
        );
        self.run_to_completion(ctx, next)
    }

    /// SRTF: smallest remaining time runs for one chunk, then everything is
    /// re-evaluated; a strictly shorter arrival takes over at the next tick
    pub(super) fn dispatch_srtf(
        &mut self,
        ctx: &mut DispatchContext<'_>,
        next: usize,
    ) -> SchedResult<()> {
        if ctx.current != Some(next) {
            debug!(
                pid = self.workers[next].id(),
                remaining = self.workers[next].remaining_time(),
                "shortest remaining time changed"
            );
        }
        self.preemptive_tick(ctx, next)
    }

    /// Priority: highest static priority runs for one chunk; since priorities
    /// never change, only a strictly higher-priority arrival can take over
    pub(super) fn dispatch_priority(
        &mut self,
        ctx: &mut DispatchContext<'_>,
        next: usize,
    ) -> SchedResult<()> {
        if ctx.current != Some(next) {
            debug!(
                pid = self.workers[next].id(),
                priority = self.workers[next].record().priority,
                "highest priority changed"
            );
        }
        self.preemptive_tick(ctx, next)
    }

    /// Round robin: the queue head runs for up to one quantum in sub-chunks.
    /// Arrivals during the slice join the tail before the head is requeued.
    pub(super) fn dispatch_round_robin(
        &mut self,
        ctx: &mut DispatchContext<'_>,
        next: usize,
    ) -> SchedResult<()> {
        self.switch_to(ctx, next)?;

        let quantum = self.config.quantum_ms;
        let mut used = 0;
        while used < quantum && !self.workers[next].is_finished() {
            used += self.execute_chunk(ctx, next, quantum - used)?;
        }

        self.admit_arrivals(ctx)?;

        if self.workers[next].is_finished() {
            self.complete(ctx, next)
        } else {
            // Arrivals were appended behind the running head
            ctx.ready.requeue_head();
            debug!(
                pid = self.workers[next].id(),
                used,
                remaining = self.workers[next].remaining_time(),
                "quantum expired, requeued"
            );
            Ok(())
        }
    }

    fn run_to_completion(&mut self, ctx: &mut DispatchContext<'_>, next: usize) -> SchedResult<()> {
        self.switch_to(ctx, next)?;
        while !self.workers[next].is_finished() {
            self.execute_chunk(ctx, next, self.config.chunk_ms)?;
        }
        self.complete(ctx, next)
    }

    fn preemptive_tick(&mut self, ctx: &mut DispatchContext<'_>, next: usize) -> SchedResult<()> {
        self.switch_to(ctx, next)?;
        self.execute_chunk(ctx, next, self.config.chunk_ms)?;
        if self.workers[next].is_finished() {
            self.complete(ctx, next)?;
        }
        Ok(())
    }
}
