/*!
 * Scheduler Engine
 *
 * One engine per policy run. The engine owns the process set, an arrival gate,
 * a ready queue ordered per policy and the dispatch loop that resumes and
 * pauses workers while emitting timeline samples.
 */

use super::core::types::SchedulingPolicy;
use super::worker::ProcessWorker;
use crate::core::clock::Clock;
use crate::core::config::SimulationConfig;
use crate::core::errors::SchedResult;
use crate::core::types::Millis;
use crate::io::traits::TimelineSink;
use std::sync::Arc;
use tracing::info;

mod atomic_stats;
mod operations;
mod policy;
mod ready;
mod stats;

pub use atomic_stats::AtomicRunStats;
pub use ready::{ArrivalGate, ReadyOrdering, ReadyQueue};

/// Scheduling engine for a single policy run
pub struct SchedulerEngine {
    policy: SchedulingPolicy,
    config: SimulationConfig,
    clock: Arc<dyn Clock>,
    workers: Vec<ProcessWorker>,
    stats: AtomicRunStats,
    has_run: bool,
}

impl SchedulerEngine {
    /// Create an engine with the clock selected by the configuration
    pub fn new(policy: SchedulingPolicy, config: SimulationConfig) -> SchedResult<Self> {
        let clock = config.build_clock();
        Self::with_clock(policy, config, clock)
    }

    /// Create an engine driven by an explicit clock
    pub fn with_clock(
        policy: SchedulingPolicy,
        config: SimulationConfig,
        clock: Arc<dyn Clock>,
    ) -> SchedResult<Self> {
        config.validate()?;
        info!(
            policy = %policy,
            chunk_ms = config.chunk_ms,
            sample_interval_ms = config.sample_interval_ms,
            quantum_ms = config.quantum_ms,
            "scheduler engine initialized"
        );

        Ok(Self {
            policy,
            stats: AtomicRunStats::new(policy, config.quantum_ms),
            config,
            clock,
            workers: Vec::new(),
            has_run: false,
        })
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

/// Mutable state of one pass through the dispatch loop
pub(super) struct DispatchContext<'a> {
    /// Clock reading at run start; sample times are relative to it
    start: Millis,
    record_timeline: bool,
    sink: &'a mut dyn TimelineSink,
    gate: ArrivalGate,
    ready: ReadyQueue,
    /// Next point of the sampling grid (multiples of the sample interval)
    next_sample_at: Millis,
    /// Process selected on the previous tick, if still unfinished
    current: Option<usize>,
    finished: usize,
}
