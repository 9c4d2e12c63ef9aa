/*!
 * Process Module
 * Simulated processes, their execution units and the scheduling engine
 */

pub mod core;
pub mod reference;
pub mod scheduler;
pub mod validation;
pub mod worker;

// Re-export for convenience
pub use self::core::types::{
    ProcessMetrics, ProcessRecord, ProcessReport, ProcessSpec, ProcessState, RunStats,
    RunSummary, SchedulingPolicy, TimelineSample,
};
pub use reference::{reference_fcfs, reference_round_robin, reference_sjf, ReferenceOutcome};
pub use scheduler::{AtomicRunStats, SchedulerEngine};
pub use validation::validate_spec;
pub use worker::ProcessWorker;
