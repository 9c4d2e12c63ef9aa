/*!
 * CPU Scheduler Simulator Library
 * Process model, scheduling engine and timeline export exposed as a library
 */

pub mod core;
pub mod io;
pub mod monitoring;
pub mod process;

// Re-exports
pub use crate::core::{
    Clock, ClockMode, ConfigError, ProcessError, RealClock, SchedResult, SchedulerError,
    SimulationConfig, VirtualClock,
};
pub use crate::core::types::{Millis, Pid, Priority};
pub use io::{
    load_processes, parse_processes, CsvMetadataWriter, CsvTimelineWriter, LoadReport,
    MetadataSink, TimelineSink,
};
pub use monitoring::{comparison_table, gantt_segments, init_tracing, PerformanceSummary};
pub use process::{
    ProcessReport, ProcessSpec, ProcessState, RunStats, RunSummary, SchedulerEngine,
    SchedulingPolicy, TimelineSample,
};
