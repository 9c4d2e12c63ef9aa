/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Millis, Pid};
use crate::process::core::types::ProcessState;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
pub type SchedResult<T> = Result<T, SchedulerError>;

/// Worker operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Configuration and process-input errors, raised before any scheduling happens
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Process {pid}: burst time must be positive, got {burst_time}")]
    #[diagnostic(
        code(config::invalid_burst),
        help("Every process needs a burst time of at least 1 ms.")
    )]
    InvalidBurst { pid: Pid, burst_time: i64 },

    #[error("Process {pid}: arrival time must not be negative, got {arrival_time}")]
    #[diagnostic(
        code(config::invalid_arrival),
        help("Arrival times are offsets from the start of the run.")
    )]
    InvalidArrival { pid: Pid, arrival_time: i64 },

    #[error("Process {pid}: priority must not be negative, got {priority}")]
    #[diagnostic(code(config::invalid_priority))]
    InvalidPriority { pid: Pid, priority: i64 },

    #[error("Duplicate process id {0}")]
    #[diagnostic(
        code(config::duplicate_pid),
        help("Process ids must be unique within one scheduler run.")
    )]
    DuplicatePid(Pid),

    #[error("Invalid setting {name}: {reason}")]
    #[diagnostic(code(config::invalid_setting))]
    InvalidSetting { name: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    #[diagnostic(
        code(config::load_failed),
        help("Check that SCHED_SIM_CONFIG points to a readable JSON file.")
    )]
    LoadFailed(String),
}

/// Worker contract violations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Process {0} has not finished executing")]
    #[diagnostic(code(process::not_finished))]
    NotFinished(Pid),

    #[error("Metrics for process {0} were already stored")]
    #[diagnostic(code(process::metrics_already_stored))]
    MetricsAlreadyStored(Pid),

    #[error("Process {0} was granted execution while not running")]
    #[diagnostic(
        code(process::not_running),
        help("Resume the process before granting it execution time.")
    )]
    NotRunning(Pid),

    #[error("Process {pid}: completion at {completion_time} ms precedes arrival + burst ({earliest} ms)")]
    #[diagnostic(code(process::invalid_completion))]
    InvalidCompletion {
        pid: Pid,
        completion_time: Millis,
        earliest: Millis,
    },

    #[error("Failed to spawn execution unit for process {pid}: {reason}")]
    #[diagnostic(code(process::spawn_failed))]
    SpawnFailed { pid: Pid, reason: String },

    #[error("Process {pid}: invalid state transition {from:?} -> {to:?}")]
    #[diagnostic(code(process::invalid_transition))]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
}

/// Scheduler-level errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Scheduler has already run; build a fresh process set for each run")]
    #[diagnostic(
        code(scheduler::already_run),
        help("A process belongs to exactly one engine run.")
    )]
    AlreadyRun,

    #[error("Metadata requested before process {0} finished")]
    #[diagnostic(code(scheduler::incomplete_run))]
    IncompleteRun(Pid),

    #[error("Sink error: {0}")]
    #[diagnostic(code(scheduler::sink))]
    Sink(String),
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        SchedulerError::Sink(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_scheduler_error() {
        let err: SchedulerError = ConfigError::DuplicatePid(3).into();
        assert_eq!(err.to_string(), "Duplicate process id 3");
    }

    #[test]
    fn test_errors_serialize_with_tag() {
        let err = ProcessError::NotFinished(7);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"error_type\":\"not_finished\""));
    }
}
