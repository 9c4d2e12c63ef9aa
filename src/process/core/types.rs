/*!
 * Process Types
 * Common types for the process model and scheduling policies
 */

use crate::core::types::{Millis, Pid, Priority, IDLE_PID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unvalidated process description as supplied by a caller or the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: Pid,
    pub arrival_time: i64,
    pub burst_time: i64,
    pub priority: i64,
}

impl ProcessSpec {
    #[inline]
    #[must_use]
    pub fn new(id: Pid, arrival_time: i64, burst_time: i64, priority: i64) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
            priority,
        }
    }
}

/// Validated, immutable identity and timing of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: Pid,
    pub arrival_time: Millis,
    pub burst_time: Millis,
    pub priority: Priority,
}

/// Process lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created, arrival time not yet reached
    Waiting,
    /// Arrived, not selected
    Ready,
    /// Selected and executing
    Running,
    /// Preempted, waiting to be selected again
    Paused,
    /// Executed its whole burst (terminal)
    Finished,
}

impl ProcessState {
    /// Whether the lifecycle allows moving from `self` to `to`
    pub fn can_transition_to(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (Waiting, Ready)
                | (Ready, Running)
                | (Running, Paused)
                | (Paused, Ready)
                | (Running, Finished)
        )
    }
}

/// Metrics written once when a process finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub completion_time: Millis,
    pub turnaround_time: Millis,
    pub waiting_time: Millis,
}

/// Exported per-process record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub id: Pid,
    pub arrival_time: Millis,
    pub burst_time: Millis,
    pub priority: Priority,
    pub completion_time: Millis,
    pub turnaround_time: Millis,
    pub waiting_time: Millis,
}

impl ProcessReport {
    pub fn new(record: &ProcessRecord, metrics: &ProcessMetrics) -> Self {
        Self {
            id: record.id,
            arrival_time: record.arrival_time,
            burst_time: record.burst_time,
            priority: record.priority,
            completion_time: metrics.completion_time,
            turnaround_time: metrics.turnaround_time,
            waiting_time: metrics.waiting_time,
        }
    }
}

/// One timeline (Gantt) data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSample {
    pub elapsed_ms: Millis,
    /// Active process, `None` when idle
    pub pid: Option<Pid>,
}

impl TimelineSample {
    pub fn running(elapsed_ms: Millis, pid: Pid) -> Self {
        Self {
            elapsed_ms,
            pid: Some(pid),
        }
    }

    pub fn idle(elapsed_ms: Millis) -> Self {
        Self {
            elapsed_ms,
            pid: None,
        }
    }

    /// Exported process column, `-1` for idle
    pub fn pid_value(&self) -> i64 {
        self.pid.map(i64::from).unwrap_or(IDLE_PID)
    }
}

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// First come, first served (non-preemptive)
    Fcfs,
    /// Shortest job first (non-preemptive)
    Sjf,
    /// Shortest remaining time first (preemptive)
    Srtf,
    /// Round robin with a fixed quantum
    RoundRobin,
    /// Static priority, higher value first (preemptive)
    Priority,
}

impl SchedulingPolicy {
    pub const ALL: [SchedulingPolicy; 5] = [
        SchedulingPolicy::Fcfs,
        SchedulingPolicy::Sjf,
        SchedulingPolicy::Srtf,
        SchedulingPolicy::RoundRobin,
        SchedulingPolicy::Priority,
    ];

    pub fn is_preemptive(self) -> bool {
        !matches!(self, SchedulingPolicy::Fcfs | SchedulingPolicy::Sjf)
    }

    /// Short lowercase name, used for output file names
    pub fn short_name(self) -> &'static str {
        match self {
            SchedulingPolicy::Fcfs => "fcfs",
            SchedulingPolicy::Sjf => "sjf",
            SchedulingPolicy::Srtf => "srtf",
            SchedulingPolicy::RoundRobin => "rr",
            SchedulingPolicy::Priority => "ps",
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulingPolicy::Fcfs => "FCFS",
            SchedulingPolicy::Sjf => "SJF",
            SchedulingPolicy::Srtf => "SRTF",
            SchedulingPolicy::RoundRobin => "Round Robin",
            SchedulingPolicy::Priority => "Priority",
        };
        f.write_str(name)
    }
}

/// Counters collected during one engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub policy: Option<SchedulingPolicy>,
    /// Chunks granted to workers
    pub dispatches: u64,
    /// Selections of a process different from the previous one
    pub context_switches: u64,
    /// Pauses of an unfinished process in favor of another
    pub preemptions: u64,
    pub idle_samples: u64,
    pub timeline_samples: u64,
    pub quantum_ms: Millis,
}

/// Outcome of a completed engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub policy: SchedulingPolicy,
    pub run_id: String,
    /// Elapsed simulated time until the last process finished
    pub makespan_ms: Millis,
    pub processes: usize,
    pub stats: RunStats,
}
