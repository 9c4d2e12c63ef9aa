/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type (assigned by the caller, unique within one engine)
pub type Pid = u32;

/// Simulated time in milliseconds
pub type Millis = u64;

/// Static priority (higher is more important)
pub type Priority = u32;

/// Timeline value written for "no process active"
pub const IDLE_PID: i64 = -1;

/// Default execution chunk of a worker
pub const DEFAULT_CHUNK_MS: Millis = 10;

/// Default spacing between timeline samples
pub const DEFAULT_SAMPLE_INTERVAL_MS: Millis = 5;

/// Default round-robin time quantum
pub const DEFAULT_QUANTUM_MS: Millis = 40;
