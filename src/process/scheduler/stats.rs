/*!
 * Scheduler Statistics
 * Read access to run counters
 */

use super::SchedulerEngine;
use crate::process::core::types::RunStats;

impl SchedulerEngine {
    /// Snapshot of the run counters (lock-free)
    pub fn stats(&self) -> RunStats {
        self.stats.snapshot()
    }
}
