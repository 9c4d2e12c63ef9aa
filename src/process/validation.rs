/*!
 * Process Input Validation
 * Reject process descriptions the scheduler cannot simulate
 */

use super::core::types::{ProcessRecord, ProcessSpec};
use crate::core::errors::ConfigError;
use crate::core::types::{Millis, Priority};

/// Validate a process description and convert it into an immutable record
pub fn validate_spec(spec: &ProcessSpec) -> Result<ProcessRecord, ConfigError> {
    if spec.burst_time <= 0 {
        return Err(ConfigError::InvalidBurst {
            pid: spec.id,
            burst_time: spec.burst_time,
        });
    }

    if spec.arrival_time < 0 {
        return Err(ConfigError::InvalidArrival {
            pid: spec.id,
            arrival_time: spec.arrival_time,
        });
    }

    let priority = Priority::try_from(spec.priority).map_err(|_| ConfigError::InvalidPriority {
        pid: spec.id,
        priority: spec.priority,
    })?;

    Ok(ProcessRecord {
        id: spec.id,
        arrival_time: spec.arrival_time as Millis,
        burst_time: spec.burst_time as Millis,
        priority,
    })
}
