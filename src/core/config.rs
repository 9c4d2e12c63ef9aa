/*!
 * Simulation Configuration
 *
 * Runtime configuration for execution granularity, sampling and clock selection
 */

use super::clock::{Clock, RealClock, VirtualClock};
use super::errors::ConfigError;
use super::types::{Millis, DEFAULT_CHUNK_MS, DEFAULT_QUANTUM_MS, DEFAULT_SAMPLE_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Clock selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Instant virtual time (headless, deterministic)
    #[default]
    Virtual,
    /// Wall-clock pacing, one real millisecond per simulated millisecond
    Realtime,
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Execution granularity of a worker; pauses take effect at chunk boundaries
    pub chunk_ms: Millis,
    /// Spacing of timeline samples
    pub sample_interval_ms: Millis,
    /// Round-robin time quantum
    pub quantum_ms: Millis,
    /// Clock driving the run
    pub clock: ClockMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            chunk_ms: DEFAULT_CHUNK_MS,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            quantum_ms: DEFAULT_QUANTUM_MS,
            clock: ClockMode::Virtual,
        }
    }
}

impl SimulationConfig {
    /// Default granularity paced against the wall clock
    pub const fn realtime() -> Self {
        Self {
            chunk_ms: DEFAULT_CHUNK_MS,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            quantum_ms: DEFAULT_QUANTUM_MS,
            clock: ClockMode::Realtime,
        }
    }

    /// Textbook unit-time model: 1 ms chunks, 1 ms sampling, 2 ms quantum
    pub const fn unit_step() -> Self {
        Self {
            chunk_ms: 1,
            sample_interval_ms: 1,
            quantum_ms: 2,
            clock: ClockMode::Virtual,
        }
    }

    pub fn with_quantum(mut self, quantum_ms: Millis) -> Self {
        self.quantum_ms = quantum_ms;
        self
    }

    pub fn with_chunk(mut self, chunk_ms: Millis) -> Self {
        self.chunk_ms = chunk_ms;
        self
    }

    pub fn with_sample_interval(mut self, sample_interval_ms: Millis) -> Self {
        self.sample_interval_ms = sample_interval_ms;
        self
    }

    /// Reject settings the dispatch loop cannot make progress with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("chunk_ms", self.chunk_ms),
            ("sample_interval_ms", self.sample_interval_ms),
            ("quantum_ms", self.quantum_ms),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidSetting {
                    name: name.to_string(),
                    reason: "must be at least 1 ms".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build the clock selected by this configuration
    pub fn build_clock(&self) -> Arc<dyn Clock> {
        match self.clock {
            ClockMode::Virtual => Arc::new(VirtualClock::new()),
            ClockMode::Realtime => Arc::new(RealClock::new()),
        }
    }

    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the environment
    ///
    /// Environment variables:
    /// - SCHED_SIM_CONFIG: JSON file used as the base (default: built-in defaults)
    /// - SCHED_SIM_CHUNK_MS, SCHED_SIM_SAMPLE_MS, SCHED_SIM_QUANTUM_MS: overrides
    /// - SCHED_SIM_REALTIME: "1" or "true" paces the run against the wall clock
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("SCHED_SIM_CONFIG") {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };

        if let Some(v) = env_millis("SCHED_SIM_CHUNK_MS")? {
            config.chunk_ms = v;
        }
        if let Some(v) = env_millis("SCHED_SIM_SAMPLE_MS")? {
            config.sample_interval_ms = v;
        }
        if let Some(v) = env_millis("SCHED_SIM_QUANTUM_MS")? {
            config.quantum_ms = v;
        }
        if let Ok(v) = std::env::var("SCHED_SIM_REALTIME") {
            if v == "1" || v.eq_ignore_ascii_case("true") {
                config.clock = ClockMode::Realtime;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_millis(name: &str) -> Result<Option<Millis>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<Millis>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidSetting {
                name: name.to_string(),
                reason: format!("{:?}: {}", raw, e),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.chunk_ms, 10);
        assert_eq!(config.sample_interval_ms, 5);
        assert_eq!(config.quantum_ms, 40);
        assert_eq!(config.clock, ClockMode::Virtual);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_quantum_rejected() {
        let config = SimulationConfig::default().with_quantum(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { ref name, .. }) if name == "quantum_ms"
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"quantum_ms": 20}"#).unwrap();
        assert_eq!(config.quantum_ms, 20);
        assert_eq!(config.chunk_ms, 10);
    }

    #[test]
    fn test_clock_mode_serde() {
        let config: SimulationConfig = serde_json::from_str(r#"{"clock": "realtime"}"#).unwrap();
        assert_eq!(config.clock, ClockMode::Realtime);
    }
}
