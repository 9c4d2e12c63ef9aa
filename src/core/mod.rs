/*!
 * Core Module
 * Fundamental simulator types, configuration, clocks and error handling
 */

pub mod clock;
pub mod config;
pub mod errors;
pub mod types;

// Re-export for convenience
pub use clock::{Clock, RealClock, VirtualClock};
pub use config::{ClockMode, SimulationConfig};
pub use errors::*;
pub use types::*;
