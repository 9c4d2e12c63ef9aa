/*!
 * Process Core
 * Shared process data types
 */

pub mod types;

pub use types::*;
