/*!
 * Monitoring
 * Structured tracing and post-run performance analysis
 */

pub mod analysis;
pub mod tracer;

pub use analysis::{comparison_table, gantt_segments, GanttSegment, PerformanceSummary};
pub use tracer::{generate_run_id, init_tracing};
