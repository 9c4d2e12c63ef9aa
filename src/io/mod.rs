/*!
 * Input and Output
 * Process loader, sink interfaces and CSV exporters
 */

pub mod export;
pub mod loader;
pub mod traits;

pub use export::{CsvMetadataWriter, CsvTimelineWriter, METADATA_HEADER};
pub use loader::{load_processes, parse_processes, parse_str, LoadReport, ParseIssue, ParseIssueKind};
pub use traits::{Discard, MetadataSink, TimelineSink};
