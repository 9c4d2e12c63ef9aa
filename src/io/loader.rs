/*!
 * Process Loader
 *
 * Parses `id,arrival_time,burst_time,priority` rows. Malformed rows are kept
 * as structured issues next to the parsed processes instead of being dropped
 * silently. Value validation (positive burst etc.) happens when processes are
 * added to an engine.
 */

use crate::core::errors::SchedResult;
use crate::core::types::Pid;
use crate::process::core::types::ProcessSpec;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

const FIELD_COUNT: usize = 4;
const FIELD_NAMES: [&str; FIELD_COUNT] = ["id", "arrival_time", "burst_time", "priority"];

/// Why a row was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssueKind {
    #[error("expected 4 fields, found {found}")]
    FieldCount { found: usize },

    #[error("field {field} is not a valid integer: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("row is not valid UTF-8 after byte {valid_up_to}")]
    InvalidEncoding { valid_up_to: usize },
}

/// A rejected input row
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("line {line}: {kind}")]
pub struct ParseIssue {
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub kind: ParseIssueKind,
}

/// Parsed processes plus every rejected row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub processes: Vec<ProcessSpec>,
    pub issues: Vec<ParseIssue>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Parse rows from any buffered reader
pub fn parse_processes<R: BufRead>(mut reader: R) -> SchedResult<LoadReport> {
    let mut report = LoadReport::default();
    let mut seen_content = false;
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text,
            Err(e) => {
                seen_content = true;
                report.issues.push(ParseIssue {
                    line: line_no,
                    content: String::from_utf8_lossy(&buf).trim_end().to_string(),
                    kind: ParseIssueKind::InvalidEncoding {
                        valid_up_to: e.valid_up_to(),
                    },
                });
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Optional header row
        let first_row = !seen_content;
        seen_content = true;
        if first_row && is_header(trimmed) {
            continue;
        }

        match parse_row(trimmed) {
            Ok(spec) => report.processes.push(spec),
            Err(kind) => report.issues.push(ParseIssue {
                line: line_no,
                content: line.trim_end_matches(&['\n', '\r'][..]).to_string(),
                kind,
            }),
        }
    }

    Ok(report)
}

/// Parse rows from an in-memory string
pub fn parse_str(text: &str) -> LoadReport {
    // Reading from a byte slice cannot fail
    parse_processes(text.as_bytes()).unwrap_or_default()
}

/// Load processes from a file
pub fn load_processes(path: impl AsRef<Path>) -> SchedResult<LoadReport> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let report = parse_processes(BufReader::new(file))?;

    info!(
        path = %path.display(),
        processes = report.processes.len(),
        rejected = report.issues.len(),
        "loaded process input"
    );
    for issue in &report.issues {
        warn!(path = %path.display(), "{}", issue);
    }

    Ok(report)
}

fn is_header(line: &str) -> bool {
    line.split(',')
        .next()
        .map(|field| field.trim().eq_ignore_ascii_case("id"))
        .unwrap_or(false)
}

fn parse_row(line: &str) -> Result<ProcessSpec, ParseIssueKind> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseIssueKind::FieldCount {
            found: fields.len(),
        });
    }

    let mut values = [0i64; FIELD_COUNT];
    for (slot, (field, name)) in values.iter_mut().zip(fields.iter().zip(FIELD_NAMES)) {
        *slot = field
            .parse::<i64>()
            .map_err(|_| ParseIssueKind::InvalidNumber {
                field: name.to_string(),
                value: field.to_string(),
            })?;
    }

    let id = Pid::try_from(values[0]).map_err(|_| ParseIssueKind::InvalidNumber {
        field: "id".to_string(),
        value: fields[0].to_string(),
    })?;

    Ok(ProcessSpec::new(id, values[1], values[2], values[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_and_skips_header() {
        let report = parse_str("id,arrival_time,burst_time,priority\n1,0,50,2\n\n2, 20 ,30,1\n");
        assert!(report.is_clean());
        assert_eq!(
            report.processes,
            vec![ProcessSpec::new(1, 0, 50, 2), ProcessSpec::new(2, 20, 30, 1)]
        );
    }

    #[test]
    fn test_wrong_field_count_reported() {
        let report = parse_str("1,0,50,2\n2,10,30\n");
        assert_eq!(report.processes.len(), 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 2);
        assert_eq!(report.issues[0].kind, ParseIssueKind::FieldCount { found: 3 });
    }

    #[test]
    fn test_invalid_number_reported() {
        let report = parse_str("1,0,abc,2\n");
        assert_eq!(
            report.issues[0].kind,
            ParseIssueKind::InvalidNumber {
                field: "burst_time".to_string(),
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_encoding_reported_and_skipped() {
        let report = parse_processes(&b"1,0,5,0\n\xff\xfe,0,1,0\n2,1,3,0\n"[..]).unwrap();
        assert_eq!(
            report.processes,
            vec![ProcessSpec::new(1, 0, 5, 0), ProcessSpec::new(2, 1, 3, 0)]
        );
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 2);
        assert_eq!(
            report.issues[0].kind,
            ParseIssueKind::InvalidEncoding { valid_up_to: 0 }
        );
    }

    #[test]
    fn test_negative_id_reported() {
        let report = parse_str("-4,0,10,2\n");
        assert!(report.processes.is_empty());
        assert!(matches!(
            report.issues[0].kind,
            ParseIssueKind::InvalidNumber { ref field, .. } if field == "id"
        ));
    }

    #[test]
    fn test_header_only_skipped_on_first_row() {
        let report = parse_str("1,0,10,0\nid,arrival_time,burst_time,priority\n");
        assert_eq!(report.processes.len(), 1);
        assert_eq!(report.issues.len(), 1);
    }
}
