/*!
 * CSV Exporters
 * Timeline and metadata writers over any `std::io::Write`
 */

use super::traits::{MetadataSink, TimelineSink};
use crate::core::errors::SchedResult;
use crate::process::core::types::{ProcessReport, TimelineSample};
use std::io::Write;

/// Header row of the metadata export
pub const METADATA_HEADER: &str =
    "id,arrival_time,burst_time,priority,completion_time,turnaround_time,waiting_time";

/// Writes `elapsed_ms,pid` rows, `-1` for idle, without a header
pub struct CsvTimelineWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvTimelineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn flush(&mut self) -> SchedResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TimelineSink for CsvTimelineWriter<W> {
    fn record(&mut self, sample: TimelineSample) -> SchedResult<()> {
        writeln!(self.writer, "{},{}", sample.elapsed_ms, sample.pid_value())?;
        Ok(())
    }
}

/// Writes one metadata row per finished process, header first
pub struct CsvMetadataWriter<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> CsvMetadataWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Write the header even if no rows follow
    pub fn write_header(&mut self) -> SchedResult<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", METADATA_HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> SchedResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MetadataSink for CsvMetadataWriter<W> {
    fn record(&mut self, report: &ProcessReport) -> SchedResult<()> {
        self.write_header()?;
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{}",
            report.id,
            report.arrival_time,
            report.burst_time,
            report.priority,
            report.completion_time,
            report.turnaround_time,
            report.waiting_time
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_rows() {
        let mut writer = CsvTimelineWriter::new(Vec::new());
        writer.record(TimelineSample::idle(0)).unwrap();
        writer.record(TimelineSample::running(5, 2)).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "0,-1\n5,2\n");
    }

    #[test]
    fn test_metadata_rows() {
        let mut writer = CsvMetadataWriter::new(Vec::new());
        let report = ProcessReport {
            id: 2,
            arrival_time: 2,
            burst_time: 3,
            priority: 1,
            completion_time: 8,
            turnaround_time: 6,
            waiting_time: 3,
        };
        writer.record(&report).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, format!("{}\n2,2,3,1,8,6,3\n", METADATA_HEADER));
    }

    #[test]
    fn test_header_written_once() {
        let mut writer = CsvMetadataWriter::new(Vec::new());
        writer.write_header().unwrap();
        writer.write_header().unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
