/*!
 * Sink Traits
 * Interfaces consumed by the engine for timeline samples and finished records
 */

use crate::core::errors::SchedResult;
use crate::process::core::types::{ProcessReport, TimelineSample};

/// Consumer of timeline samples, one stream per engine run
pub trait TimelineSink {
    fn record(&mut self, sample: TimelineSample) -> SchedResult<()>;
}

/// Consumer of finished-process records
pub trait MetadataSink {
    fn record(&mut self, report: &ProcessReport) -> SchedResult<()>;
}

impl TimelineSink for Vec<TimelineSample> {
    fn record(&mut self, sample: TimelineSample) -> SchedResult<()> {
        self.push(sample);
        Ok(())
    }
}

impl MetadataSink for Vec<ProcessReport> {
    fn record(&mut self, report: &ProcessReport) -> SchedResult<()> {
        self.push(*report);
        Ok(())
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl TimelineSink for Discard {
    fn record(&mut self, _sample: TimelineSample) -> SchedResult<()> {
        Ok(())
    }
}

impl MetadataSink for Discard {
    fn record(&mut self, _report: &ProcessReport) -> SchedResult<()> {
        Ok(())
    }
}
