/*!
 * Performance Analysis
 *
 * Post-run numbers computed from the exported metadata and timeline:
 * waiting/burst/response averages, context switches, Gantt segments, and a
 * side-by-side comparison of policies.
 */

use crate::core::types::{Millis, Pid};
use crate::process::core::types::{ProcessReport, SchedulingPolicy, TimelineSample};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

/// A contiguous stretch of the timeline owned by one process (or idle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttSegment {
    pub start: Millis,
    pub end: Millis,
    pub pid: Option<Pid>,
}

/// Collapse consecutive samples of the same process into segments
///
/// Each segment ends where the next one starts; the last one ends at `end`.
pub fn gantt_segments(timeline: &[TimelineSample], end: Millis) -> Vec<GanttSegment> {
    let mut segments: Vec<GanttSegment> = Vec::new();

    for sample in timeline {
        match segments.last_mut() {
            Some(last) if last.pid == sample.pid => {}
            Some(last) => {
                last.end = sample.elapsed_ms;
                segments.push(GanttSegment {
                    start: sample.elapsed_ms,
                    end: sample.elapsed_ms,
                    pid: sample.pid,
                });
            }
            None => segments.push(GanttSegment {
                start: sample.elapsed_ms,
                end: sample.elapsed_ms,
                pid: sample.pid,
            }),
        }
    }

    if let Some(last) = segments.last_mut() {
        last.end = end.max(last.start);
    }
    segments
}

/// Aggregate performance of one policy run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub processes: usize,
    pub avg_waiting_ms: f64,
    pub peak_waiting_ms: Millis,
    pub avg_turnaround_ms: f64,
    pub avg_burst_ms: f64,
    /// First appearance on the timeline minus arrival, averaged over all processes
    pub avg_response_ms: f64,
    /// Adjacent timeline samples naming different processes (idle included)
    pub context_switches: usize,
}

impl PerformanceSummary {
    pub fn evaluate(reports: &[ProcessReport], timeline: &[TimelineSample]) -> Self {
        let context_switches = timeline
            .windows(2)
            .filter(|pair| pair[0].pid != pair[1].pid)
            .count();

        if reports.is_empty() {
            return Self {
                context_switches,
                ..Self::default()
            };
        }

        let n = reports.len() as f64;
        let total_waiting: Millis = reports.iter().map(|r| r.waiting_time).sum();
        let total_turnaround: Millis = reports.iter().map(|r| r.turnaround_time).sum();
        let total_burst: Millis = reports.iter().map(|r| r.burst_time).sum();
        let peak_waiting_ms = reports.iter().map(|r| r.waiting_time).max().unwrap_or(0);

        let mut first_seen: HashMap<Pid, Millis> = HashMap::new();
        for sample in timeline {
            if let Some(pid) = sample.pid {
                first_seen.entry(pid).or_insert(sample.elapsed_ms);
            }
        }
        let total_response: Millis = reports
            .iter()
            .filter_map(|r| {
                first_seen
                    .get(&r.id)
                    .map(|&t| t.saturating_sub(r.arrival_time))
            })
            .sum();

        Self {
            processes: reports.len(),
            avg_waiting_ms: total_waiting as f64 / n,
            peak_waiting_ms,
            avg_turnaround_ms: total_turnaround as f64 / n,
            avg_burst_ms: total_burst as f64 / n,
            avg_response_ms: total_response as f64 / n,
            context_switches,
        }
    }
}

/// Render a text table comparing policies
pub fn comparison_table(rows: &[(SchedulingPolicy, PerformanceSummary)]) -> String {
    const HEADERS: [&str; 6] = [
        "Scheduling Algo",
        "Avg Waiting (ms)",
        "Peak Waiting (ms)",
        "Avg Turnaround (ms)",
        "Avg Response (ms)",
        "Context Switches",
    ];

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|(policy, s)| {
            [
                policy.to_string(),
                format!("{:.2}", s.avg_waiting_ms),
                s.peak_waiting_ms.to_string(),
                format!("{:.2}", s.avg_turnaround_ms),
                format!("{:.2}", s.avg_response_ms),
                s.context_switches.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", border);
    let _ = writeln!(out, "{}", format_row(&HEADERS.map(String::from), &widths));
    let _ = writeln!(out, "{}", border);
    for row in &cells {
        let _ = writeln!(out, "{}", format_row(row, &widths));
    }
    let _ = writeln!(out, "{}", border);
    out
}

fn format_row(cells: &[String; 6], widths: &[usize; 6]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {:^width$} |", cell, width = *width));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: Pid, arrival: Millis, burst: Millis, completion: Millis) -> ProcessReport {
        let turnaround = completion - arrival;
        ProcessReport {
            id,
            arrival_time: arrival,
            burst_time: burst,
            priority: 0,
            completion_time: completion,
            turnaround_time: turnaround,
            waiting_time: turnaround - burst,
        }
    }

    fn timeline(values: &[(Millis, i64)]) -> Vec<TimelineSample> {
        values
            .iter()
            .map(|&(t, pid)| {
                if pid < 0 {
                    TimelineSample::idle(t)
                } else {
                    TimelineSample::running(t, pid as Pid)
                }
            })
            .collect()
    }

    #[test]
    fn test_segments_collapse_runs() {
        let samples = timeline(&[(0, -1), (1, 1), (2, 1), (3, 2), (4, 2)]);
        let segments = gantt_segments(&samples, 5);
        assert_eq!(
            segments,
            vec![
                GanttSegment { start: 0, end: 1, pid: None },
                GanttSegment { start: 1, end: 3, pid: Some(1) },
                GanttSegment { start: 3, end: 5, pid: Some(2) },
            ]
        );
    }

    #[test]
    fn test_summary_values() {
        let reports = vec![report(1, 0, 5, 5), report(2, 2, 3, 8)];
        let samples = timeline(&[(0, 1), (4, 1), (5, 2), (7, 2)]);
        let summary = PerformanceSummary::evaluate(&reports, &samples);

        assert_eq!(summary.processes, 2);
        assert_eq!(summary.avg_waiting_ms, 1.5);
        assert_eq!(summary.peak_waiting_ms, 3);
        assert_eq!(summary.avg_burst_ms, 4.0);
        // P1 responds at 0, P2 at 5 - 2 = 3
        assert_eq!(summary.avg_response_ms, 1.5);
        assert_eq!(summary.context_switches, 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = PerformanceSummary::evaluate(&[], &[]);
        assert_eq!(summary.processes, 0);
        assert_eq!(summary.avg_waiting_ms, 0.0);
    }

    #[test]
    fn test_table_lists_every_policy() {
        let rows = vec![
            (SchedulingPolicy::Fcfs, PerformanceSummary::default()),
            (SchedulingPolicy::RoundRobin, PerformanceSummary::default()),
        ];
        let table = comparison_table(&rows);
        assert!(table.contains("FCFS"));
        assert!(table.contains("Round Robin"));
        assert_eq!(table.lines().count(), 6);
    }
}
