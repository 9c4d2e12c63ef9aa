/*!
 * Sequential Reference Simulator
 *
 * Straight-line FCFS, SJF and Round Robin on whole milliseconds, without
 * workers or clocks. Used as an oracle for the concurrent engine running with
 * `SimulationConfig::unit_step()`.
 */

use super::core::types::ProcessRecord;
use crate::core::types::{Millis, Pid};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// First dispatch and completion of one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOutcome {
    pub id: Pid,
    pub start_time: Millis,
    pub completion_time: Millis,
}

impl ReferenceOutcome {
    pub fn turnaround_time(&self, record: &ProcessRecord) -> Millis {
        self.completion_time - record.arrival_time
    }

    pub fn waiting_time(&self, record: &ProcessRecord) -> Millis {
        self.turnaround_time(record) - record.burst_time
    }
}

/// Indices in gate order: `(arrival_time, id)`
fn arrival_order(processes: &[ProcessRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..processes.len()).collect();
    order.sort_by_key(|&i| (processes[i].arrival_time, processes[i].id));
    order
}

fn collect(processes: &[ProcessRecord], start: &[Millis], completion: &[Millis]) -> Vec<ReferenceOutcome> {
    processes
        .iter()
        .enumerate()
        .map(|(i, p)| ReferenceOutcome {
            id: p.id,
            start_time: start[i],
            completion_time: completion[i],
        })
        .collect()
}

/// First come, first served; outcomes in input order
pub fn reference_fcfs(processes: &[ProcessRecord]) -> Vec<ReferenceOutcome> {
    let mut start = vec![0; processes.len()];
    let mut completion = vec![0; processes.len()];
    let mut now = 0;

    for i in arrival_order(processes) {
        now = now.max(processes[i].arrival_time);
        start[i] = now;
        now += processes[i].burst_time;
        completion[i] = now;
    }

    collect(processes, &start, &completion)
}

/// Non-preemptive shortest job first; outcomes in input order
pub fn reference_sjf(processes: &[ProcessRecord]) -> Vec<ReferenceOutcome> {
    let n = processes.len();
    let mut start = vec![0; n];
    let mut completion = vec![0; n];
    let mut done = vec![false; n];
    let mut now = 0;

    for _ in 0..n {
        let shortest = (0..n)
            .filter(|&i| !done[i] && processes[i].arrival_time <= now)
            .min_by_key(|&i| (processes[i].burst_time, processes[i].id));

        let i = match shortest {
            Some(i) => i,
            None => {
                // Idle until the next arrival, then pick among it and its ties
                now = (0..n)
                    .filter(|&i| !done[i])
                    .map(|i| processes[i].arrival_time)
                    .min()
                    .unwrap_or(now);
                match (0..n)
                    .filter(|&i| !done[i] && processes[i].arrival_time <= now)
                    .min_by_key(|&i| (processes[i].burst_time, processes[i].id))
                {
                    Some(i) => i,
                    None => break,
                }
            }
        };

        start[i] = now;
        now += processes[i].burst_time;
        completion[i] = now;
        done[i] = true;
    }

    collect(processes, &start, &completion)
}

/// Round robin with the given quantum; outcomes in input order
pub fn reference_round_robin(processes: &[ProcessRecord], quantum: Millis) -> Vec<ReferenceOutcome> {
    let n = processes.len();
    let quantum = quantum.max(1);
    let mut start: Vec<Option<Millis>> = vec![None; n];
    let mut completion = vec![0; n];
    let mut remaining: Vec<Millis> = processes.iter().map(|p| p.burst_time).collect();

    let mut pending: VecDeque<usize> = arrival_order(processes).into();
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut now = 0;
    let mut completed = 0;

    let admit = |now: Millis, pending: &mut VecDeque<usize>, queue: &mut VecDeque<usize>| {
        while let Some(&i) = pending.front() {
            if processes[i].arrival_time > now {
                break;
            }
            pending.pop_front();
            queue.push_back(i);
        }
    };

    while completed < n {
        admit(now, &mut pending, &mut queue);

        let Some(i) = queue.pop_front() else {
            match pending.front() {
                Some(&next) => now = processes[next].arrival_time,
                None => break,
            }
            continue;
        };

        start[i].get_or_insert(now);
        let slice = quantum.min(remaining[i]);
        now += slice;
        remaining[i] -= slice;

        admit(now, &mut pending, &mut queue);

        if remaining[i] > 0 {
            queue.push_back(i);
        } else {
            completion[i] = now;
            completed += 1;
        }
    }

    let start: Vec<Millis> = start.into_iter().map(|s| s.unwrap_or(0)).collect();
    collect(processes, &start, &completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<ProcessRecord> {
        [(1, 0, 5), (2, 2, 3), (3, 4, 1), (4, 6, 7)]
            .into_iter()
            .map(|(id, arrival_time, burst_time)| ProcessRecord {
                id,
                arrival_time,
                burst_time,
                priority: 0,
            })
            .collect()
    }

    fn completions(outcomes: &[ReferenceOutcome]) -> Vec<Millis> {
        outcomes.iter().map(|o| o.completion_time).collect()
    }

    #[test]
    fn test_fcfs_scenario() {
        let procs = scenario();
        let outcomes = reference_fcfs(&procs);
        assert_eq!(completions(&outcomes), vec![5, 8, 9, 16]);
        let waiting: Vec<Millis> = outcomes
            .iter()
            .zip(&procs)
            .map(|(o, p)| o.waiting_time(p))
            .collect();
        assert_eq!(waiting, vec![0, 3, 4, 3]);
    }

    #[test]
    fn test_sjf_scenario() {
        let outcomes = reference_sjf(&scenario());
        assert_eq!(completions(&outcomes), vec![5, 9, 6, 16]);
    }

    #[test]
    fn test_round_robin_scenario() {
        let outcomes = reference_round_robin(&scenario(), 2);
        assert_eq!(completions(&outcomes), vec![11, 8, 7, 16]);
    }

    #[test]
    fn test_idle_gap() {
        let procs = vec![ProcessRecord {
            id: 1,
            arrival_time: 10,
            burst_time: 3,
            priority: 0,
        }];
        assert_eq!(reference_sjf(&procs)[0].start_time, 10);
        assert_eq!(reference_round_robin(&procs, 2)[0].completion_time, 13);
    }
}
