/*!
 * Ready Queue and Arrival Gate
 *
 * One ready-queue implementation for every policy, specialized by the key it
 * orders on. Ties on the primary key go to the incumbent (the process selected
 * on the previous tick), then to the lowest process id, so timelines are
 * reproducible.
 */

use crate::core::types::Millis;
use crate::process::core::types::SchedulingPolicy;
use crate::process::worker::ProcessWorker;
use std::collections::VecDeque;

/// Key a ready queue orders its entries on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOrdering {
    /// Ascending arrival time
    Arrival,
    /// Ascending total burst time
    BurstTime,
    /// Ascending `burst_time - executed_time`
    RemainingTime,
    /// Descending static priority
    Priority,
    /// Insertion order
    Fifo,
}

impl ReadyOrdering {
    pub fn for_policy(policy: SchedulingPolicy) -> Self {
        match policy {
            SchedulingPolicy::Fcfs => ReadyOrdering::Arrival,
            SchedulingPolicy::Sjf => ReadyOrdering::BurstTime,
            SchedulingPolicy::Srtf => ReadyOrdering::RemainingTime,
            SchedulingPolicy::RoundRobin => ReadyOrdering::Fifo,
            SchedulingPolicy::Priority => ReadyOrdering::Priority,
        }
    }

    /// Primary key, smaller is selected first
    fn primary_key(self, worker: &ProcessWorker) -> i64 {
        let record = worker.record();
        match self {
            ReadyOrdering::Arrival => record.arrival_time as i64,
            ReadyOrdering::BurstTime => record.burst_time as i64,
            ReadyOrdering::RemainingTime => worker.remaining_time() as i64,
            ReadyOrdering::Priority => -i64::from(record.priority),
            ReadyOrdering::Fifo => 0,
        }
    }
}

/// Arrived, unfinished processes awaiting selection (indices into the process set)
#[derive(Debug, Clone)]
pub struct ReadyQueue {
    ordering: ReadyOrdering,
    entries: VecDeque<usize>,
}

impl ReadyQueue {
    pub fn new(ordering: ReadyOrdering) -> Self {
        Self {
            ordering,
            entries: VecDeque::new(),
        }
    }

    /// Append at the tail
    pub fn push(&mut self, index: usize) {
        self.entries.push_back(index);
    }

    /// Pick the next process without removing it
    pub fn select(&self, workers: &[ProcessWorker], incumbent: Option<usize>) -> Option<usize> {
        match self.ordering {
            ReadyOrdering::Fifo => self.entries.front().copied(),
            ordering => self.entries.iter().copied().min_by_key(|&index| {
                let worker = &workers[index];
                (
                    ordering.primary_key(worker),
                    Some(index) != incumbent,
                    worker.id(),
                )
            }),
        }
    }

    /// Remove an entry, wherever it sits
    pub fn remove(&mut self, index: usize) -> bool {
        match self.entries.iter().position(|&e| e == index) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Move the head to the tail (round-robin requeue)
    pub fn requeue_head(&mut self) {
        if let Some(head) = self.entries.pop_front() {
            self.entries.push_back(head);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Processes that have not arrived yet, ordered by `(arrival_time, id)`
#[derive(Debug, Clone)]
pub struct ArrivalGate {
    pending: VecDeque<usize>,
}

impl ArrivalGate {
    pub fn new(workers: &[ProcessWorker]) -> Self {
        let mut order: Vec<usize> = (0..workers.len()).collect();
        order.sort_by_key(|&i| (workers[i].record().arrival_time, workers[i].id()));
        Self {
            pending: order.into(),
        }
    }

    /// Release every process whose arrival time has elapsed, in gate order
    pub fn admit(&mut self, now: Millis, workers: &[ProcessWorker]) -> Vec<usize> {
        let mut arrived = Vec::new();
        while let Some(&index) = self.pending.front() {
            if workers[index].record().arrival_time > now {
                break;
            }
            self.pending.pop_front();
            arrived.push(index);
        }
        arrived
    }

    /// Arrival time of the next process still behind the gate
    pub fn next_arrival(&self, workers: &[ProcessWorker]) -> Option<Millis> {
        self.pending
            .front()
            .map(|&index| workers[index].record().arrival_time)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::VirtualClock;
    use crate::process::core::types::ProcessRecord;
    use std::sync::Arc;

    fn workers(rows: &[(u32, u64, u64, u32)]) -> Vec<ProcessWorker> {
        let clock = Arc::new(VirtualClock::new());
        rows.iter()
            .map(|&(id, arrival_time, burst_time, priority)| {
                let record = ProcessRecord {
                    id,
                    arrival_time,
                    burst_time,
                    priority,
                };
                ProcessWorker::spawn(record, 10, clock.clone()).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_gate_orders_by_arrival_then_id() {
        let set = workers(&[(3, 5, 1, 0), (1, 5, 1, 0), (2, 0, 1, 0)]);
        let mut gate = ArrivalGate::new(&set);
        assert_eq!(gate.next_arrival(&set), Some(0));
        assert_eq!(gate.admit(4, &set), vec![2]);
        assert_eq!(gate.admit(5, &set), vec![1, 0]);
        assert!(gate.is_empty());
    }

    #[test]
    fn test_burst_ordering_breaks_ties_by_id() {
        let set = workers(&[(7, 0, 4, 0), (2, 0, 4, 0), (5, 0, 9, 0)]);
        let mut queue = ReadyQueue::new(ReadyOrdering::BurstTime);
        for i in 0..set.len() {
            queue.push(i);
        }
        assert_eq!(queue.select(&set, None), Some(1));
    }

    #[test]
    fn test_incumbent_keeps_cpu_on_tie() {
        let set = workers(&[(1, 0, 4, 3), (2, 0, 4, 3)]);
        let mut queue = ReadyQueue::new(ReadyOrdering::Priority);
        queue.push(0);
        queue.push(1);
        assert_eq!(queue.select(&set, None), Some(0));
        assert_eq!(queue.select(&set, Some(1)), Some(1));
    }

    #[test]
    fn test_priority_prefers_higher_value() {
        let set = workers(&[(1, 0, 4, 1), (2, 0, 4, 8), (3, 0, 4, 5)]);
        let mut queue = ReadyQueue::new(ReadyOrdering::Priority);
        for i in 0..set.len() {
            queue.push(i);
        }
        assert_eq!(queue.select(&set, Some(0)), Some(1));
    }

    #[test]
    fn test_fifo_requeue() {
        let set = workers(&[(1, 0, 4, 0), (2, 0, 4, 0)]);
        let mut queue = ReadyQueue::new(ReadyOrdering::Fifo);
        queue.push(0);
        queue.push(1);
        assert_eq!(queue.select(&set, None), Some(0));
        queue.requeue_head();
        assert_eq!(queue.select(&set, None), Some(1));
        assert!(queue.remove(0));
        assert_eq!(queue.len(), 1);
    }
}
