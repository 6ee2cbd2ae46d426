//! Run simulation.
//!
//! Running a playbook does not execute anything. It queues one message per
//! entry, spaced a fixed interval apart, followed by a completion message.
//! The queue is polled by whoever owns the clock: the TUI tick or the async
//! [`drive`] loop used by the CLI. Stopping cancels everything still queued.

use std::future::Future;
use std::time::{Duration, Instant};

use super::{Action, Dashboard, PlaybookItem};

/// Default spacing between simulated pipeline executions.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Message emitted once every queued pipeline of a run has been logged.
pub const COMPLETION_MESSAGE: &str = "✅ Playbook executed successfully.";

/// Identifier of a started run.
pub type RunId = u64;

/// A message waiting for its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    /// Run that queued the message
    pub run: RunId,
    /// When the message becomes due
    pub due: Instant,
    /// Text to log
    pub message: String,
}

/// Deadline queue for simulated runs.
#[derive(Debug, Clone)]
pub struct RunSimulator {
    interval: Duration,
    pending: Vec<PendingMessage>,
    runs_started: RunId,
}

impl Default for RunSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl RunSimulator {
    /// Create a simulator with the given spacing.
    pub fn new(interval: Duration) -> Self {
        Self { interval, pending: Vec::new(), runs_started: 0 }
    }

    /// Queue a run of the given entries.
    ///
    /// Names are captured now, so later edits to the playbook do not affect
    /// a run in flight. Returns `None` without queueing anything when
    /// `items` is empty.
    pub fn start(&mut self, items: &[PlaybookItem], now: Instant) -> Option<RunId> {
        if items.is_empty() {
            return None;
        }

        self.runs_started += 1;
        let run = self.runs_started;

        let mut step = 0u32;
        for item in items {
            step += 1;
            self.pending.push(PendingMessage {
                run,
                due: now + self.interval * step,
                message: format!("▶️ Executing pipeline {}: {}", step, item.name()),
            });
        }
        self.pending.push(PendingMessage {
            run,
            due: now + self.interval * (step + 1),
            message: COMPLETION_MESSAGE.to_string(),
        });

        // Stable: equal deadlines from overlapping runs keep enqueue order
        self.pending.sort_by_key(|m| m.due);

        tracing::debug!(run, steps = step, interval = ?self.interval, "run queued");
        Some(run)
    }

    /// Take every message whose deadline is at or before `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<PendingMessage> {
        let due = self.pending.partition_point(|m| m.due <= now);
        self.pending.drain(..due).collect()
    }

    /// Drop every queued message. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().map(|m| m.due)
    }

    /// Messages still queued.
    pub fn pending(&self) -> &[PendingMessage] {
        &self.pending
    }

    /// Whether nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Drive queued runs to completion on the tokio clock.
///
/// Sleeps until each deadline and applies [`Action::Tick`]. If `stop`
/// resolves first, [`Action::Stop`] is applied and the loop ends. Every
/// time new log lines appear `on_lines` is called with them.
pub async fn drive<S, F>(dashboard: &mut Dashboard, stop: S, mut on_lines: F)
where
    S: Future<Output = ()>,
    F: FnMut(&[super::LogLine]),
{
    let mut stop = std::pin::pin!(stop);
    let mut cursor = dashboard.log().len();

    while let Some(due) = dashboard.simulator().next_due() {
        tokio::select! {
            () = tokio::time::sleep_until(tokio::time::Instant::from_std(due)) => {
                dashboard.apply(Action::Tick, tokio::time::Instant::now().into_std());
            }
            () = &mut stop => {
                dashboard.apply(Action::Stop, tokio::time::Instant::now().into_std());
                on_lines(dashboard.log().since(cursor));
                return;
            }
        }

        let fresh = dashboard.log().since(cursor);
        if !fresh.is_empty() {
            on_lines(fresh);
            cursor = dashboard.log().len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Catalog, Playbook};

    fn playbook(count: usize) -> Playbook {
        let catalog = Catalog::builtin();
        let mut playbook = Playbook::new();
        for pipeline in catalog.iter().take(count) {
            playbook.add(pipeline);
        }
        playbook
    }

    fn messages(batch: &[PendingMessage]) -> Vec<&str> {
        batch.iter().map(|m| m.message.as_str()).collect()
    }

    #[test]
    fn test_empty_run_queues_nothing() {
        let mut sim = RunSimulator::default();
        assert_eq!(sim.start(&[], Instant::now()), None);
        assert!(sim.is_idle());
    }

    #[test]
    fn test_run_schedule_spacing() {
        let mut sim = RunSimulator::new(Duration::from_secs(1));
        let now = Instant::now();
        let book = playbook(3);

        sim.start(book.items(), now);
        let pending = sim.pending();
        assert_eq!(pending.len(), 4);
        for (i, message) in pending.iter().enumerate() {
            assert_eq!(message.due, now + Duration::from_secs(i as u64 + 1));
        }
        assert_eq!(pending[3].message, COMPLETION_MESSAGE);
    }

    #[test]
    fn test_poll_releases_in_order() {
        let mut sim = RunSimulator::new(Duration::from_secs(1));
        let now = Instant::now();
        let book = playbook(2);
        sim.start(book.items(), now);

        assert!(sim.poll(now).is_empty());

        let first = sim.poll(now + Duration::from_millis(1500));
        assert_eq!(messages(&first), vec!["▶️ Executing pipeline 1: Build Pipeline"]);

        let rest = sim.poll(now + Duration::from_secs(10));
        assert_eq!(
            messages(&rest),
            vec!["▶️ Executing pipeline 2: Deploy Pipeline", COMPLETION_MESSAGE]
        );
        assert!(sim.is_idle());
    }

    #[test]
    fn test_cancel_all() {
        let mut sim = RunSimulator::default();
        let now = Instant::now();
        let book = playbook(4);
        sim.start(book.items(), now);

        assert_eq!(sim.cancel_all(), 5);
        assert!(sim.poll(now + Duration::from_secs(60)).is_empty());
        assert_eq!(sim.next_due(), None);
    }

    #[test]
    fn test_overlapping_runs_interleave() {
        let mut sim = RunSimulator::new(Duration::from_secs(1));
        let now = Instant::now();
        let book = playbook(1);

        let a = sim.start(book.items(), now).unwrap();
        let b = sim.start(book.items(), now + Duration::from_millis(500)).unwrap();
        assert_ne!(a, b);

        let runs: Vec<RunId> = sim.pending().iter().map(|m| m.run).collect();
        assert_eq!(runs, vec![a, b, a, b]);
    }
}
