//! Delayed one-shot tasks
//!
//! A couple of host notifications are deliberately deferred by a few
//! milliseconds (hiding chrome that the host has not built yet, volume events
//! that should trail the widget's own). The delay source is injectable so
//! tests can advance time by hand.

use std::cell::{Cell, RefCell};
use std::time::Duration;

/// A deferred task
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after a delay on the UI thread
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Scheduler backed by tokio timers.
///
/// Tasks are spawned with `spawn_local`, so calls must happen inside a
/// `tokio::task::LocalSet`.
#[cfg(feature = "tokio-scheduler")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

#[cfg(feature = "tokio-scheduler")]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

struct Entry {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Scheduler driven by an explicit clock
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<Vec<Entry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks not yet run
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Advance the clock and run every task that became due, in due order.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut ran = 0;

        while let Some(entry) = self.pop_due(target) {
            self.now.set(entry.due.max(self.now.get()));
            (entry.task)();
            ran += 1;
        }

        self.now.set(target);
        ran
    }

    /// Run everything queued, including tasks scheduled by those tasks
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            let next_due = self.queue.borrow().iter().map(|e| e.due).min();
            match next_due {
                Some(due) => ran += self.advance(due.saturating_sub(self.now.get())),
                None => return ran,
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Entry> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= target)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(queue.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(Entry {
            due: self.now.get() + delay,
            seq,
            task,
        });
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| -> Task {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_manual_runs_in_due_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(Duration::from_millis(50), task("late"));
        scheduler.schedule(Duration::from_millis(10), task("early"));
        scheduler.schedule(Duration::from_millis(50), task("late-2"));

        assert_eq!(scheduler.advance(Duration::from_millis(9)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(100)), 2);
        assert_eq!(*log.borrow(), vec!["early", "late", "late-2"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_manual_nested_scheduling() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (log, task) = recorder();

        let inner = task("inner");
        let handle = scheduler.clone();
        scheduler.schedule(
            Duration::from_millis(5),
            Box::new(move || handle.schedule(Duration::from_millis(5), inner)),
        );

        assert_eq!(scheduler.run_all(), 2);
        assert_eq!(*log.borrow(), vec!["inner"]);
        assert_eq!(scheduler.now(), Duration::from_millis(10));
    }

    #[cfg(feature = "tokio-scheduler")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler() {
        let local = tokio::task::LocalSet::new();
        let (log, task) = recorder();

        local
            .run_until(async move {
                TokioScheduler.schedule(Duration::from_millis(50), task("fired"));
                tokio::time::sleep(Duration::from_millis(10)).await;
                assert!(log.borrow().is_empty());
                tokio::time::sleep(Duration::from_millis(60)).await;
                assert_eq!(*log.borrow(), vec!["fired"]);
            })
            .await;
    }
}
