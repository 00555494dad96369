//! Scheduling seam between the tour and the host's main loop.
//!
//! The tour never blocks. The move protocol hands deferred work to a
//! [`Scheduler`]: once after a fixed delay, and once more on the following
//! tick of the loop. Hosts implement the trait on top of their own event loop;
//! [`ManualScheduler`] is a deterministic virtual clock for tests and for hosts
//! that drive time themselves (e.g. from a frame callback).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Deferred unit of work. Runs on the scheduler's single logical thread.
pub type Task = Box<dyn FnOnce()>;

/// Single-threaded, cooperative task scheduling.
///
/// Implementations must never run a task synchronously inside the call that
/// schedules it.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, task: Task);

    /// Run `task` on the next turn of the loop, after the currently running
    /// task has finished.
    fn schedule_next_tick(&self, task: Task);
}

struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    seq: u64,
    timers: Vec<Timer>,
    ticks: VecDeque<Task>,
}

impl Queue {
    /// Index of the earliest timer due at or before `limit`, FIFO among equals.
    fn next_due(&self, limit: Option<Duration>) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| limit.is_none_or(|limit| t.due <= limit))
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(index, _)| index)
    }
}

/// Virtual-clock scheduler driven explicitly by its owner.
///
/// # Example
///
/// ```rust
/// use coachmark::tour::{ManualScheduler, Scheduler};
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// scheduler.schedule_after(Duration::from_millis(500), Box::new(move || flag.set(true)));
///
/// scheduler.advance_by(Duration::from_millis(499));
/// assert!(!fired.get());
/// scheduler.advance_by(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Queue>,
}

impl ManualScheduler {
    /// Scheduler at time zero with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler ready to be shared with a [`Guide`](super::Guide).
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of timers not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    /// Number of tick tasks waiting to run.
    pub fn pending_ticks(&self) -> usize {
        self.queue.borrow().ticks.len()
    }

    /// True when no timer or tick is pending.
    pub fn is_idle(&self) -> bool {
        self.pending_timers() == 0 && self.pending_ticks() == 0
    }

    /// Run queued tick tasks, including ticks they enqueue. Returns how many ran.
    pub fn run_ticks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.queue.borrow_mut().ticks.pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Jump the clock to the earliest pending timer and run only that timer.
    ///
    /// Ticks it schedules stay queued until [`run_ticks`](Self::run_ticks).
    /// Returns `false` when no timer is pending.
    pub fn fire_next_timer(&self) -> bool {
        let timer = {
            let mut queue = self.queue.borrow_mut();
            let Some(index) = queue.next_due(None) else {
                return false;
            };
            let timer = queue.timers.remove(index);
            queue.now = queue.now.max(timer.due);
            timer
        };
        (timer.task)();
        true
    }

    /// Move the clock forward by `delta`, running every timer that falls due
    /// (in due order) and draining ticks after each one.
    pub fn advance_by(&self, delta: Duration) -> usize {
        let mut ran = self.run_ticks();
        let target = self.now().saturating_add(delta);
        loop {
            let timer = {
                let mut queue = self.queue.borrow_mut();
                match queue.next_due(Some(target)) {
                    Some(index) => {
                        let timer = queue.timers.remove(index);
                        queue.now = queue.now.max(timer.due);
                        timer
                    }
                    None => {
                        queue.now = target;
                        break;
                    }
                }
            };
            (timer.task)();
            ran += 1 + self.run_ticks();
        }
        ran
    }

    /// Run everything, advancing the clock as far as needed.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = self.run_ticks();
        while self.fire_next_timer() {
            ran += 1 + self.run_ticks();
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) {
        let mut queue = self.queue.borrow_mut();
        let due = queue.now.saturating_add(delay);
        let seq = queue.seq;
        queue.seq += 1;
        queue.timers.push(Timer { due, seq, task });
    }

    fn schedule_next_tick(&self, task: Task) {
        self.queue.borrow_mut().ticks.push_back(task);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &queue.now)
            .field("timers", &queue.timers.len())
            .field("ticks", &queue.ticks.len())
            .finish()
    }
}
