// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred work on the host's event loop.
//!
//! The canvas never blocks or spawns. Work that must happen later is handed
//! to a [`TaskQueue`] as a [`Task`] value; when the host's timer fires it
//! passes the task back to [`FigureCanvas::dispatch`](crate::FigureCanvas::dispatch).
//!
//! [`ManualTaskQueue`] is a deterministic queue driven by an explicit clock,
//! for tests and headless hosts.

use figdraw_text::RegistrationTicket;

use crate::timer::TimerId;

/// Identifies a scheduled task so it can be cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

/// Work the canvas asks to be called back for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Task {
    /// Coalesced redraw.
    IdleRedraw,
    /// A timer tick.
    Timer(TimerId),
    /// The surface finished loading a font.
    FontLoaded(RegistrationTicket),
}

/// Host timer capability.
pub trait TaskQueue {
    /// Run `task` once after `delay_ms`.
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle;

    /// Run `task` every `interval_ms` until cleared.
    fn set_interval(&mut self, task: Task, interval_ms: u32) -> TaskHandle;

    /// Cancel a scheduled task. Unknown or finished handles are ignored.
    fn clear(&mut self, handle: TaskHandle);
}

#[derive(Clone, Debug)]
struct Scheduled {
    handle: TaskHandle,
    task: Task,
    due: u64,
    repeat: Option<u64>,
}

/// A [`TaskQueue`] with a virtual millisecond clock.
///
/// ```
/// use figdraw_canvas::{ManualTaskQueue, Task, TaskQueue};
///
/// let mut queue = ManualTaskQueue::new();
/// queue.set_timeout(Task::IdleRedraw, 1);
/// assert!(queue.advance(0).is_empty());
/// assert_eq!(queue.advance(1), [Task::IdleRedraw]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualTaskQueue {
    now: u64,
    next_handle: u64,
    scheduled: Vec<Scheduled>,
}

impl ManualTaskQueue {
    /// An empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of scheduled tasks, repeating ones included.
    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    /// Scheduled tasks in due order.
    pub fn pending(&self) -> Vec<Task> {
        let mut sorted: Vec<_> = self.scheduled.iter().collect();
        sorted.sort_by_key(|s| (s.due, s.handle));
        sorted.into_iter().map(|s| s.task).collect()
    }

    /// Move the clock forward by `ms` and return the tasks that came due, in
    /// firing order. A repeating task fires once per elapsed interval.
    pub fn advance(&mut self, ms: u64) -> Vec<Task> {
        let until = self.now + ms;
        let mut fired = Vec::new();
        loop {
            let next = self
                .scheduled
                .iter()
                .enumerate()
                .filter(|(_, s)| s.due <= until)
                .min_by_key(|(_, s)| (s.due, s.handle))
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };
            let Scheduled {
                task, due, repeat, ..
            } = self.scheduled[index];
            self.now = due;
            fired.push(task);
            match repeat {
                Some(interval) => self.scheduled[index].due += interval.max(1),
                None => {
                    self.scheduled.remove(index);
                }
            }
        }
        self.now = until;
        fired
    }

    fn schedule(&mut self, task: Task, delay: u32, repeat: bool) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let delay = u64::from(delay);
        self.scheduled.push(Scheduled {
            handle,
            task,
            due: self.now + if repeat { delay.max(1) } else { delay },
            repeat: repeat.then_some(delay),
        });
        handle
    }
}

impl TaskQueue for ManualTaskQueue {
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle {
        self.schedule(task, delay_ms, false)
    }

    fn set_interval(&mut self, task: Task, interval_ms: u32) -> TaskHandle {
        self.schedule(task, interval_ms, true)
    }

    fn clear(&mut self, handle: TaskHandle) {
        self.scheduled.retain(|s| s.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_fire_once_in_due_order() {
        let mut q = ManualTaskQueue::new();
        q.set_timeout(Task::Timer(TimerId(2)), 5);
        q.set_timeout(Task::Timer(TimerId(1)), 3);
        assert_eq!(
            q.advance(10),
            [Task::Timer(TimerId(1)), Task::Timer(TimerId(2))]
        );
        assert!(q.is_empty(), "timeouts are dropped after firing");
    }

    #[test]
    fn intervals_repeat_until_cleared() {
        let mut q = ManualTaskQueue::new();
        let h = q.set_interval(Task::Timer(TimerId(0)), 10);
        assert_eq!(q.advance(35).len(), 3);
        assert_eq!(q.now(), 35);
        q.clear(h);
        assert!(q.advance(100).is_empty());
    }

    #[test]
    fn cleared_timeout_never_fires() {
        let mut q = ManualTaskQueue::new();
        let h = q.set_timeout(Task::IdleRedraw, 1);
        q.clear(h);
        q.clear(h);
        assert!(q.advance(5).is_empty());
    }
}
