// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-shot and repeating timers over a [`TaskQueue`].

use crate::tasks::{Task, TaskHandle, TaskQueue};

/// Identifies a timer owned by a canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// A timer that schedules [`Task::Timer`] ticks.
///
/// A running timer holds exactly one queue handle. Starting always clears
/// the previous handle first, so a timer never has two ticks in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    id: TimerId,
    interval_ms: u32,
    single_shot: bool,
    handle: Option<TaskHandle>,
}

impl Timer {
    /// A stopped timer.
    pub fn new(id: TimerId, interval_ms: u32, single_shot: bool) -> Self {
        Self {
            id,
            interval_ms,
            single_shot,
            handle: None,
        }
    }

    /// This timer's id.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Interval in milliseconds.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// True for a single-shot timer.
    pub fn single_shot(&self) -> bool {
        self.single_shot
    }

    /// The live queue handle, if running.
    pub fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }

    /// True while a tick is scheduled.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Schedule ticks, replacing any scheduled one.
    pub fn start(&mut self, queue: &mut dyn TaskQueue) {
        self.stop(queue);
        let task = Task::Timer(self.id);
        self.handle = Some(if self.single_shot {
            queue.set_timeout(task, self.interval_ms)
        } else {
            queue.set_interval(task, self.interval_ms)
        });
    }

    /// Cancel the scheduled tick.
    pub fn stop(&mut self, queue: &mut dyn TaskQueue) {
        if let Some(handle) = self.handle.take() {
            queue.clear(handle);
        }
    }

    /// Change the interval. A running timer restarts with it; a stopped
    /// timer stays stopped.
    pub fn set_interval(&mut self, interval_ms: u32, queue: &mut dyn TaskQueue) {
        self.interval_ms = interval_ms;
        if self.is_running() {
            log::debug!("restarting timer {:?} at {interval_ms} ms", self.id);
            self.stop(queue);
            self.start(queue);
        }
    }

    /// Record that a tick was delivered. A single-shot timer is then
    /// stopped.
    pub fn fired(&mut self) {
        if self.single_shot {
            self.handle = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::ManualTaskQueue;

    #[test]
    fn stop_clears_handle_and_restart_is_fresh() {
        let mut q = ManualTaskQueue::new();
        let mut t = Timer::new(TimerId(0), 10, true);
        t.start(&mut q);
        let first = t.handle();
        assert!(first.is_some());
        t.stop(&mut q);
        assert_eq!(t.handle(), None, "stop nulls the handle");
        assert!(q.is_empty());
        t.start(&mut q);
        assert!(t.handle().is_some());
        assert_ne!(t.handle(), first, "restart schedules a new task");
    }

    #[test]
    fn interval_change_while_stopped_does_not_start() {
        let mut q = ManualTaskQueue::new();
        let mut t = Timer::new(TimerId(0), 10, false);
        t.set_interval(50, &mut q);
        assert!(!t.is_running());
        assert!(q.is_empty(), "nothing was scheduled");
        assert_eq!(t.interval_ms(), 50);
    }

    #[test]
    fn interval_change_while_running_restarts() {
        let mut q = ManualTaskQueue::new();
        let mut t = Timer::new(TimerId(3), 10, false);
        t.start(&mut q);
        t.set_interval(25, &mut q);
        assert_eq!(q.len(), 1, "old interval was cleared");
        assert!(q.advance(24).is_empty());
        assert_eq!(q.advance(1), [Task::Timer(TimerId(3))]);
    }

    #[test]
    fn starting_twice_keeps_one_task() {
        let mut q = ManualTaskQueue::new();
        let mut t = Timer::new(TimerId(0), 10, false);
        t.start(&mut q);
        t.start(&mut q);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn single_shot_stops_after_firing() {
        let mut q = ManualTaskQueue::new();
        let mut t = Timer::new(TimerId(0), 5, true);
        t.start(&mut q);
        assert_eq!(q.advance(5).len(), 1);
        t.fired();
        assert!(!t.is_running());
    }
}
