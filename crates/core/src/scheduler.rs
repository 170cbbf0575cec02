//! A cooperative tick scheduler in the manner of the game host's `system.run`
//! and `system.runInterval`: work is queued as tasks and handed back to the
//! owner when due, one tick at a time.

use std::fmt;

/// Work the session knows how to run when the scheduler hands it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One best-effort pass of the tag area builder.
    TagAreaPass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct ScheduledTask {
    handle: TaskHandle,
    task: Task,
    due: u64,
    interval: Option<u32>,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    current_tick: u64,
    next_handle: u64,
    entries: Vec<ScheduledTask>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Runs `task` once, on the next tick.
    pub fn run_once(&mut self, task: Task) -> TaskHandle {
        self.schedule(task, 1, None)
    }

    /// Runs `task` every `interval` ticks, starting `interval` ticks from now,
    /// until cancelled.
    pub fn run_at_interval(&mut self, task: Task, interval: u32) -> TaskHandle {
        let interval = interval.max(1);
        self.schedule(task, interval as u64, Some(interval))
    }

    /// Returns false if the handle was not scheduled (already ran or already cancelled).
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        before != self.entries.len()
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Advances one tick and returns the tasks due on it, in scheduling order.
    pub fn advance(&mut self) -> Vec<(TaskHandle, Task)> {
        self.current_tick += 1;
        let now = self.current_tick;

        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            if entry.due > now {
                return true;
            }
            due.push((entry.handle, entry.task));
            match entry.interval {
                Some(interval) => {
                    entry.due = now + interval as u64;
                    true
                }
                None => false,
            }
        });
        due
    }

    fn schedule(&mut self, task: Task, delay: u64, interval: Option<u32>) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(ScheduledTask {
            handle,
            task,
            due: self.current_tick + delay,
            interval,
        });
        handle
    }
}
