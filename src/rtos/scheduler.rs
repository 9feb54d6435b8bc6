//! Interrupt-driven cooperative task scheduler
//!
//! The tick interrupt calls [`Scheduler::tick`], which only advances task
//! counters and marks tasks ready. The main loop calls [`Scheduler::run`],
//! which dispatches ready tasks in strict priority order (0 first, then
//! ascending slot index) and runs each callback to completion with interrupts
//! enabled.
//!
//! All table state sits behind a `critical_section::Mutex`, and every borrow
//! of it ends before the critical section does, so the interrupt can never
//! observe a borrow held by the main loop.

use core::cell::{Cell, RefCell};
use critical_section::Mutex;

use crate::config::{MAX_PRIORITY, MAX_TASKS};
use crate::rtos::delay;
use crate::rtos::error::Error;
use crate::rtos::task::{Task, TaskEntry, TaskStatus};

struct TaskTable<const N: usize> {
    slots: [Option<Task>; N],
    allocations: u32,
}

impl<const N: usize> TaskTable<N> {
    const fn new() -> Self {
        Self {
            slots: [None; N],
            allocations: 0,
        }
    }

    fn position(&self, entry: &TaskEntry) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(task) if task.entry.is(entry)))
    }

    /// Fill the lowest free slot
    fn allocate(
        &mut self,
        entry: &'static TaskEntry,
        priority: u8,
        period: u16,
        one_shot: bool,
    ) -> Result<usize, Error> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(Error::TableFull)?;

        self.allocations = self.allocations.wrapping_add(1);
        self.slots[index] = Some(Task::new(
            entry,
            priority,
            period,
            one_shot,
            self.allocations,
        ));
        Ok(index)
    }
}

/// Fixed-capacity cooperative scheduler with tick counter
///
/// `N` is the table capacity and `P` the number of priority levels. Both are
/// fixed at build time; the defaults come from [`crate::config`].
pub struct Scheduler<const N: usize = MAX_TASKS, const P: u8 = MAX_PRIORITY> {
    table: Mutex<RefCell<TaskTable<N>>>,
    tick_count: Mutex<Cell<u32>>,
}

impl<const N: usize, const P: u8> Scheduler<N, P> {
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new(TaskTable::new())),
            tick_count: Mutex::new(Cell::new(0)),
        }
    }

    /// Register a periodic task in the lowest free slot.
    ///
    /// Leaves the table untouched on error. Callers that have nowhere to
    /// report failures drop the result with `.ok()`.
    pub fn add_task(
        &self,
        entry: &'static TaskEntry,
        priority: u8,
        period: u16,
    ) -> Result<usize, Error> {
        if priority >= P {
            return Err(Error::InvalidPriority);
        }

        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            if table.position(entry).is_some() {
                return Err(Error::Duplicate);
            }
            table.allocate(entry, priority, period, false)
        })
    }

    /// Free the slot registered with `entry`. Returns false if there was none.
    ///
    /// A dispatch already in progress still completes.
    pub fn remove_task(&self, entry: &TaskEntry) -> bool {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            match table.position(entry) {
                Some(index) => {
                    table.slots[index] = None;
                    true
                }
                None => false,
            }
        })
    }

    /// Run `entry` once, at top priority, after `delay` ticks.
    ///
    /// No duplicate check: every call takes its own slot.
    pub fn set_timeout(&self, entry: &'static TaskEntry, delay: u16) -> Result<usize, Error> {
        critical_section::with(|cs| {
            self.table
                .borrow(cs)
                .borrow_mut()
                .allocate(entry, 0, delay, true)
        })
    }

    /// Timer interrupt entry point. Never invokes a callback.
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let ticks = self.tick_count.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));

            let mut table = self.table.borrow(cs).borrow_mut();
            for task in table.slots.iter_mut().flatten() {
                task.advance();
            }
        });
    }

    /// One dispatch pass over every priority level. Never blocks.
    ///
    /// Returns the number of callbacks run.
    pub fn run(&self) -> usize {
        let mut dispatched = 0;

        for priority in 0..P {
            for index in 0..N {
                let Some((entry, one_shot, instance)) = self.claim(index, priority) else {
                    continue;
                };

                entry.invoke();
                dispatched += 1;

                if one_shot {
                    self.retire(index, instance);
                }
            }
        }

        dispatched
    }

    /// Consume the pending activation of slot `index` if it is ready at
    /// `priority`.
    fn claim(&self, index: usize, priority: u8) -> Option<(&'static TaskEntry, bool, u32)> {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            match &mut table.slots[index] {
                Some(task) if task.ready && task.priority == priority => {
                    task.ready = false;
                    task.missed_deadline = false;
                    Some((task.entry, task.one_shot, task.instance))
                }
                _ => None,
            }
        })
    }

    /// Free a one-shot slot unless it was removed and reallocated while its
    /// callback ran.
    fn retire(&self, index: usize, instance: u32) {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            let slot = &mut table.slots[index];
            if matches!(slot, Some(task) if task.instance == instance) {
                *slot = None;
            }
        });
    }

    /// Current tick count
    #[inline]
    pub fn now(&self) -> u32 {
        critical_section::with(|cs| self.tick_count.borrow(cs).get())
    }

    /// See [`delay::elapsed_since`]
    pub fn elapsed_since(&self, last_tick: u32, ticks: u32) -> bool {
        delay::elapsed_since(self.now(), last_tick, ticks)
    }

    /// See [`delay::periodic_due`]
    pub fn periodic_due(&self, last_wake: &mut u32, period: u32) -> bool {
        delay::periodic_due(self.now(), last_wake, period)
    }

    pub fn is_scheduled(&self, entry: &TaskEntry) -> bool {
        critical_section::with(|cs| self.table.borrow(cs).borrow().position(entry).is_some())
    }

    pub fn active_count(&self) -> usize {
        critical_section::with(|cs| {
            self.table
                .borrow(cs)
                .borrow()
                .slots
                .iter()
                .filter(|slot| slot.is_some())
                .count()
        })
    }

    pub fn status(&self, index: usize) -> Option<TaskStatus> {
        critical_section::with(|cs| {
            let table = self.table.borrow(cs).borrow();
            table.slots.get(index)?.as_ref().map(|task| task.status(index))
        })
    }

    /// Copy of every slot taken in one critical section
    pub fn snapshot(&self) -> [Option<TaskStatus>; N] {
        critical_section::with(|cs| {
            let table = self.table.borrow(cs).borrow();
            let mut out = [None; N];
            for (index, (status, slot)) in out.iter_mut().zip(table.slots.iter()).enumerate() {
                *status = slot.as_ref().map(|task| task.status(index));
            }
            out
        })
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub const fn priority_levels(&self) -> u8 {
        P
    }
}

impl<const N: usize, const P: u8> Default for Scheduler<N, P> {
    fn default() -> Self {
        Self::new()
    }
}
