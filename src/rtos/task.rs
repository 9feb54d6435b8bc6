//! Task descriptors and slot state for the cooperative scheduler

use core::ptr;

/// Task entry point
pub type TaskFn = fn();

/// Registration handle for a task.
///
/// Declare one as a `static`; the scheduler keys duplicate detection and
/// removal on the address of that static, never on the function pointer, so
/// two entries sharing a function (or two functions the compiler folded into
/// one) stay distinct tasks.
///
/// ```
/// use bsb_adapter_firmware::rtos::TaskEntry;
///
/// fn toggle_led() {}
/// static HEARTBEAT: TaskEntry = TaskEntry::new("heartbeat", toggle_led);
/// ```
#[derive(Debug)]
pub struct TaskEntry {
    name: &'static str,
    run: TaskFn,
}

impl TaskEntry {
    pub const fn new(name: &'static str, run: TaskFn) -> Self {
        Self { name, run }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) fn is(&self, other: &TaskEntry) -> bool {
        ptr::eq(self, other)
    }

    #[inline]
    pub(crate) fn invoke(&self) {
        (self.run)()
    }
}

/// Live task held by an occupied table slot
#[derive(Copy, Clone)]
pub(crate) struct Task {
    pub(crate) entry: &'static TaskEntry,
    pub(crate) priority: u8,
    pub(crate) period: u16,
    pub(crate) counter: u16,
    pub(crate) ready: bool,
    pub(crate) missed_deadline: bool,
    pub(crate) one_shot: bool,
    /// Allocation number of the slot, distinguishes reuse of the same index
    pub(crate) instance: u32,
}

impl Task {
    pub(crate) const fn new(
        entry: &'static TaskEntry,
        priority: u8,
        period: u16,
        one_shot: bool,
        instance: u32,
    ) -> Self {
        Self {
            entry,
            priority,
            period,
            counter: 0,
            ready: false,
            missed_deadline: false,
            one_shot,
            instance,
        }
    }

    /// Advance one tick. An activation that comes due while the previous
    /// one is still pending latches `missed_deadline`.
    #[inline]
    pub(crate) fn advance(&mut self) {
        self.counter = self.counter.saturating_add(1);
        if self.counter >= self.period {
            if self.ready {
                self.missed_deadline = true;
            }
            self.counter = 0;
            self.ready = true;
        }
    }

    pub(crate) fn status(&self, index: usize) -> TaskStatus {
        TaskStatus {
            index,
            name: self.entry.name,
            priority: self.priority,
            period: self.period,
            counter: self.counter,
            ready: self.ready,
            missed_deadline: self.missed_deadline,
            one_shot: self.one_shot,
        }
    }
}

/// Read-only copy of one active slot, used for diagnostics
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub index: usize,
    pub name: &'static str,
    pub priority: u8,
    pub period: u16,
    pub counter: u16,
    pub ready: bool,
    pub missed_deadline: bool,
    pub one_shot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    static NOOP: TaskEntry = TaskEntry::new("noop", noop);
    static NOOP_TWIN: TaskEntry = TaskEntry::new("noop", noop);

    #[test]
    fn identity_is_the_entry_not_the_function() {
        assert!(NOOP.is(&NOOP));
        assert!(!NOOP.is(&NOOP_TWIN));
    }

    #[test]
    fn becomes_ready_after_period() {
        let mut task = Task::new(&NOOP, 0, 3, false, 1);
        task.advance();
        task.advance();
        assert!(!task.ready);
        assert_eq!(task.counter, 2);

        task.advance();
        assert!(task.ready);
        assert_eq!(task.counter, 0);
        assert!(!task.missed_deadline);
    }

    #[test]
    fn second_activation_while_pending_latches_overrun() {
        let mut task = Task::new(&NOOP, 0, 2, false, 1);
        for _ in 0..2 {
            task.advance();
        }
        assert!(task.ready && !task.missed_deadline);

        for _ in 0..2 {
            task.advance();
        }
        assert!(task.ready);
        assert!(task.missed_deadline);
    }

    #[test]
    fn zero_period_is_due_every_tick() {
        let mut task = Task::new(&NOOP, 0, 0, false, 1);
        task.advance();
        assert!(task.ready);
        assert_eq!(task.counter, 0);
    }

    #[test]
    fn counter_never_exceeds_period() {
        let mut task = Task::new(&NOOP, 0, u16::MAX, false, 1);
        task.counter = u16::MAX - 1;
        task.advance();
        assert!(task.ready);
        assert_eq!(task.counter, 0);
    }
}
