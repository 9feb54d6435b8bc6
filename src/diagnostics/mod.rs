//! Task table monitor
//!
//! Renders scheduler state as text for a serial console. Main-loop context
//! only: the table is copied in one short critical section and written out
//! afterwards, so output length never extends an interrupt-masked window.

use ufmt::{uWrite, uwrite, uwriteln};

use crate::rtos::{Scheduler, TaskStatus};

const HEADER: &str = "=== Scheduler Task Monitor ===";
const FOOTER: &str = "================================";

pub struct TaskMonitor;

impl TaskMonitor {
    /// Dump every active slot of `scheduler`
    pub fn report<W, const N: usize, const P: u8>(
        scheduler: &Scheduler<N, P>,
        out: &mut W,
    ) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let snapshot = scheduler.snapshot();
        uwriteln!(out, "{}\r", HEADER)?;
        for status in snapshot.iter().flatten() {
            Self::write_task(out, status)?;
        }
        uwriteln!(out, "{}\r", FOOTER)
    }

    fn write_task<W>(out: &mut W, task: &TaskStatus) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(out, "Task[{}]: Prio={}", task.index, task.priority)?;
        uwrite!(out, " | Period={} | Cnt={}", task.period, task.counter)?;
        uwrite!(
            out,
            " | Ready={} | Missed={}",
            u8::from(task.ready),
            u8::from(task.missed_deadline)
        )?;
        uwriteln!(out, " | OneShot={}\r", u8::from(task.one_shot))
    }

    /// Number of active tasks currently flagged with an overrun
    pub fn missed_deadlines<const N: usize, const P: u8>(scheduler: &Scheduler<N, P>) -> usize {
        scheduler
            .snapshot()
            .iter()
            .flatten()
            .filter(|status| status.missed_deadline)
            .count()
    }
}
