//! Cooperative tick scheduler

pub mod delay;
mod error;
pub mod scheduler;
pub mod task;

pub use delay::{elapsed_since, periodic_due, Delay};
pub use error::Error;
pub use scheduler::Scheduler;
pub use task::{TaskEntry, TaskFn, TaskStatus};
