//! Cooperative tick scheduler and drivers for the BSB adapter board
//!
//! The scheduler core ([`rtos`]) and the drivers are target independent; the
//! register-level parts of [`hal`] only exist when building for AVR.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod hal;
pub mod rtos;

pub use rtos::{Error, Scheduler, TaskEntry, TaskFn};
