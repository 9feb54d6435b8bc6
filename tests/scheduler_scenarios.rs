use std::cell::RefCell;

use bsb_adapter_firmware::diagnostics::TaskMonitor;
use bsb_adapter_firmware::{Scheduler, TaskEntry};

thread_local! {
    static LOG: RefCell<Vec<(&'static str, u32)>> = RefCell::new(Vec::new());
    static NOW: RefCell<u32> = RefCell::new(0);
}

fn record(name: &'static str) {
    let now = NOW.with(|now| *now.borrow());
    LOG.with(|log| log.borrow_mut().push((name, now)));
}

fn take_log() -> Vec<(&'static str, u32)> {
    LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

fn names(log: &[(&'static str, u32)]) -> Vec<&'static str> {
    log.iter().map(|(name, _)| *name).collect()
}

fn blink_task() {
    record("blink");
}

fn uart_task() {
    record("uart");
}

fn timeout_task() {
    record("timeout");
}

static BLINK: TaskEntry = TaskEntry::new("blink", blink_task);
static UART: TaskEntry = TaskEntry::new("uart", uart_task);
static TIMEOUT: TaskEntry = TaskEntry::new("timeout", timeout_task);

fn step(scheduler: &Scheduler) {
    scheduler.tick();
    NOW.with(|now| *now.borrow_mut() = scheduler.now());
}

#[test]
fn priority_wins_over_registration_and_period() {
    let scheduler: Scheduler = Scheduler::new();
    scheduler.add_task(&BLINK, 2, 150).unwrap();
    scheduler.add_task(&UART, 1, 1000).unwrap();

    for _ in 0..150 {
        step(&scheduler);
    }
    assert_eq!(scheduler.run(), 1);
    assert_eq!(names(&take_log()), ["blink"]);

    while scheduler.now() < 1000 {
        step(&scheduler);
        scheduler.run();
    }
    let log = take_log();
    let blink_ticks: Vec<u32> = log
        .iter()
        .filter(|(name, _)| *name == "blink")
        .map(|(_, tick)| *tick)
        .collect();
    assert_eq!(blink_ticks, [300, 450, 600, 750, 900]);
    assert_eq!(log.last(), Some(&("uart", 1000)));

    // both due on the same tick: uart first
    while scheduler.now() < 3000 {
        step(&scheduler);
        if scheduler.now() < 3000 {
            scheduler.run();
        }
    }
    take_log();
    assert_eq!(scheduler.run(), 2);
    assert_eq!(names(&take_log()), ["uart", "blink"]);

    let missed = TaskMonitor::missed_deadlines(&scheduler);
    assert_eq!(missed, 0);
}

#[test]
fn timeout_fires_once_never_early() {
    let scheduler: Scheduler = Scheduler::new();
    scheduler.set_timeout(&TIMEOUT, 500).unwrap();
    assert_eq!(scheduler.run(), 0);

    for _ in 0..2000 {
        step(&scheduler);
        scheduler.run();
    }

    assert_eq!(take_log(), [("timeout", 500)]);
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(scheduler.set_timeout(&TIMEOUT, 1), Ok(0));
}

#[test]
fn late_dispatch_collapses_activations_and_flags_overrun() {
    let scheduler: Scheduler = Scheduler::new();
    scheduler.add_task(&BLINK, 0, 10).unwrap();
    for _ in 0..35 {
        step(&scheduler);
    }

    let status = scheduler.status(0).unwrap();
    assert!(status.ready && status.missed_deadline);
    assert_eq!(status.counter, 5);
    assert_eq!(TaskMonitor::missed_deadlines(&scheduler), 1);

    assert_eq!(scheduler.run(), 1);
    assert!(!scheduler.status(0).unwrap().missed_deadline);
}

macro_rules! prioritized {
    ($($name:ident => $prio:expr),* $(,)?) => {
        $(fn $name() { record(stringify!($name)); })*
        static TASKS: [(TaskEntry, u8); [$(stringify!($name)),*].len()] =
            [$((TaskEntry::new(stringify!($name), $name), $prio)),*];
    };
}

prioritized! {
    p0_fast => 0,
    p3_mid => 3,
    p1_slow => 1,
    p9_idle => 9,
    p3_other => 3,
    p0_slow => 0,
}

#[test]
fn every_pass_is_priority_ordered_under_any_interleaving() {
    let periods = [1u16, 7, 13, 2, 5, 29];
    let scheduler: Scheduler = Scheduler::new();
    for ((entry, priority), period) in TASKS.iter().zip(periods) {
        scheduler.add_task(entry, *priority, period).unwrap();
    }
    let priority_of = |name: &str| {
        TASKS
            .iter()
            .find(|(entry, _)| entry.name() == name)
            .map(|(_, priority)| *priority)
            .unwrap()
    };

    // xorshift keeps the interleaving reproducible
    let mut seed = 0x2545_f491_u32;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        for _ in 0..seed % 40 {
            step(&scheduler);
        }

        scheduler.run();
        let order: Vec<u8> = take_log().iter().map(|&(name, _)| priority_of(name)).collect();
        assert!(order.windows(2).all(|pair| pair[0] <= pair[1]), "{order:?}");
    }
}
