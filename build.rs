use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds carry the scheduler core and drivers for testing only
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega2560
    println!("cargo:rustc-link-arg=-mmcu=atmega2560");

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");

    // Debug builds dump the task table periodically
    if env::var("PROFILE").map(|profile| profile == "debug").unwrap_or(false) {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }

    println!("cargo:warning=Building for ATmega2560 at 16MHz");
}
