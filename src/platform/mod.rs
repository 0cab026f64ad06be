//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall clock in milliseconds (feeds the tick clock, never the simulation)
//! - Run seeds

use crate::settings::Settings;

/// Milliseconds on a monotonic-ish host clock
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Milliseconds since the first call
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Seed from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Configured seed if any, else one from the clock
pub fn run_seed(settings: &Settings) -> u64 {
    match settings.seed {
        Some(seed) => {
            log::info!("Using fixed seed {}", seed);
            seed
        }
        None => clock_seed(),
    }
}
