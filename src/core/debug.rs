//! Lightweight debug logging gated by SHASTEP_DEBUG=1 (or `debug = true` in the config).
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

static ENABLED: OnceLock<bool> = OnceLock::new();
static FORCED: AtomicBool = AtomicBool::new(false);

pub fn is_enabled() -> bool {
    FORCED.load(Ordering::Relaxed)
        || *ENABLED.get_or_init(|| std::env::var("SHASTEP_DEBUG").ok().as_deref() == Some("1"))
}

/// Turn logging on regardless of the environment.
pub fn force_enable() {
    FORCED.store(true, Ordering::Relaxed);
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if $crate::core::debug::is_enabled() { eprintln!($($arg)*); }
    }};
}
