//! Uncaught-panic handling for a suite run.
//!
//! `PanicGuard::install` chains a panic hook that writes the panic through a
//! `RouterHandle` and closes it, so a crashing harness still leaves complete
//! transcripts behind. Dropping the guard restores the previous hook.

use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use crate::core::lifecycle::RouterHandle;

type Hook = Arc<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

pub struct PanicGuard {
    previous: Hook,
}

impl PanicGuard {
    pub fn install(handle: RouterHandle) -> Self {
        let previous: Hook = Arc::from(panic::take_hook());
        let chained = Arc::clone(&previous);

        panic::set_hook(Box::new(move |info| {
            if !handle.is_closed() {
                handle.log(&format!("Uncaught panic: {}", describe(info)));
                handle.close();
            }
            chained(info);
        }));

        Self { previous }
    }
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        // Drops our hook, together with the handle clone it holds.
        let _ = panic::take_hook();
        let previous = Arc::clone(&self.previous);
        panic::set_hook(Box::new(move |info| previous(info)));
    }
}

fn describe(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Box<dyn Any>".to_string());
    match info.location() {
        Some(location) => format!("{} at {}:{}:{}", message, location.file(), location.line(), location.column()),
        None => message,
    }
}
