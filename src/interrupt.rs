// src/interrupt.rs

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag raised by SIGINT and polled between units of work.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes SIGINT into the flag instead of terminating the process.
    pub fn install() -> std::io::Result<Self> {
        let interrupt = Self::new();
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&interrupt.flag))?;
        Ok(interrupt)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fails with [`Error::Cancelled`] once the flag has been raised.
    pub fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
