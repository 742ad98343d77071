use std::sync::Mutex;
use sysinfo::System;
use termon_core::{MemorySnapshot, MonitorError, Result};

/// Physical memory reader backed by `sysinfo`.
///
/// Keeps one `System` handle alive for the run and refreshes only the memory
/// figures on each read.
#[derive(Debug)]
pub struct SystemMemory {
    sys: Mutex<System>,
}

impl SystemMemory {
    pub fn new() -> Self {
        Self { sys: Mutex::new(System::new()) }
    }

    /// Current total and used (total − free) memory.
    pub fn read(&self) -> Result<MemorySnapshot> {
        // Poisoning is harmless: the refresh below overwrites every figure.
        let mut sys = self.sys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return Err(MonitorError::source_parse("memory", "total physical memory reported as 0"));
        }
        Ok(MemorySnapshot::from_total_free(total, sys.free_memory()))
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}
