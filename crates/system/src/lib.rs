pub mod collector;
pub mod cores;
pub mod cpu;
pub mod memory;

pub use collector::{Collected, Collector};
pub use memory::SystemMemory;

use std::path::{Path, PathBuf};
use termon_config::SourcesConfig;
use termon_core::{CoreInfo, CpuCounters, MemorySnapshot, MonitorError, Result};

/// The raw data behind each metric.
///
/// Every method is a blocking read; the [`Collector`] runs each one on its own
/// blocking task. Implementations must be shareable across those tasks.
pub trait MetricSources: Send + Sync + 'static {
    /// Cumulative CPU counters.
    fn cpu_counters(&self) -> Result<CpuCounters>;

    /// Current physical memory.
    fn memory(&self) -> Result<MemorySnapshot>;

    /// Core count and representative maximum clock.
    fn core_info(&self) -> Result<CoreInfo>;

    /// Core count alone, read once before the first tick.
    fn core_count(&self) -> Result<usize> {
        Ok(self.core_info()?.core_count)
    }
}

/// Linux sources: procfs/sysfs files for CPU and cores, `sysinfo` for memory.
#[derive(Debug)]
pub struct LinuxSources {
    proc_stat:   PathBuf,
    cpuinfo:     PathBuf,
    cpufreq_max: PathBuf,
    memory:      SystemMemory,
}

impl LinuxSources {
    pub fn new(paths: &SourcesConfig) -> Self {
        Self {
            proc_stat:   paths.proc_stat.clone(),
            cpuinfo:     paths.cpuinfo.clone(),
            cpufreq_max: paths.cpufreq_max.clone(),
            memory:      SystemMemory::new(),
        }
    }
}

impl Default for LinuxSources {
    fn default() -> Self {
        Self::new(&SourcesConfig::default())
    }
}

impl MetricSources for LinuxSources {
    fn cpu_counters(&self) -> Result<CpuCounters> {
        cpu::read_counters(&self.proc_stat)
    }

    fn memory(&self) -> Result<MemorySnapshot> {
        self.memory.read()
    }

    fn core_info(&self) -> Result<CoreInfo> {
        cores::read_core_info(&self.cpuinfo, &self.cpufreq_max)
    }

    fn core_count(&self) -> Result<usize> {
        cores::read_core_count(&self.cpuinfo)
    }
}

/// Read a whole source file, tagging failures with its path.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| MonitorError::source_read(path, e))
}
