use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use termon_core::MetricSet;

/// Root configuration structure parsed from `termon.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Tick count, pacing and sampling deadlines.
    pub sampling: SamplingConfig,
    /// Where each metric is read from.
    pub sources: SourcesConfig,
    /// Enabled metrics. Only settable from the command line.
    #[serde(skip)]
    pub metrics: Metrics,
}

/// Newtype so the enabled-metric set defaults to "everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics(pub MetricSet);

impl Default for Metrics {
    fn default() -> Self {
        Self(MetricSet::all())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Number of ticks in a run.
    pub samples: u32,
    /// Delay between ticks, in microseconds.
    pub tdelay_us: u64,
    /// How long one collection round may wait for its samplers.
    pub timeout_ms: u64,
    /// History grid width; `None` means one column per tick.
    pub history_width: Option<usize>,
    /// Read the CPU counters once before the first tick so tick 0 measures an
    /// interval instead of everything since boot.
    pub prime_cpu_baseline: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples:            20,
            tdelay_us:          500_000,
            timeout_ms:         2_000,
            history_width:      None,
            prime_cpu_baseline: false,
        }
    }
}

impl SamplingConfig {
    pub fn tick_delay(&self) -> Duration {
        Duration::from_micros(self.tdelay_us)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn effective_history_width(&self) -> usize {
        self.history_width.unwrap_or(self.samples as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Aggregate CPU counters.
    pub proc_stat: PathBuf,
    /// Processor enumeration.
    pub cpuinfo: PathBuf,
    /// First core's maximum frequency, in kHz.
    pub cpufreq_max: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            proc_stat:   PathBuf::from("/proc/stat"),
            cpuinfo:     PathBuf::from("/proc/cpuinfo"),
            cpufreq_max: PathBuf::from("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq"),
        }
    }
}
