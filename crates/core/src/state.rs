use std::fmt;

/// The three built-in metrics a run can sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Memory,
    Cpu,
    Cores,
}

impl Metric {
    /// All metrics in panel order.
    pub const ALL: [Metric; 3] = [Metric::Memory, Metric::Cpu, Metric::Cores];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Memory => "memory",
            Metric::Cpu    => "cpu",
            Metric::Cores  => "cores",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which metrics are enabled for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricSet {
    pub memory: bool,
    pub cpu:    bool,
    pub cores:  bool,
}

impl MetricSet {
    pub const fn all() -> Self {
        Self { memory: true, cpu: true, cores: true }
    }

    pub const fn none() -> Self {
        Self { memory: false, cpu: false, cores: false }
    }

    #[must_use]
    pub fn with(mut self, metric: Metric) -> Self {
        match metric {
            Metric::Memory => self.memory = true,
            Metric::Cpu    => self.cpu = true,
            Metric::Cores  => self.cores = true,
        }
        self
    }

    pub fn contains(&self, metric: Metric) -> bool {
        match metric {
            Metric::Memory => self.memory,
            Metric::Cpu    => self.cpu,
            Metric::Cores  => self.cores,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.memory || self.cpu || self.cores)
    }

    /// Enabled metrics in panel order (memory, cpu, cores).
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

/// Cumulative tick counters from the aggregate `cpu` line of `/proc/stat`.
///
/// Counters only grow while the machine is up. The default value is the zero
/// baseline a run starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuCounters {
    pub user:    u64,
    pub nice:    u64,
    pub system:  u64,
    pub idle:    u64,
    pub iowait:  u64,
    pub irq:     u64,
    pub softirq: u64,
}

impl CpuCounters {
    /// Sum of every non-idle counter.
    pub fn busy(&self) -> u64 {
        self.user + self.nice + self.system + self.iowait + self.irq + self.softirq
    }

    pub fn total(&self) -> u64 {
        self.busy() + self.idle
    }

    /// Busy percentage of the interval between `prev` and `self`, in `[0, 100]`.
    ///
    /// Returns `0.0` when no time elapsed between the two reads. A counter
    /// that went backwards contributes nothing to the interval.
    pub fn usage_since(&self, prev: &CpuCounters) -> f64 {
        let busy = self.user.saturating_sub(prev.user)
            + self.nice.saturating_sub(prev.nice)
            + self.system.saturating_sub(prev.system)
            + self.iowait.saturating_sub(prev.iowait)
            + self.irq.saturating_sub(prev.irq)
            + self.softirq.saturating_sub(prev.softirq);
        let total = busy + self.idle.saturating_sub(prev.idle);

        if total == 0 {
            return 0.0;
        }
        (busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

const BYTES_PER_GB: f64 = 1e9;

/// Physical memory at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub used_bytes:  u64,
}

impl MemorySnapshot {
    /// `used` is capped at `total`.
    pub fn new(total_bytes: u64, used_bytes: u64) -> Self {
        Self {
            total_bytes,
            used_bytes: used_bytes.min(total_bytes),
        }
    }

    /// Build from the kernel's total/free pair: used = total − free.
    pub fn from_total_free(total_bytes: u64, free_bytes: u64) -> Self {
        Self::new(total_bytes, total_bytes.saturating_sub(free_bytes))
    }

    /// Used fraction in `[0, 1]`.
    #[must_use]
    pub fn used_fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64
    }

    pub fn total_gb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_GB
    }

    pub fn used_gb(&self) -> f64 {
        self.used_bytes as f64 / BYTES_PER_GB
    }
}

/// Core topology and clock.
///
/// The first core's maximum clock stands in for every core.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoreInfo {
    pub core_count:    usize,
    pub max_clock_ghz: f64,
}

impl CoreInfo {
    pub fn from_khz(core_count: usize, max_clock_khz: u64) -> Self {
        Self {
            core_count,
            max_clock_ghz: max_clock_khz as f64 / 1e6,
        }
    }
}

/// Everything one tick's collection produced. A field is `None` when its
/// metric was not enabled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickSample {
    pub memory:    Option<MemorySnapshot>,
    pub cpu_usage: Option<f64>,
    pub cores:     Option<CoreInfo>,
}
