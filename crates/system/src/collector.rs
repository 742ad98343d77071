//! One collection round per tick.
//!
//! Each enabled metric is read on its own blocking task and reports through a
//! private oneshot channel. The round waits for every launched task (up to a
//! shared deadline) before anything is returned, so a tick's results are
//! never mixed with another tick's.

use crate::MetricSources;
use std::sync::Arc;
use std::time::Duration;
use termon_core::{CoreInfo, CpuCounters, MemorySnapshot, Metric, MetricSet, MonitorError, Result, TickSample};
use tokio::sync::oneshot;
use tokio::time::{self, Instant};
use tracing::{debug, error};

/// Output of one round: the sample plus the CPU baseline for the next round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub sample:   TickSample,
    pub baseline: CpuCounters,
}

/// Fans a tick out to the enabled [`MetricSources`] reads.
pub struct Collector<S> {
    sources: Arc<S>,
    metrics: MetricSet,
    timeout: Duration,
}

/// A launched sampling task and the receiving end of its result channel.
struct Unit<T> {
    metric: Metric,
    rx:     oneshot::Receiver<Result<T>>,
}

impl<S: MetricSources> Collector<S> {
    pub fn new(sources: Arc<S>, metrics: MetricSet, timeout: Duration) -> Self {
        Self { sources, metrics, timeout }
    }

    /// Run one round.
    ///
    /// `baseline` is the previous round's CPU counters (zero on the first
    /// round). It comes back unchanged when CPU sampling is disabled.
    ///
    /// Any failing unit fails the whole round. All units are awaited first;
    /// if several fail, the error returned is the first in panel order
    /// (memory, cpu, cores).
    pub async fn collect(&self, baseline: CpuCounters) -> Result<Collected> {
        let deadline = Instant::now() + self.timeout;

        let memory = self
            .metrics
            .memory
            .then(|| self.launch(Metric::Memory, |s: &S| s.memory()));
        let cpu = self.metrics.cpu.then(|| {
            self.launch(Metric::Cpu, move |s: &S| {
                let counters = s.cpu_counters()?;
                Ok((counters.usage_since(&baseline), counters))
            })
        });
        let cores = self
            .metrics
            .cores
            .then(|| self.launch(Metric::Cores, |s: &S| s.core_info()));

        let (memory, cpu, cores) = futures::join!(
            self.wait(memory, deadline),
            self.wait(cpu, deadline),
            self.wait(cores, deadline),
        );

        let memory: Option<MemorySnapshot> = memory.transpose()?;
        let cpu: Option<(f64, CpuCounters)> = cpu.transpose()?;
        let cores: Option<CoreInfo> = cores.transpose()?;

        debug!(?memory, cpu_usage = ?cpu.map(|c| c.0), ?cores, "collection round complete");

        Ok(Collected {
            sample: TickSample {
                memory,
                cpu_usage: cpu.map(|(usage, _)| usage),
                cores,
            },
            baseline: cpu.map_or(baseline, |(_, counters)| counters),
        })
    }

    /// Spawn `read` on a blocking task wired to a fresh oneshot channel.
    fn launch<T, F>(&self, metric: Metric, read: F) -> Unit<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let sources = Arc::clone(&self.sources);

        tokio::task::spawn_blocking(move || {
            // The receiver is gone if the round already timed out.
            let _ = tx.send(read(&sources));
        });

        Unit { metric, rx }
    }

    async fn wait<T>(&self, unit: Option<Unit<T>>, deadline: Instant) -> Option<Result<T>> {
        let Unit { metric, rx } = unit?;

        let result = match time::timeout_at(deadline, rx).await {
            Ok(Ok(result)) => result,
            // Sender dropped without a value: the task panicked.
            Ok(Err(_)) => Err(MonitorError::SamplerCrashed { metric }),
            Err(_) => Err(MonitorError::SamplerTimeout {
                metric,
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        if let Err(e) = &result {
            error!("{metric} sampler failed: {e}");
        }
        Some(result)
    }
}
