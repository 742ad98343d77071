use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use termon_core::{CoreInfo, CpuCounters, MemorySnapshot, Metric, MetricSet, MonitorError, Result};
use termon_system::{Collector, MetricSources};

#[derive(Default)]
struct FakeSources {
    counters:    Mutex<VecDeque<CpuCounters>>,
    memory_fail: bool,
    cores_hang:  Option<Duration>,
    cpu_panics:  bool,
    cpu_calls:   AtomicUsize,
    cores_calls: AtomicUsize,
}

impl FakeSources {
    fn with_counters(counters: &[CpuCounters]) -> Self {
        Self {
            counters: Mutex::new(counters.iter().copied().collect()),
            ..Default::default()
        }
    }
}

impl MetricSources for FakeSources {
    fn cpu_counters(&self) -> Result<CpuCounters> {
        self.cpu_calls.fetch_add(1, Ordering::SeqCst);
        if self.cpu_panics {
            panic!("cpu source exploded");
        }
        Ok(self.counters.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn memory(&self) -> Result<MemorySnapshot> {
        if self.memory_fail {
            return Err(MonitorError::source_read(
                "/proc/meminfo",
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        Ok(MemorySnapshot::new(16_000_000_000, 8_000_000_000))
    }

    fn core_info(&self) -> Result<CoreInfo> {
        self.cores_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.cores_hang {
            std::thread::sleep(delay);
        }
        Ok(CoreInfo::from_khz(4, 3_000_000))
    }
}

fn counters(busy: u64, idle: u64) -> CpuCounters {
    CpuCounters { user: busy, idle, ..Default::default() }
}

fn collector(sources: FakeSources, metrics: MetricSet) -> (Arc<FakeSources>, Collector<FakeSources>) {
    let sources = Arc::new(sources);
    let collector = Collector::new(Arc::clone(&sources), metrics, Duration::from_millis(200));
    (sources, collector)
}

#[tokio::test]
async fn test_collects_every_enabled_metric() {
    let (_, collector) = collector(
        FakeSources::with_counters(&[counters(30, 70)]),
        MetricSet::all(),
    );

    let collected = collector.collect(CpuCounters::default()).await.unwrap();
    let sample = collected.sample;
    assert_eq!(sample.memory, Some(MemorySnapshot::new(16_000_000_000, 8_000_000_000)));
    assert_eq!(sample.cores.map(|c| c.core_count), Some(4));
    assert!((sample.cpu_usage.unwrap() - 30.0).abs() < 1e-9);
    assert_eq!(collected.baseline, counters(30, 70));
}

#[tokio::test]
async fn test_baseline_threads_through_rounds() {
    let (_, collector) = collector(
        FakeSources::with_counters(&[counters(100, 900), counters(150, 950), counters(150, 950)]),
        MetricSet::none().with(Metric::Cpu),
    );

    let first = collector.collect(CpuCounters::default()).await.unwrap();
    assert!((first.sample.cpu_usage.unwrap() - 10.0).abs() < 1e-9);

    let second = collector.collect(first.baseline).await.unwrap();
    assert!((second.sample.cpu_usage.unwrap() - 50.0).abs() < 1e-9);

    // Counters did not move: zero-length interval.
    let third = collector.collect(second.baseline).await.unwrap();
    assert_eq!(third.sample.cpu_usage, Some(0.0));
}

#[tokio::test]
async fn test_disabled_metrics_are_not_read() {
    let (sources, collector) = collector(FakeSources::default(), MetricSet::none().with(Metric::Memory));
    let baseline = counters(5, 5);

    let collected = collector.collect(baseline).await.unwrap();
    assert!(collected.sample.memory.is_some());
    assert_eq!(collected.sample.cpu_usage, None);
    assert_eq!(collected.sample.cores, None);
    assert_eq!(collected.baseline, baseline);
    assert_eq!(sources.cpu_calls.load(Ordering::SeqCst), 0);
    assert_eq!(sources.cores_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_source_failure_fails_the_round_without_blocking_others() {
    let (sources, collector) = collector(
        FakeSources { memory_fail: true, ..Default::default() },
        MetricSet::all(),
    );

    let err = collector.collect(CpuCounters::default()).await.unwrap_err();
    assert!(matches!(err, MonitorError::SourceRead { .. }));
    assert_eq!(sources.cpu_calls.load(Ordering::SeqCst), 1);
    assert_eq!(sources.cores_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_hung_source_times_out() {
    let (_, collector) = collector(
        FakeSources { cores_hang: Some(Duration::from_millis(600)), ..Default::default() },
        MetricSet::all(),
    );

    let started = Instant::now();
    let err = collector.collect(CpuCounters::default()).await.unwrap_err();
    assert!(matches!(err, MonitorError::SamplerTimeout { metric: Metric::Cores, timeout_ms: 200 }));
    assert!(started.elapsed() < Duration::from_millis(550));
}

#[tokio::test]
async fn test_panicking_source_is_reported_as_crash() {
    let (_, collector) = collector(
        FakeSources { cpu_panics: true, ..Default::default() },
        MetricSet::all(),
    );

    let err = collector.collect(CpuCounters::default()).await.unwrap_err();
    assert!(matches!(err, MonitorError::SamplerCrashed { metric: Metric::Cpu }));
}

#[tokio::test]
async fn test_first_error_in_panel_order_wins() {
    let (_, collector) = collector(
        FakeSources { memory_fail: true, cpu_panics: true, ..Default::default() },
        MetricSet::all(),
    );

    let err = collector.collect(CpuCounters::default()).await.unwrap_err();
    assert!(matches!(err, MonitorError::SourceRead { .. }));
}
