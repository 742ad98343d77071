//! Main loop for `termon`.
//!
//! Owns the run: history buffers, the CPU baseline carried between ticks,
//! the collector, and the render sink. Each tick collects, records history,
//! draws, then waits out the tick delay while answering control requests.

pub mod controls;
pub mod prompt;
pub mod sink;

pub use controls::{signal_number, spawn_signal_listener};
pub use prompt::{ConfirmPrompt, LinePrompt};
pub use sink::{RenderSink, TerminalSink};

use std::sync::Arc;
use termon_config::MonitorConfig;
use termon_core::{
    bucket_row, Control, CpuCounters, Histories, Metric, MonitorError, Result,
};
use termon_renderer::{CpuPanel, Frame, MemoryPanel};
use termon_system::{Collected, Collector, LinuxSources, MetricSources};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tokio::task;
use tokio::time::{self, Instant};
use tracing::{debug, info};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every configured tick ran.
    Completed,
    /// The user confirmed an interrupt.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks that were collected and drawn.
    pub ticks:   u32,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run against the live system, drawing to stdout and prompting on stdin.
pub async fn run(config: MonitorConfig) -> Result<RunSummary> {
    let sources = Arc::new(LinuxSources::new(&config.sources));
    let mut controls = spawn_signal_listener()?;
    let mut monitor = Monitor::new(config, sources, TerminalSink::stdout(), LinePrompt::stdin())?;
    monitor.run(&mut controls).await
}

// ── Monitor ───────────────────────────────────────────────────────────────────

pub struct Monitor<S, K, P> {
    config:     MonitorConfig,
    collector:  Collector<S>,
    histories:  Histories,
    baseline:   CpuCounters,
    core_count: usize,
    sink:       K,
    prompt:     P,
}

impl<S, K, P> Monitor<S, K, P>
where
    S: MetricSources,
    K: RenderSink,
    P: ConfirmPrompt,
{
    /// Set up a run: read the core count and allocate both history grids.
    ///
    /// Fails with [`MonitorError::Setup`] before anything is drawn if the
    /// core count is unavailable or the grid width is zero.
    pub fn new(config: MonitorConfig, sources: Arc<S>, sink: K, prompt: P) -> Result<Self> {
        let core_count = sources
            .core_count()
            .map_err(|e| MonitorError::Setup(format!("failed to determine CPU core count: {e}")))?;

        let histories = Histories::new(config.sampling.effective_history_width())?;

        let metrics = config.metrics.0;
        let baseline = if config.sampling.prime_cpu_baseline && metrics.cpu {
            sources.cpu_counters()?
        } else {
            CpuCounters::default()
        };

        info!(
            samples = config.sampling.samples,
            tdelay_us = config.sampling.tdelay_us,
            history_width = histories.width(),
            core_count,
            ?metrics,
            "monitor ready"
        );

        Ok(Self {
            collector: Collector::new(sources, metrics, config.sampling.timeout()),
            config,
            histories,
            baseline,
            core_count,
            sink,
            prompt,
        })
    }

    pub fn histories(&self) -> &Histories {
        &self.histories
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Core count read at setup.
    pub fn core_count(&self) -> usize {
        self.core_count
    }

    /// Run every configured tick, or until an interrupt is confirmed.
    ///
    /// `controls` is only read between ticks. Any sampling failure ends the
    /// run with that error.
    pub async fn run(&mut self, controls: &mut mpsc::Receiver<Control>) -> Result<RunSummary> {
        let samples = self.config.sampling.samples;

        for tick in 0..samples {
            self.tick(tick as usize).await?;

            if self.wait_between_ticks(controls).await? == Flow::Stop {
                info!(ticks = tick + 1, "run ended on request");
                return Ok(RunSummary { ticks: tick + 1, outcome: Outcome::Quit });
            }
        }

        info!(ticks = samples, "run complete");
        Ok(RunSummary { ticks: samples, outcome: Outcome::Completed })
    }

    async fn tick(&mut self, tick: usize) -> Result<()> {
        let column = self.histories.cpu.column_for_tick(tick);
        debug!(tick, column, "tick");

        let Collected { sample, baseline } = self.collector.collect(self.baseline).await?;
        self.baseline = baseline;

        if let Some(memory) = sample.memory {
            self.histories.update(Metric::Memory, column, bucket_row(memory.used_fraction()));
        }
        if let Some(usage) = sample.cpu_usage {
            self.histories.update(Metric::Cpu, column, bucket_row(usage / 100.0));
        }

        let frame = Frame {
            samples:   self.config.sampling.samples,
            tdelay_us: self.config.sampling.tdelay_us,
            memory:    sample.memory.map(|snapshot| MemoryPanel {
                snapshot,
                history: &self.histories.memory,
            }),
            cpu:       sample.cpu_usage.map(|usage| CpuPanel {
                usage,
                history: &self.histories.cpu,
            }),
            cores:     sample.cores,
        };
        self.sink.present(&termon_renderer::draw(&frame))
    }

    /// Sleep out the tick delay, handling any control that arrives meanwhile.
    async fn wait_between_ticks(&mut self, controls: &mut mpsc::Receiver<Control>) -> Result<Flow> {
        let deadline = Instant::now() + self.config.sampling.tick_delay();

        loop {
            tokio::select! {
                biased;

                Some(control) = controls.recv() => {
                    if self.handle(control)? == Flow::Stop {
                        return Ok(Flow::Stop);
                    }
                }
                _ = time::sleep_until(deadline) => return Ok(Flow::Continue),
            }
        }
    }

    /// Ask the prompt, moving off the async worker first when the runtime
    /// can spare one. `block_in_place` panics on a current-thread runtime.
    fn confirm(&mut self) -> Result<bool> {
        match Handle::current().runtime_flavor() {
            RuntimeFlavor::MultiThread => task::block_in_place(|| self.prompt.confirm()),
            _ => self.prompt.confirm(),
        }
    }

    fn handle(&mut self, control: Control) -> Result<Flow> {
        let code = signal_number(control);
        match control {
            Control::Suspend => {
                self.sink.notice(&format!("Stop ignored (code={code})"))?;
                Ok(Flow::Continue)
            }
            Control::Interrupt => {
                self.sink.notice(&format!(
                    "Interrupt (code={code}) Do you want to quit? Input 'y' or 'n'"
                ))?;
                // Nothing is sampled while the prompt blocks.
                if self.confirm()? {
                    self.sink.notice("Quitting")?;
                    Ok(Flow::Stop)
                } else {
                    self.sink.notice("Continuing")?;
                    Ok(Flow::Continue)
                }
            }
        }
    }
}
