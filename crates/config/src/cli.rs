//! Command-line surface: `[samples [tdelay]] [--memory] [--cpu] [--cores]
//! [--samples=N] [--tdelay=T]`.

use crate::schema::{Metrics, MonitorConfig};
use std::ffi::OsString;
use termon_core::{Metric, MetricSet, MonitorError, Result};

pub const USAGE: &str =
    "Usage: termon [samples [tdelay]] [--memory] [--cpu] [--cores] [--samples=N] [--tdelay=T]";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(CliArgs),
    Help,
}

/// Values given on the command line; `None` when not provided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    pub samples:   Option<u32>,
    pub tdelay_us: Option<u64>,
    /// `None` when no metric flag was given, meaning all metrics.
    pub metrics:   Option<MetricSet>,
}

impl CliArgs {
    /// Overlay these values on a loaded config.
    pub fn apply(&self, config: &mut MonitorConfig) {
        if let Some(samples) = self.samples {
            config.sampling.samples = samples;
        }
        if let Some(tdelay) = self.tdelay_us {
            config.sampling.tdelay_us = tdelay;
        }
        config.metrics = self.metrics.map(Metrics).unwrap_or_default();
    }
}

/// Parse arguments, excluding the program name.
///
/// Flags are matched by prefix. A bare number in first position sets the
/// sample count; a bare number in second position sets the delay, but only
/// when the first one was a number too. Bare numbers anywhere else are
/// ignored.
pub fn parse<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = CliArgs::default();
    let mut samples_positional = false;

    for (pos, arg) in args.into_iter().enumerate() {
        let arg = arg.as_ref();
        let position = pos + 1;

        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        } else if arg.starts_with("--memory") {
            enable(&mut parsed, Metric::Memory);
        } else if arg.starts_with("--cpu") {
            enable(&mut parsed, Metric::Cpu);
        } else if arg.starts_with("--cores") {
            enable(&mut parsed, Metric::Cores);
        } else if let Some(value) = arg.strip_prefix("--samples=") {
            parsed.samples = Some(parse_samples(value, arg)?);
        } else if let Some(value) = arg.strip_prefix("--tdelay=") {
            parsed.tdelay_us = Some(parse_number(value, arg)?);
        } else if is_number(arg) {
            match position {
                1 => {
                    parsed.samples = Some(parse_samples(arg, arg)?);
                    samples_positional = true;
                }
                2 if samples_positional => parsed.tdelay_us = Some(parse_number(arg, arg)?),
                _ => tracing::warn!("ignoring positional number '{arg}' at position {position}"),
            }
        } else {
            return Err(MonitorError::Argument(arg.to_string()));
        }
    }

    Ok(Command::Run(parsed))
}

/// [`parse`] for raw OS arguments. An argument that is not valid UTF-8 is an
/// argument error, reported lossily.
pub fn parse_os<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = OsString>,
{
    let args = args
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|raw| MonitorError::Argument(raw.to_string_lossy().into_owned()))
        })
        .collect::<Result<Vec<_>>>()?;
    parse(args)
}

fn enable(parsed: &mut CliArgs, metric: Metric) {
    let set = parsed.metrics.unwrap_or_else(MetricSet::none);
    parsed.metrics = Some(set.with(metric));
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_number<T: std::str::FromStr>(value: &str, arg: &str) -> Result<T> {
    if !is_number(value) {
        return Err(MonitorError::Argument(arg.to_string()));
    }
    value.parse().map_err(|_| MonitorError::Argument(arg.to_string()))
}

fn parse_samples(value: &str, arg: &str) -> Result<u32> {
    match parse_number::<u32>(value, arg)? {
        0 => Err(MonitorError::Argument(arg.to_string())),
        n => Ok(n),
    }
}
