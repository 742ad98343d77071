use crate::read_source;
use std::path::Path;
use termon_core::{CoreInfo, MonitorError, Result};

/// Count `processor` entries in `/proc/cpuinfo`.
pub fn count_processors(raw: &str) -> usize {
    raw.lines().filter(|l| l.starts_with("processor")).count()
}

/// Number of cores. Zero entries is an error: nothing can be drawn for it.
pub fn read_core_count(path: &Path) -> Result<usize> {
    match count_processors(&read_source(path)?) {
        0 => Err(MonitorError::source_parse(
            format!("'{}'", path.display()),
            "no processor entries",
        )),
        n => Ok(n),
    }
}

/// Parse a `cpuinfo_max_freq` file (a single kHz value).
pub fn parse_max_freq_khz(raw: &str) -> Result<u64> {
    let value = raw.trim();
    value.parse().map_err(|e| {
        MonitorError::source_parse("cpu frequency", format!("bad kHz value '{value}': {e}"))
    })
}

/// Core count plus the first core's maximum clock.
pub fn read_core_info(cpuinfo: &Path, cpufreq_max: &Path) -> Result<CoreInfo> {
    let count = read_core_count(cpuinfo)?;
    let khz = parse_max_freq_khz(&read_source(cpufreq_max)?)?;
    Ok(CoreInfo::from_khz(count, khz))
}
