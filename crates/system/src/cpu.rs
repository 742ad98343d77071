use crate::read_source;
use std::path::Path;
use termon_core::{CpuCounters, MonitorError, Result};

/// Parse the aggregate `cpu` line of `/proc/stat`.
///
/// Needs the first seven columns: user, nice, system, idle, iowait, irq,
/// softirq. Anything after them (steal, guest) is ignored.
pub fn parse_proc_stat(raw: &str) -> Result<CpuCounters> {
    let line = raw
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| MonitorError::source_parse("cpu statistics", "no aggregate 'cpu' line"))?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .take(7)
        .map(|f| {
            f.parse::<u64>().map_err(|e| {
                MonitorError::source_parse("cpu statistics", format!("bad counter '{f}': {e}"))
            })
        })
        .collect::<Result<Vec<u64>>>()?;

    let &[user, nice, system, idle, iowait, irq, softirq] = fields.as_slice() else {
        return Err(MonitorError::source_parse(
            "cpu statistics",
            format!("expected 7 counters, found {}", fields.len()),
        ));
    };

    Ok(CpuCounters { user, nice, system, idle, iowait, irq, softirq })
}

pub fn read_counters(path: &Path) -> Result<CpuCounters> {
    parse_proc_stat(&read_source(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  4705 356 584 3699176 23060 0 277 0 0 0
cpu0 1393 280 320 906777 17322 0 220 0 0 0
intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]
";

    #[test]
    fn parses_aggregate_line() {
        let c = parse_proc_stat(STAT).unwrap();
        assert_eq!(c.user, 4705);
        assert_eq!(c.nice, 356);
        assert_eq!(c.system, 584);
        assert_eq!(c.idle, 3_699_176);
        assert_eq!(c.iowait, 23_060);
        assert_eq!(c.irq, 0);
        assert_eq!(c.softirq, 277);
    }

    #[test]
    fn per_core_lines_are_not_the_aggregate() {
        let err = parse_proc_stat("cpu0 1 2 3 4 5 6 7\n").unwrap_err();
        assert!(matches!(err, MonitorError::SourceParse { .. }));
    }

    #[test]
    fn too_few_counters() {
        let err = parse_proc_stat("cpu  1 2 3 4\n").unwrap_err();
        assert!(err.to_string().contains("expected 7 counters, found 4"));
    }

    #[test]
    fn garbage_counter() {
        assert!(parse_proc_stat("cpu  1 2 x 4 5 6 7\n").is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_counters(&dir.path().join("stat")).unwrap_err();
        assert!(matches!(err, MonitorError::SourceRead { .. }));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stat");
        std::fs::write(&path, STAT).unwrap();
        assert_eq!(read_counters(&path).unwrap().user, 4705);
    }
}
