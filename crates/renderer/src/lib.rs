//! Text layout for the dashboard.
//!
//! Everything here is a pure function of its inputs: a [`Frame`] goes in, the
//! lines of one screen come out. Clearing and writing the terminal is the
//! render sink's job.

use termon_core::{CoreInfo, HistoryBuffer, MemorySnapshot};

/// Cores drawn per grid row.
pub const CORES_PER_ROW: usize = 4;

/// Width of the axis gutter left of every history grid.
const GUTTER: &str = "         |";

/// Everything needed to draw one tick. Panels left as `None` are not drawn.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub samples:   u32,
    pub tdelay_us: u64,
    pub memory:    Option<MemoryPanel<'a>>,
    pub cpu:       Option<CpuPanel<'a>>,
    pub cores:     Option<CoreInfo>,
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryPanel<'a> {
    pub snapshot: MemorySnapshot,
    pub history:  &'a HistoryBuffer,
}

#[derive(Debug, Clone, Copy)]
pub struct CpuPanel<'a> {
    /// Usage for this tick, in percent.
    pub usage:   f64,
    pub history: &'a HistoryBuffer,
}

/// Lay out a full frame: header, then memory, cpu and core panels.
pub fn draw(frame: &Frame<'_>) -> Vec<String> {
    let mut lines = vec![header(frame.samples, frame.tdelay_us)];

    if let Some(panel) = &frame.memory {
        lines.extend(memory_panel(panel));
    }
    if let Some(panel) = &frame.cpu {
        lines.extend(cpu_panel(panel));
    }
    if let Some(info) = &frame.cores {
        lines.extend(core_panel(info));
    }
    lines
}

pub fn header(samples: u32, tdelay_us: u64) -> String {
    format!(
        "Nbr of samples: {samples} -- every {tdelay_us} microSecs ({:.2} secs)",
        tdelay_us as f64 / 1e6
    )
}

/// Memory bars: `#` marks, axis labelled with total GB at the top and 0 GB at
/// the bottom.
pub fn memory_panel(panel: &MemoryPanel<'_>) -> Vec<String> {
    let mut lines = vec![format!("v Memory {:.2} GB", panel.snapshot.used_gb())];
    let top = format!("{:.2} GB |", panel.snapshot.total_gb());
    lines.extend(grid(panel.history, '#', &top));
    lines.push(format!("    0 GB {}", "-".repeat(panel.history.width())));
    lines
}

/// CPU bars: `:` marks, 100% at the top, unlabelled baseline.
pub fn cpu_panel(panel: &CpuPanel<'_>) -> Vec<String> {
    let mut lines = vec![format!("v CPU {:.2} %", panel.usage)];
    lines.extend(grid(panel.history, ':', "    100% |"));
    lines.push(format!("         {}", "-".repeat(panel.history.width())));
    lines
}

/// Core count and clock, then one box per core, four boxes per row.
pub fn core_panel(info: &CoreInfo) -> Vec<String> {
    let mut lines = vec![format!(
        "v Number of Cores: {} @ {:.2} GHz",
        info.core_count, info.max_clock_ghz
    )];

    let rows = info.core_count.div_ceil(CORES_PER_ROW);
    for row in 0..rows {
        let present = (info.core_count - row * CORES_PER_ROW).min(CORES_PER_ROW);
        for piece in ["+---+ ", "|   | ", "+---+ "] {
            let mut line = piece.repeat(present);
            line.push_str(&"      ".repeat(CORES_PER_ROW - present));
            lines.push(line);
        }
    }
    lines
}

fn grid(history: &HistoryBuffer, mark: char, top_label: &str) -> Vec<String> {
    history
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let mut line = String::from(if row == 0 { top_label } else { GUTTER });
            line.extend(cells.iter().map(|&on| if on { mark } else { ' ' }));
            line
        })
        .collect()
}
