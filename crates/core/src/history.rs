use crate::error::{MonitorError, Result};
use crate::state::Metric;

/// Number of bucket rows in every history grid. Row 0 is the peak, the last
/// row is the baseline.
pub const HISTORY_HEIGHT: usize = 10;

/// Quantise a fraction in `[0, 1]` into a bucket row.
///
/// `row = 9 - floor(fraction * 9)`, so a full reading lands on row 0 and an
/// empty one on row 9. Out-of-range or NaN input is clamped.
pub fn bucket_row(fraction: f64) -> usize {
    let last = HISTORY_HEIGHT - 1;
    if fraction.is_nan() {
        return last;
    }
    let level = (fraction.clamp(0.0, 1.0) * last as f64).floor() as usize;
    last - level.min(last)
}

/// Fixed-size grid of marks, one column per tick.
///
/// Allocated once; columns are reused cyclically when a run has more ticks
/// than the grid is wide. Each column holds at most one mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    width: usize,
    /// Row-major, `HISTORY_HEIGHT * width` cells.
    cells: Vec<bool>,
}

impl HistoryBuffer {
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(MonitorError::Setup("history width must be at least 1".into()));
        }
        Ok(Self {
            width,
            cells: vec![false; HISTORY_HEIGHT * width],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Column a given tick writes to.
    pub fn column_for_tick(&self, tick: usize) -> usize {
        tick % self.width
    }

    /// Clear `column`, then mark `row` in it.
    ///
    /// `column` wraps at the grid width and `row` is clamped to the baseline.
    pub fn update(&mut self, column: usize, row: usize) {
        let column = column % self.width;
        let row = row.min(HISTORY_HEIGHT - 1);
        for r in 0..HISTORY_HEIGHT {
            self.cells[r * self.width + column] = false;
        }
        self.cells[row * self.width + column] = true;
    }

    pub fn is_marked(&self, row: usize, column: usize) -> bool {
        row < HISTORY_HEIGHT && column < self.width && self.cells[row * self.width + column]
    }

    /// The marked row of `column`, if any tick has written it yet.
    pub fn marked_row(&self, column: usize) -> Option<usize> {
        (0..HISTORY_HEIGHT).find(|&r| self.is_marked(r, column))
    }

    /// The full grid, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.width)
    }
}

/// The two history grids a run owns.
#[derive(Debug, Clone)]
pub struct Histories {
    pub cpu:    HistoryBuffer,
    pub memory: HistoryBuffer,
}

impl Histories {
    pub fn new(width: usize) -> Result<Self> {
        Ok(Self {
            cpu:    HistoryBuffer::new(width)?,
            memory: HistoryBuffer::new(width)?,
        })
    }

    pub fn width(&self) -> usize {
        self.cpu.width()
    }

    /// Record one tick's bucket for `metric`. Core topology keeps no history.
    pub fn update(&mut self, metric: Metric, column: usize, row: usize) {
        match metric {
            Metric::Cpu    => self.cpu.update(column, row),
            Metric::Memory => self.memory.update(column, row),
            Metric::Cores  => tracing::debug!("no history kept for {metric}"),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<&HistoryBuffer> {
        match metric {
            Metric::Cpu    => Some(&self.cpu),
            Metric::Memory => Some(&self.memory),
            Metric::Cores  => None,
        }
    }
}
