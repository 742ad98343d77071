pub mod error;
pub mod event;
pub mod history;
pub mod state;

pub use error::{MonitorError, Result};
pub use event::Control;
pub use history::{bucket_row, Histories, HistoryBuffer, HISTORY_HEIGHT};
pub use state::{CoreInfo, CpuCounters, MemorySnapshot, Metric, MetricSet, TickSample};
