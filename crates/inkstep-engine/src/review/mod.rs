pub mod stats;

pub use stats::{CardRecord, CardState, FsrsStats, SchedulerStats, Timestamp};
