pub mod config;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod schedule;
pub mod server;

pub use config::Config;
pub use error::{ScheduleError, SourceError};
pub use fetch::{DocumentSource, HttpSource};
pub use grid::Grid;
pub use schedule::{build_group_schedule, DayBlock, GroupSchedule, LessonEntry};
