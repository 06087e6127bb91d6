// src/schedule/mod.rs

pub mod locate;
pub mod reconstruct;

pub use locate::{list_groups, locate_group_column};
pub use reconstruct::reconstruct_schedule;

use crate::error::ScheduleError;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Row holding the group names.
pub const HEADER_ROW: usize = 4;
/// First column carrying a group name.
pub const FIRST_GROUP_COL: usize = 3;
/// Group name columns alternate with their room columns.
pub const GROUP_COL_STRIDE: usize = 2;
/// First row after the header block.
pub const FIRST_DATA_ROW: usize = 5;

pub const DAY_COL: usize = 0;
pub const PAIR_COL: usize = 1;
pub const TIME_COL: usize = 2;

/// One class slot for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonEntry {
    pub pair_number: Option<i64>,
    pub subject: String,
    pub room: String,
    pub time: String,
}

/// All lessons of one day, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBlock {
    pub day: String,
    pub lessons: Vec<LessonEntry>,
}

/// Response body for a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSchedule {
    pub group: String,
    pub schedule: Vec<DayBlock>,
}

/// Locate `group` in the header row and rebuild its schedule.
#[instrument(level = "debug", skip(grid), fields(rows = grid.row_count()))]
pub fn build_group_schedule(grid: &Grid, group: &str) -> Result<GroupSchedule, ScheduleError> {
    let col = locate_group_column(grid, group)
        .ok_or_else(|| ScheduleError::GroupNotFound(group.to_string()))?;
    let schedule = reconstruct_schedule(grid, col);
    debug!(col, days = schedule.len(), "schedule rebuilt");
    Ok(GroupSchedule {
        group: group.to_string(),
        schedule,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::grid::Grid;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,schedule_service=trace")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    /// Four header rows of noise, a header row, then `data`.
    pub fn grid_with(header: &[&str], data: &[&[&str]]) -> Grid {
        let mut rows = vec![
            row(&["РАСПИСАНИЕ ЗАНЯТИЙ"]),
            row(&[]),
            row(&["", "", "", "1 курс"]),
            row(&[]),
            row(header),
        ];
        rows.extend(data.iter().map(|r| row(r)));
        Grid::new(rows)
    }

    pub fn sample() -> Grid {
        grid_with(
            &["День", "Пара", "Время", "G1", "ауд.", "G2", "ауд."],
            &[
                &["Пн", "1", "8:30", "Матем", "101", "Физика", "202"],
                &["", "2", "10:10", "", "", "Химия", "203"],
                &["", "3", "11:50", "Инф", "nan", "", ""],
                &["Вт", "1", "8:30", "", "", "", ""],
                &["", "2", "10:10", "", "", "", ""],
                &["Ср", "1", "8:30", "История", "301", "Матем", "101"],
            ],
        )
    }
}
