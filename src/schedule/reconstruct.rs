// src/schedule/reconstruct.rs

use super::{DayBlock, LessonEntry, DAY_COL, FIRST_DATA_ROW, PAIR_COL, TIME_COL};
use crate::grid::{cell_at, normalize_cell, Grid};
use tracing::{debug, trace};

/// The cells of one data row that matter for a group, already normalized.
#[derive(Debug, Default, PartialEq, Eq)]
struct RowFields<'a> {
    day: Option<&'a str>,
    pair_number: Option<i64>,
    time: Option<&'a str>,
    subject: Option<&'a str>,
    room: Option<&'a str>,
}

impl<'a> RowFields<'a> {
    fn read(row: &'a [String], group_col: usize) -> Self {
        Self {
            day: normalize_cell(cell_at(row, DAY_COL)),
            pair_number: normalize_cell(cell_at(row, PAIR_COL)).and_then(parse_pair_number),
            time: normalize_cell(cell_at(row, TIME_COL)),
            subject: normalize_cell(cell_at(row, group_col)),
            room: normalize_cell(cell_at(row, group_col + 1)),
        }
    }

    fn lesson(&self) -> Option<LessonEntry> {
        self.subject.map(|subject| LessonEntry {
            pair_number: self.pair_number,
            subject: subject.to_string(),
            room: self.room.unwrap_or_default().to_string(),
            time: self.time.unwrap_or_default().to_string(),
        })
    }
}

fn parse_pair_number(raw: &str) -> Option<i64> {
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            trace!(raw, "pair number is not an integer; leaving it empty");
            None
        }
    }
}

/// Where the walk is relative to the sparse day labels in column 0.
#[derive(Debug)]
enum DayState {
    NoDayYet,
    InDay { day: String, lessons: Vec<LessonEntry> },
}

impl DayState {
    /// Move to a new day, emitting the current one if it collected lessons.
    fn start_day(&mut self, day: &str, out: &mut Vec<DayBlock>) {
        let previous = std::mem::replace(
            self,
            DayState::InDay {
                day: day.to_string(),
                lessons: Vec::new(),
            },
        );
        previous.finish(out);
    }

    fn push(&mut self, lesson: LessonEntry) {
        if let DayState::InDay { lessons, .. } = self {
            lessons.push(lesson);
        }
    }

    fn finish(self, out: &mut Vec<DayBlock>) {
        match self {
            DayState::InDay { day, lessons } if !lessons.is_empty() => {
                out.push(DayBlock { day, lessons });
            }
            DayState::InDay { day, .. } => {
                debug!(day = %day, "dropping day without lessons");
            }
            DayState::NoDayYet => {}
        }
    }
}

/// Walk the data rows and group the lessons under `group_col` by day.
///
/// A day label sits only on the first row of its block. Rows before the
/// first label are ignored, and days that end up with no lessons are left
/// out of the result.
pub fn reconstruct_schedule(grid: &Grid, group_col: usize) -> Vec<DayBlock> {
    let mut out = Vec::new();
    let mut state = DayState::NoDayYet;

    for (idx, row) in grid.rows_from(FIRST_DATA_ROW) {
        let fields = RowFields::read(row, group_col);

        if let Some(day) = fields.day {
            state.start_day(day, &mut out);
        }
        if let DayState::NoDayYet = state {
            if fields.subject.is_some() {
                trace!(row = idx, "subject before first day label; skipped");
            }
            continue;
        }
        if let Some(lesson) = fields.lesson() {
            state.push(lesson);
        }
    }
    state.finish(&mut out);

    out
}
