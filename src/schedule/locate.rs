// src/schedule/locate.rs

use super::{FIRST_GROUP_COL, GROUP_COL_STRIDE, HEADER_ROW};
use crate::grid::{normalize_cell, Grid};
use tracing::trace;

/// Non-blank group name cells of the header row, with their column index.
/// Empty and not-a-value cells never name a group.
fn group_header_cells(grid: &Grid) -> impl Iterator<Item = (usize, &str)> {
    let header = grid.row(HEADER_ROW).unwrap_or(&[]);
    header
        .iter()
        .enumerate()
        .skip(FIRST_GROUP_COL)
        .step_by(GROUP_COL_STRIDE)
        .filter_map(|(idx, cell)| normalize_cell(cell).map(|name| (idx, name)))
}

/// Column index whose header cell equals `group` after trimming.
/// Comparison is exact and case-sensitive; an empty name matches nothing.
pub fn locate_group_column(grid: &Grid, group: &str) -> Option<usize> {
    let found = group_header_cells(grid)
        .find(|&(_, name)| name == group)
        .map(|(idx, _)| idx);
    trace!(group, ?found, "group column lookup");
    found
}

/// Every group named in the header row, in column order.
pub fn list_groups(grid: &Grid) -> Vec<String> {
    group_header_cells(grid)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixtures::grid_with;

    #[test]
    fn test_locates_group_on_odd_column() {
        let grid = grid_with(&["_", "_", "_", "G1", "101", "G2", "102"], &[]);
        assert_eq!(locate_group_column(&grid, "G2"), Some(5));
        assert_eq!(locate_group_column(&grid, "G1"), Some(3));
    }

    #[test]
    fn test_ignores_room_columns() {
        let grid = grid_with(&["_", "_", "_", "G1", "101", "G2", "102"], &[]);
        assert_eq!(locate_group_column(&grid, "101"), None);
        assert_eq!(locate_group_column(&grid, "_"), None);
    }

    #[test]
    fn test_exact_trimmed_case_sensitive() {
        let grid = grid_with(&["", "", "", "  ИВТ-21 ", "", "ивт-22", ""], &[]);
        assert_eq!(locate_group_column(&grid, "ИВТ-21"), Some(3));
        assert_eq!(locate_group_column(&grid, "ИВТ-22"), None);
        assert_eq!(locate_group_column(&grid, "ИВТ"), None);
    }

    #[test]
    fn test_missing_group() {
        let grid = grid_with(&["", "", "", "G1", "", "G2", ""], &[]);
        assert_eq!(locate_group_column(&grid, "G9"), None);
    }

    #[test]
    fn test_short_header_or_grid() {
        let grid = grid_with(&["a", "b", "c"], &[]);
        assert_eq!(locate_group_column(&grid, "c"), None);
        assert!(list_groups(&grid).is_empty());

        let tiny = Grid::new(vec![vec!["G1".into()]]);
        assert_eq!(locate_group_column(&tiny, "G1"), None);
        assert_eq!(locate_group_column(&Grid::default(), "G1"), None);
    }

    #[test]
    fn test_blank_header_cells_never_match() {
        let grid = grid_with(&["", "", "", "G1", "", "", "", "G3", "", "nan", ""], &[]);
        assert_eq!(locate_group_column(&grid, ""), None);
        assert_eq!(locate_group_column(&grid, "nan"), None);
        assert_eq!(locate_group_column(&grid, "G3"), Some(7));
        assert_eq!(list_groups(&grid), vec!["G1", "G3"]);
    }

    #[test]
    fn test_first_match_wins() {
        let grid = grid_with(&["", "", "", "G1", "", "G1", ""], &[]);
        assert_eq!(locate_group_column(&grid, "G1"), Some(3));
    }

    #[test]
    fn test_list_groups_skips_blanks() {
        let grid = grid_with(&["", "", "", "G1", "x", "", "y", "nan", "z", " G4 ", "w"], &[]);
        assert_eq!(list_groups(&grid), vec!["G1", "G4"]);
    }
}
