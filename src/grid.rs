// src/grid.rs

use crate::error::SourceError;
use csv::ReaderBuilder;
use std::{fs, io::Cursor, path::Path};
use tracing::debug;

/// Marker the spreadsheet export uses for a cell with no value.
pub const NOT_A_VALUE: &str = "nan";

/// The raw spreadsheet as rows of string cells, exactly as exported.
/// Rows may be ragged; a cell past the end of its row reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Parse a CSV export. There is no header record and records may have
    /// differing field counts.
    pub fn from_csv_bytes(data: &[u8]) -> Result<Self, SourceError> {
        let text = String::from_utf8_lossy(data);
        let text = text.trim_start_matches('\u{feff}');

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(text.as_bytes()));

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(rows = rows.len(), "parsed CSV grid");
        Ok(Self { rows })
    }

    /// Read and parse a CSV export from disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_bytes(&data)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// Rows from `start` onward, paired with their absolute index.
    pub fn rows_from(&self, start: usize) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, r)| (i, r.as_slice()))
    }

    /// The raw cell text, or `""` when the row or column does not exist.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Trim whitespace and map empty or not-a-value cells to `None`.
pub fn normalize_cell(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NOT_A_VALUE {
        None
    } else {
        Some(trimmed)
    }
}

/// Cell `col` of a row slice, empty when the row is too short.
pub fn cell_at(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_ragged_rows_are_kept() -> Result<()> {
        let grid = Grid::from_csv_bytes(b"a,b,c\nd\ne,f,g,h,i\n")?;
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.row(1).map(<[String]>::len), Some(1));
        assert_eq!(grid.cell(1, 0), "d");
        assert_eq!(grid.cell(1, 4), "");
        assert_eq!(grid.cell(2, 4), "i");
        assert_eq!(grid.cell(99, 0), "");
        Ok(())
    }

    #[test]
    fn test_quoted_fields_and_bom() -> Result<()> {
        let content = "\u{feff}Понедельник,\"1\",\"8:30-10:00\",\"Матем., лекция\",\"ауд. 101\"\n";
        let grid = Grid::from_csv_bytes(content.as_bytes())?;
        assert_eq!(grid.cell(0, 0), "Понедельник");
        assert_eq!(grid.cell(0, 3), "Матем., лекция");
        assert_eq!(grid.cell(0, 4), "ауд. 101");
        Ok(())
    }

    #[test]
    fn test_multiline_cell() -> Result<()> {
        let grid = Grid::from_csv_bytes(b"x,\"line one\nline two\",y\nz\n")?;
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.cell(0, 1), "line one\nline two");
        Ok(())
    }

    #[test]
    fn test_from_csv_path() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"1,2\n3,4\n")?;
        let grid = Grid::from_csv_path(tmp.path())?;
        assert_eq!(grid.cell(1, 1), "4");

        let missing = Grid::from_csv_path("/definitely/not/here.csv");
        assert!(matches!(missing, Err(SourceError::Io { .. })));
        Ok(())
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("  Физика "), Some("Физика"));
        assert_eq!(normalize_cell(""), None);
        assert_eq!(normalize_cell("   "), None);
        assert_eq!(normalize_cell("nan"), None);
        assert_eq!(normalize_cell(" nan "), None);
        assert_eq!(normalize_cell("nano"), Some("nano"));
    }

    #[test]
    fn test_rows_from_keeps_absolute_index() {
        let grid = Grid::new(vec![
            vec!["a".into()],
            vec!["b".into()],
            vec!["c".into()],
        ]);
        let idx: Vec<usize> = grid.rows_from(1).map(|(i, _)| i).collect();
        assert_eq!(idx, vec![1, 2]);
        assert_eq!(grid.rows_from(5).count(), 0);
    }
}
