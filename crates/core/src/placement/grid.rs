#![forbid(unsafe_code)]

use crate::CoreError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Virtual pages stacked vertically in a content page's grid.
pub const PAGE_COUNT: u32 = 10;

/// A concrete grid coordinate. Rows are absolute across all virtual pages.
///
/// Field order gives the derived `Ord` row-major ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub row: u32,
    pub column: u32,
}

impl GridCell {
    pub fn new(column: u32, row: u32) -> Self {
        Self { row, column }
    }
}

/// Stored as `"col,row"`.
impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid grid pair {0:?} (expected \"a,b\")")]
pub struct GridParseError(pub String);

fn parse_pair(raw: &str) -> Result<(u32, u32), GridParseError> {
    let invalid = || GridParseError(raw.to_string());
    let (a, b) = raw.split_once(',').ok_or_else(invalid)?;
    let a = a.trim().parse::<u32>().map_err(|_| invalid())?;
    let b = b.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((a, b))
}

impl FromStr for GridCell {
    type Err = GridParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (column, row) = parse_pair(raw)?;
        Ok(Self::new(column, row))
    }
}

/// Width and height of a placed element, stored as `"w,h"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpan {
    pub columns: u32,
    pub rows: u32,
}

impl Default for GridSpan {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
        }
    }
}

impl fmt::Display for GridSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.columns, self.rows)
    }
}

impl FromStr for GridSpan {
    type Err = GridParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (columns, rows) = parse_pair(raw)?;
        Ok(Self {
            columns: columns.max(1),
            rows: rows.max(1),
        })
    }
}

/// Dimensions of one page layout (one device shape) of the content page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutGeometry {
    pub layout_id: i64,
    pub columns: u32,
    pub rows: u32,
}

impl LayoutGeometry {
    pub fn try_new(layout_id: i64, columns: u32, rows: u32) -> Result<Self, CoreError> {
        if columns == 0 || rows == 0 {
            return Err(CoreError::InputFormat(format!(
                "layout {layout_id} has an empty grid ({columns}x{rows})"
            )));
        }
        if columns
            .checked_mul(rows)
            .and_then(|cells| cells.checked_mul(PAGE_COUNT))
            .is_none()
        {
            return Err(CoreError::InputFormat(format!(
                "layout {layout_id} grid {columns}x{rows} is too large"
            )));
        }
        Ok(Self {
            layout_id,
            columns,
            rows,
        })
    }

    pub fn cells_per_page(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn total_rows(&self) -> u32 {
        self.rows * PAGE_COUNT
    }

    /// 1-based virtual page holding `cell`.
    pub fn page_of(&self, cell: GridCell) -> u32 {
        cell.row / self.rows + 1
    }

    /// Bottom-right of every page is the home slot; top-right of pages 2..=10 is navigation.
    pub fn is_reserved(&self, cell: GridCell) -> bool {
        if cell.column != self.columns - 1 {
            return false;
        }
        let row_in_page = cell.row % self.rows;
        let bottom = row_in_page == self.rows - 1;
        let top_after_first_page = row_in_page == 0 && self.page_of(cell) > 1;
        bottom || top_after_first_page
    }

    pub fn reserved_cells(&self) -> BTreeSet<GridCell> {
        self.cells().filter(|cell| self.is_reserved(*cell)).collect()
    }

    /// Reserved home cell on the first page.
    pub fn home_cell(&self) -> GridCell {
        GridCell::new(self.columns - 1, self.rows - 1)
    }

    /// Cells covered by an element of `span` placed at `origin`, clipped to the grid.
    pub fn covered_cells(
        &self,
        origin: GridCell,
        span: GridSpan,
    ) -> impl Iterator<Item = GridCell> {
        let row_end = origin.row.saturating_add(span.rows).min(self.total_rows());
        let column_end = origin.column.saturating_add(span.columns).min(self.columns);
        (origin.row..row_end).flat_map(move |row| {
            (origin.column..column_end).map(move |column| GridCell::new(column, row))
        })
    }

    /// All cells of all virtual pages, page ascending then row-major.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.total_rows())
            .flat_map(move |row| (0..self.columns).map(move |column| GridCell::new(column, row)))
    }
}
