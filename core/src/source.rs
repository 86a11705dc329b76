//! Row sources — forward-only cursors over tabular data.
//!
//! RULE: a source is single-pass. The run loop only ever walks a
//! contiguous forward slice of one sheet, so nothing here rewinds.

use crate::{
    error::{CaseError, CaseResult},
    types::{Row, RowNumber},
};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::{collections::VecDeque, path::Path};

/// A forward cursor over rows.
pub trait RowSource {
    /// Advance one row.
    ///
    /// - `None`:         the source is exhausted
    /// - `Some(Err(_))`: this row could not be read; the cursor has still moved past it
    /// - `Some(Ok(row))`: the next row's cells
    fn advance(&mut self) -> Option<CaseResult<Row>>;

    /// 1-based sheet row number of the row most recently returned by advance().
    fn position(&self) -> RowNumber;
}

/// Consume the header row and `skip_lines` further rows before the main loop.
/// Returns how many rows were actually consumed.
pub fn skip_preamble(source: &mut dyn RowSource, skip_header: bool, skip_lines: usize) -> usize {
    let wanted = usize::from(skip_header) + skip_lines;
    let mut skipped = 0;
    while skipped < wanted {
        if source.advance().is_none() {
            break;
        }
        skipped += 1;
    }
    skipped
}

/// A worksheet loaded from an xlsx/xls/ods workbook.
///
/// The sheet is materialized when opened and the workbook handle is
/// dropped before `open` returns, so no file stays open for the run.
pub struct SheetRowSource {
    range:    Range<Data>,
    next_row: u32,
    last_row: Option<u32>,
}

impl SheetRowSource {
    pub fn open(path: impl AsRef<Path>, sheet: &str) -> CaseResult<Self> {
        let path = path.as_ref();
        let open_err = |reason: String| CaseError::SourceOpen {
            path: path.display().to_string(),
            sheet: sheet.to_string(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| open_err(e.to_string()))?;
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(open_err("no such sheet".to_string()));
        }
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| open_err(e.to_string()))?;

        let last_row = range.end().map(|(row, _)| row);
        log::debug!(
            "Opened sheet '{sheet}' in {} ({} rows)",
            path.display(),
            last_row.map_or(0, |r| r + 1)
        );
        Ok(Self {
            range,
            next_row: 0,
            last_row,
        })
    }

    /// Cells of an absolute sheet row, column A first. Trailing empty
    /// cells are dropped so the row is as wide as its last filled cell.
    /// Error values (`#DIV/0!`, `#N/A`) come back as their display text.
    fn read_row(&self, row: u32) -> Row {
        let last_col = self.range.end().map_or(0, |(_, col)| col + 1);
        let mut cells: Row = (0..last_col)
            .map(|col| match self.range.get_value((row, col)) {
                Some(Data::Empty) | None => String::new(),
                Some(value) => value.to_string(),
            })
            .collect();
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        cells
    }
}

impl RowSource for SheetRowSource {
    fn advance(&mut self) -> Option<CaseResult<Row>> {
        let last = self.last_row?;
        if self.next_row > last {
            return None;
        }
        let row = self.next_row;
        self.next_row += 1;
        Some(Ok(self.read_row(row)))
    }

    fn position(&self) -> RowNumber {
        self.next_row as RowNumber
    }
}

/// Rows already held in memory. Entries may be pre-baked read failures.
#[derive(Debug, Default)]
pub struct MemoryRowSource {
    rows:     VecDeque<CaseResult<Row>>,
    consumed: RowNumber,
}

impl MemoryRowSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter().map(Ok).collect(),
            consumed: 0,
        }
    }

    /// Build from string slices, convenient for fixtures.
    pub fn from_cells(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn with_row(mut self, cells: &[&str]) -> Self {
        self.rows
            .push_back(Ok(cells.iter().map(|c| c.to_string()).collect()));
        self
    }

    /// Rows not yet handed out.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Append a row that fails to read when reached.
    pub fn push_unreadable(&mut self, reason: &str) {
        let row = self.consumed + self.rows.len() + 1;
        self.rows.push_back(Err(CaseError::SourceRead {
            row,
            reason: reason.to_string(),
        }));
    }
}

impl RowSource for MemoryRowSource {
    fn advance(&mut self) -> Option<CaseResult<Row>> {
        let next = self.rows.pop_front()?;
        self.consumed += 1;
        Some(next)
    }

    fn position(&self) -> RowNumber {
        self.consumed
    }
}
