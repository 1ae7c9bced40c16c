// Spreadsheet model. Accepted articles are kept in memory with the row they
// were assigned; the xlsx file is rebuilt from them on every save.

use crate::article::{placeholder, Article, PubYear};
use crate::error::SheetError;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column headers, in column order A..H.
pub const HEADERS: [&str; 8] = [
    "PMID", "Title", "Authors", "Year", "Language", "Journal", "Abstract", "Link",
];

/// Row (1-based, as shown in spreadsheet software) of the first article.
pub const FIRST_DATA_ROW: u32 = 2;

/// Longest string a single xlsx cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

const MAX_SHEET_NAME_CHARS: usize = 31;
const FORBIDDEN_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Check a sheet name against the xlsx worksheet naming rules. The same
/// name is used for the file, so path separators are excluded as well.
pub fn validate_sheet_name(name: &str) -> Result<(), SheetError> {
    let invalid = |reason: &'static str| -> Result<(), SheetError> {
        Err(SheetError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };
    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name.chars().count() > MAX_SHEET_NAME_CHARS {
        return invalid("name is longer than 31 characters");
    }
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return invalid("name contains one of [ ] : * ? / \\");
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return invalid("name starts or ends with an apostrophe");
    }
    Ok(())
}

#[derive(Debug)]
pub struct ArticleSheet {
    name: String,
    rows: Vec<(u32, Article)>,
    next_row: u32,
    /// Inserts since the last successful save.
    unsaved: usize,
}

impl ArticleSheet {
    pub fn new(name: impl Into<String>) -> Result<Self, SheetError> {
        let name = name.into();
        validate_sheet_name(&name)?;
        Ok(ArticleSheet {
            name,
            rows: Vec::new(),
            next_row: FIRST_DATA_ROW,
            unsaved: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<name>.xlsx`
    pub fn file_name(&self) -> String {
        format!("{}.xlsx", self.name)
    }

    /// Number of accepted articles.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved > 0
    }

    /// Articles inserted since the last successful save.
    pub fn unsaved_count(&self) -> usize {
        self.unsaved
    }

    /// Rows in insertion order, with their 1-based row numbers.
    #[cfg(test)]
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Article)> {
        self.rows.iter().map(|(row, article)| (*row, article))
    }

    /// Append an article and return the row it occupies. Rows are handed
    /// out in increasing order and never reused.
    pub fn insert(&mut self, article: Article) -> u32 {
        let row = self.next_row;
        self.next_row += 1;
        info!(row, pmid = %article.pmid, "article inserted");
        self.rows.push((row, article));
        self.unsaved += 1;
        row
    }

    /// Write `<dir>/<name>.xlsx`, replacing any existing file.
    pub fn save_in(&mut self, dir: &Path) -> Result<PathBuf, SheetError> {
        if !dir.is_dir() {
            return Err(SheetError::NotADirectory(dir.to_path_buf()));
        }
        let path = dir.join(self.file_name());

        let mut workbook = self.to_workbook()?;
        workbook.save(&path)?;

        self.unsaved = 0;
        info!(path = %path.display(), rows = self.rows.len(), "sheet saved");
        Ok(path)
    }

    fn to_workbook(&self) -> Result<Workbook, SheetError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.name)?;

        let bold = Format::new().set_bold();
        for (col, header) in (0u16..).zip(HEADERS) {
            worksheet.write_string_with_format(0, col, header, &bold)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        for (row, article) in &self.rows {
            write_article(worksheet, row - 1, article)?;
        }
        Ok(workbook)
    }
}

/// Value of one cell, before it is handed to the worksheet.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

/// An article's cells in [`HEADERS`] order.
fn row_cells(article: &Article) -> [Cell<'_>; 8] {
    let year = match &article.year {
        PubYear::Numeric(year) => Cell::Number(f64::from(*year)),
        PubYear::Raw(raw) => Cell::Text(cell_text(raw)),
        PubYear::Missing => Cell::Number(f64::from(placeholder::YEAR)),
    };
    [
        Cell::Number(f64::from(article.pmid.get())),
        Cell::Text(cell_text(&article.title)),
        Cell::Text(cell_text(&article.authors)),
        year,
        Cell::Text(cell_text(&article.language)),
        Cell::Text(cell_text(&article.journal)),
        Cell::Text(cell_text(&article.abstract_text)),
        Cell::Text(cell_text(&article.link)),
    ]
}

fn write_article(sheet: &mut Worksheet, row: u32, article: &Article) -> Result<(), SheetError> {
    for (col, cell) in (0u16..).zip(row_cells(article)) {
        match cell {
            Cell::Number(value) => sheet.write_number(row, col, value)?,
            Cell::Text(text) => sheet.write_string(row, col, text)?,
        };
    }
    Ok(())
}

/// Truncate to what a cell can hold, on a character boundary.
fn cell_text(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
