use std::{
    fs::File,
    io::{
        BufReader,
        Read,
        Seek,
    },
    path::Path,
};

use calamine::{
    open_workbook,
    open_workbook_auto,
    Data,
    Range,
    Reader,
    Xlsx,
};

use crate::core::{
    WordPair,
    WordflashError,
};

const WORD_COLUMN: usize = 0;
const MEANING_COLUMN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Workbook, // Format picked from the extension by calamine
    Xlsx,     // Unknown extension, opened as xlsx
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => TableFormat::Csv,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => TableFormat::Workbook,
            _ => TableFormat::Xlsx,
        }
    }
}

/// Reads word pairs from a table file. Column 0 holds the word and column 2
/// the meaning; there is no header row.
pub fn read(path: &Path) -> Result<Vec<WordPair>, WordflashError> {
    let rows = read_rows(path).map_err(WordflashError::into_parse)?;
    pairs_from_rows(rows).map_err(WordflashError::into_parse)
}

fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, WordflashError> {
    match TableFormat::from_path(path) {
        TableFormat::Csv => read_csv_rows(path),
        TableFormat::Workbook => {
            let mut workbook = open_workbook_auto(path)?;
            first_sheet_rows(&mut workbook)
        }
        TableFormat::Xlsx => {
            let mut workbook: Xlsx<BufReader<File>> = open_workbook(path)?;
            first_sheet_rows(&mut workbook)
        }
    }
}

pub fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, WordflashError> {
    let mut reader =
        csv::ReaderBuilder::new().has_headers(false).flexible(true).from_path(path)?;

    reader
        .records()
        .map(|record| {
            let record = record?;
            Ok(record.iter().map(|field| field.to_string()).collect())
        })
        .collect()
}

fn first_sheet_rows<RS, R>(workbook: &mut R) -> Result<Vec<Vec<String>>, WordflashError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| WordflashError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| WordflashError::Spreadsheet(e.to_string()))?;

    Ok(sheet_rows(&range))
}

/// A calamine range begins at the first used cell, so a sheet with an empty
/// column A starts at column B. Rows are padded back out to column A to keep
/// positions absolute.
fn sheet_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let first_column = range.start().map_or(0, |(_, column)| column as usize);

    range
        .rows()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(first_column)
                .chain(row.iter().map(cell_text))
                .collect()
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Projects raw rows onto word pairs. Blank rows and rows without a word are
/// dropped; a table narrower than three columns cannot be read.
pub fn pairs_from_rows(rows: Vec<Vec<String>>) -> Result<Vec<WordPair>, WordflashError> {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    if rows.is_empty() {
        return Err(WordflashError::Parse("no columns to parse from file".to_string()));
    }

    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    if width <= MEANING_COLUMN {
        return Err(WordflashError::Parse(format!(
            "expected at least {} columns, found {}",
            MEANING_COLUMN + 1,
            width
        )));
    }

    let pairs = rows
        .into_iter()
        .filter_map(|row| {
            let word = row.get(WORD_COLUMN).map(|w| w.as_str()).unwrap_or("");
            if word.trim().is_empty() {
                log::debug!("[Parser] Skipping row without a word: {:?}", row);
                return None;
            }

            let meaning = row
                .get(MEANING_COLUMN)
                .filter(|m| !m.trim().is_empty())
                .cloned()
                .unwrap_or_default();

            Some(WordPair::new(word, meaning))
        })
        .collect();

    Ok(pairs)
}
