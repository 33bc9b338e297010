//! Status seeding from CSV.
//!
//! The file carries a header naming an `id` and a `status` column, in any
//! order and alongside any other columns:
//!
//! ```text
//! id,status
//! 3f1c...,Valid
//! 9a0e...,Invalid
//! ```
//!
//! Fields may be double-quoted. Status values are passed through unparsed;
//! the store decodes them.

use std::io::BufRead;

use thiserror::Error;

/// CSV parsing errors.
#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("CSV input is empty")]
    Empty,

    #[error("CSV header has no {column:?} column")]
    MissingColumn { column: &'static str },

    #[error("CSV line {line} has {found} fields, expected at least {expected}")]
    ShortRow {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("CSV line {line} has an unterminated quote")]
    UnterminatedQuote { line: usize },

    #[error("Failed to read CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Read `(id, status)` pairs. Blank lines are skipped.
pub fn read_status_rows<R: BufRead>(reader: R) -> Result<Vec<(String, String)>, CsvImportError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((index, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break split_fields(&line, index + 1)?;
                }
            }
            None => return Err(CsvImportError::Empty),
        }
    };
    let id_column = column(&header, "id")?;
    let status_column = column(&header, "status")?;
    let expected = id_column.max(status_column) + 1;

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line, index + 1)?;
        if fields.len() < expected {
            return Err(CsvImportError::ShortRow {
                line: index + 1,
                found: fields.len(),
                expected,
            });
        }
        rows.push((fields[id_column].clone(), fields[status_column].clone()));
    }
    Ok(rows)
}

fn column(header: &[String], name: &'static str) -> Result<usize, CsvImportError> {
    header
        .iter()
        .position(|field| field.trim().eq_ignore_ascii_case(name))
        .ok_or(CsvImportError::MissingColumn { column: name })
}

fn split_fields(line: &str, line_number: usize) -> Result<Vec<String>, CsvImportError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field).trim().to_string()),
            (c, _) => field.push(c),
        }
    }
    if quoted {
        return Err(CsvImportError::UnterminatedQuote { line: line_number });
    }
    fields.push(field.trim().to_string());
    Ok(fields)
}
