//! CSV parser for tag dataset files

use crate::error::{Error, Result};
use crate::table::{TagRow, TagTable};
use std::fs;
use std::path::Path;

/// Parse a tag CSV file into a TagTable
pub fn parse_tag_file<P: AsRef<Path>>(path: P) -> Result<TagTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table = parse_tag_content(&content, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        regex_rows = table.regex_rows.len(),
        "loaded tag file"
    );
    Ok(table)
}

/// Parse tag CSV from a string (useful for testing)
pub fn parse_tag_str(content: &str, source_name: &str) -> Result<TagTable> {
    parse_tag_content(content, Path::new(source_name))
}

fn parse_tag_content(content: &str, path: &Path) -> Result<TagTable> {
    let csv_error = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    // Header is read as a plain record so it round-trips verbatim, and
    // field counts are checked per row instead of by the csv crate.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    // The csv crate skips empty lines; they count as zero-field rows here.
    let blank_line = first_blank_line(content);
    let blank_row_error = |line: u64| Error::MalformedRow {
        path: path.to_path_buf(),
        line,
        found: 0,
    };

    let mut record = csv::StringRecord::new();

    if !csv_reader.read_record(&mut record).map_err(csv_error)? {
        return Err(Error::MissingHeader {
            path: path.to_path_buf(),
        });
    }
    let mut table = TagTable::new(record.iter().map(str::to_string).collect());

    while csv_reader.read_record(&mut record).map_err(csv_error)? {
        if let Some(line) = blank_line.filter(|&line| line < csv_reader.position().line()) {
            return Err(blank_row_error(line));
        }

        if record.len() != 3 {
            return Err(Error::MalformedRow {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
            });
        }

        table.insert(TagRow::new(&record[0], &record[1], &record[2]));
    }

    match blank_line {
        Some(line) => Err(blank_row_error(line)),
        None => Ok(table),
    }
}

/// Line number of the first empty line after the header, ignoring line
/// breaks inside quoted fields.
fn first_blank_line(content: &str) -> Option<u64> {
    let bytes = content.as_bytes();
    let mut line = 1u64;
    let mut in_quotes = false;
    let mut at_line_start = true;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' => {
                if at_line_start && !in_quotes && line > 1 {
                    return Some(line);
                }
                line += 1;
                at_line_start = true;
                continue;
            }
            b'\r' if at_line_start && bytes.get(i + 1) == Some(&b'\n') => continue,
            _ => {}
        }
        at_line_start = false;
    }

    None
}
