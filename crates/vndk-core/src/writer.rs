//! CSV writer for the updated tag dataset

use crate::error::{Error, Result};
use crate::table::TagTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the table to `path`, creating or truncating the file
pub fn write_tag_file<P: AsRef<Path>>(table: &TagTable, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let written = write_tag_table(table, BufWriter::new(file), path)?;

    tracing::debug!(path = %path.display(), rows = written, "wrote tag file");
    Ok(written)
}

/// Write header and rows sorted by `(path, tag, comment)`.
///
/// Regex rows are reattached before sorting. Lines end with `\n` only.
/// `path` names the destination in errors. Returns the number of data rows
/// written.
pub fn write_tag_table<W: Write>(table: &TagTable, writer: W, path: &Path) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let to_error = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    csv_writer.write_record(&table.header).map_err(to_error)?;

    let rows = table.sorted_rows();
    for row in &rows {
        csv_writer
            .write_record([&row.path, &row.tag, &row.comment])
            .map_err(to_error)?;
    }

    csv_writer.flush().map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(rows.len())
}

/// Render the table to a string (useful for testing)
pub fn write_tag_string(table: &TagTable) -> Result<String> {
    let mut buf = Vec::new();
    write_tag_table(table, &mut buf, Path::new("<string>"))?;
    String::from_utf8(buf).map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
