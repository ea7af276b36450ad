//! Delimited file reader with encoding fallback.
//!
//! Every field is kept as text. Type inference is left to the caller so that
//! identifiers with leading zeros survive untouched.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use tract_common::{MapError, MapResult};

use crate::encoding::{EncodingChain, TextEncoding};

/// Options for [`read_delimited`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: u8,
    /// Treat the first row as column names
    pub has_headers: bool,
    pub encodings: EncodingChain,
}

impl ReadOptions {
    /// Pipe-delimited, headerless PL 94-171 segment files.
    pub fn pipe_delimited() -> Self {
        Self {
            delimiter: b'|',
            has_headers: false,
            encodings: EncodingChain::legacy(),
        }
    }

    /// Comma-separated with a header row.
    pub fn csv_with_headers() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            encodings: EncodingChain::unicode_first(),
        }
    }
}

/// An in-memory table of text fields.
#[derive(Debug, Clone)]
pub struct Table {
    /// Source file, kept for error messages
    pub path: PathBuf,
    /// Encoding that decoded the file
    pub encoding: TextEncoding,
    /// Column names, empty for headerless files
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> MapResult<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| MapError::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
            })
    }

    /// Field at `column` in `row`. Short rows yield `None`.
    pub fn field(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Read a delimited file, trying each encoding of the chain in order.
///
/// Fails with [`MapError::UnsupportedEncoding`] naming the file when no
/// candidate decodes every byte.
pub fn read_delimited(path: impl AsRef<Path>, options: &ReadOptions) -> MapResult<Table> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    let (text, encoding) = match options.encodings.decode(&bytes) {
        Ok(decoded) => decoded,
        Err(failures) => {
            for failure in &failures {
                debug!(path = %path.display(), error = %failure, "Decode attempt failed");
            }
            return Err(MapError::UnsupportedEncoding {
                path: path.to_path_buf(),
            });
        }
    };

    let table = parse_delimited(&text, path, encoding, options)?;

    info!(
        path = %path.display(),
        encoding = %encoding,
        rows = table.len(),
        "Read delimited file"
    );

    Ok(table)
}

fn parse_delimited(
    text: &str,
    path: &Path,
    encoding: TextEncoding,
    options: &ReadOptions,
) -> MapResult<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = if options.has_headers {
        reader.headers()?.iter().map(|h| h.to_string()).collect()
    } else {
        Vec::new()
    };

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    Ok(Table {
        path: path.to_path_buf(),
        encoding,
        headers,
        rows,
    })
}
