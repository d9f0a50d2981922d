//! Newline-delimited JSON manifest reader
//!
//! Yields one [`UmdmRecord`] per non-blank line, reading lazily so memory use
//! does not grow with the manifest. The reader is single-pass.

use crate::domain::{MigrationError, Result, UmdmRecord};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Forward-only reader over manifest records
pub struct ManifestReader<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl ManifestReader<BufReader<File>> {
    /// Open a manifest file
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the file cannot be opened.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await.map_err(|e| {
            MigrationError::Configuration(format!(
                "Failed to open manifest {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> ManifestReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next record, or `None` once the manifest is exhausted
    ///
    /// # Errors
    ///
    /// Returns `ManifestParse` with the 1-based line number if a line is not a
    /// valid record.
    pub async fn next_record(&mut self) -> Result<Option<UmdmRecord>> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).await.map_err(|e| {
                MigrationError::ManifestParse {
                    line: self.line_number + 1,
                    message: e.to_string(),
                }
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|e| MigrationError::ManifestParse {
                    line: self.line_number,
                    message: e.to_string(),
                });
        }
    }
}
