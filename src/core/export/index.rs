//! Export index writer
//!
//! The index is a CSV table with one row per exported object:
//!
//! ```text
//! umdm,umam,location,title,handle
//! test:1,,test_1,Line1 Line2,hdl:1
//! test:1,test:1a,test_1/test_1a,,
//! ```
//!
//! Every row is flushed as soon as it is written, so after a failed run the
//! file lists exactly the rows emitted before the failure.

use crate::domain::{MigrationError, ObjectLayout, Result, UmamRecord, UmdmRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row of the index
pub const INDEX_HEADER: [&str; 5] = ["umdm", "umam", "location", "title", "handle"];

/// Sink for index rows
pub trait ExportWriter: Send {
    /// Append the row for a UMDM
    fn record_parent(&mut self, umdm: &UmdmRecord, layout: &ObjectLayout) -> Result<()>;

    /// Append the row for a UMAM of `umdm`
    fn record_child(
        &mut self,
        umdm: &UmdmRecord,
        umam: &UmamRecord,
        layout: &ObjectLayout,
    ) -> Result<()>;

    /// Flush and finish the index
    fn close(&mut self) -> Result<()>;

    /// Rows written so far, header excluded
    fn rows_written(&self) -> usize;
}

/// CSV implementation of [`ExportWriter`]
pub struct CsvExportWriter<W: Write> {
    writer: csv::Writer<W>,
    path: PathBuf,
    rows: usize,
}

impl CsvExportWriter<File> {
    /// Create (or truncate) an index file and write the header
    ///
    /// # Errors
    ///
    /// Returns an `Output` error if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| MigrationError::output(path, e))?;
        Self::with_path(file, path.to_path_buf())
    }
}

impl<W: Write> CsvExportWriter<W> {
    /// Write the index to an arbitrary writer
    pub fn from_writer(inner: W) -> Result<Self> {
        Self::with_path(inner, PathBuf::from("<index>"))
    }

    fn with_path(inner: W, path: PathBuf) -> Result<Self> {
        let mut writer = Self {
            writer: csv::Writer::from_writer(inner),
            path,
            rows: 0,
        };
        writer.write_row(&INDEX_HEADER)?;
        Ok(writer)
    }

    /// Finish writing and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        let path = self.path.clone();
        self.writer
            .into_inner()
            .map_err(|e| MigrationError::output(path, e.error()))
    }

    fn write_row(&mut self, fields: &[&str; 5]) -> Result<()> {
        self.writer
            .write_record(fields)
            .map_err(|e| MigrationError::output(&self.path, e))?;
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| MigrationError::output(&self.path, e))
    }
}

impl<W: Write + Send> ExportWriter for CsvExportWriter<W> {
    fn record_parent(&mut self, umdm: &UmdmRecord, layout: &ObjectLayout) -> Result<()> {
        let title = single_line(&umdm.title);
        self.write_row(&[
            umdm.pid.as_str(),
            "",
            layout.location(),
            &title,
            &umdm.handle,
        ])?;
        self.rows += 1;
        Ok(())
    }

    fn record_child(
        &mut self,
        umdm: &UmdmRecord,
        umam: &UmamRecord,
        layout: &ObjectLayout,
    ) -> Result<()> {
        self.write_row(&[
            umdm.pid.as_str(),
            umam.pid.as_str(),
            layout.location(),
            "",
            "",
        ])?;
        self.rows += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.flush()?;
        tracing::debug!(path = %self.path.display(), rows = self.rows, "Closed export index");
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows
    }
}

/// Collapses every line break into one space
pub fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}
