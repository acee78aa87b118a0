//! CSV export.
//!
//! Columns are an ordered list of `(header, accessor)` pairs, so the same
//! writer serves any row type. Fields containing a comma, a double quote or a
//! line break are quoted with embedded quotes doubled.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::model::Equipment;
use crate::util::time::format_timestamp;

type Accessor<T> = Box<dyn Fn(&T) -> String>;

/// Writes rows of `T` as CSV.
pub struct CsvExporter<T> {
    columns: Vec<(String, Accessor<T>)>,
}

impl<T> Default for CsvExporter<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<T> CsvExporter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    #[must_use]
    pub fn column(mut self, header: impl Into<String>, accessor: impl Fn(&T) -> String + 'static) -> Self {
        self.columns.push((header.into(), Box::new(accessor)));
        self
    }

    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|(h, _)| h.as_str()).collect()
    }

    /// Write the header record and one record per row. Records end with `\n`.
    ///
    /// # Errors
    ///
    /// Returns `Csv` if the writer fails.
    pub fn write<W: Write>(&self, rows: &[T], out: W) -> Result<usize> {
        let mut writer = ::csv::WriterBuilder::new()
            .quote_style(::csv::QuoteStyle::Necessary)
            .from_writer(out);
        writer.write_record(self.headers())?;

        for row in rows {
            writer.write_record(self.columns.iter().map(|(_, accessor)| accessor(row)))?;
        }
        writer.flush()?;
        Ok(rows.len())
    }

    /// Write to `path` through a hidden `.partial` sibling that is renamed into
    /// place once complete. On failure the destination is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Csv` if staging, writing or the rename fails.
    pub fn write_file(&self, rows: &[T], path: &Path) -> Result<usize> {
        let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            )
        })?;
        let staging = path.with_file_name(format!(".{file_name}.partial"));

        let written = self.write_staged(rows, &staging).and_then(|count| {
            fs::rename(&staging, path)?;
            Ok(count)
        });
        if written.is_err() {
            let _ = fs::remove_file(&staging);
        }
        written
    }

    fn write_staged(&self, rows: &[T], staging: &Path) -> Result<usize> {
        let mut out = BufWriter::new(File::create(staging)?);
        let count = self.write(rows, &mut out)?;
        out.into_inner().map_err(io::IntoInnerError::into_error)?.sync_all()?;
        Ok(count)
    }

    /// Render to an in-memory string.
    ///
    /// # Errors
    ///
    /// Returns `Csv` only if a record cannot be written.
    pub fn render(&self, rows: &[T]) -> Result<String> {
        let mut buf = Vec::new();
        self.write(rows, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Name, Quantity, Category, MinStockLevel, LastUpdated.
#[must_use]
pub fn equipment_columns() -> CsvExporter<Equipment> {
    CsvExporter::new()
        .column("Name", |e: &Equipment| e.name.clone())
        .column("Quantity", |e: &Equipment| e.quantity.to_string())
        .column("Category", |e: &Equipment| {
            e.category.clone().unwrap_or_default()
        })
        .column("MinStockLevel", |e: &Equipment| {
            e.min_stock_level.to_string()
        })
        .column("LastUpdated", |e: &Equipment| format_timestamp(e.last_updated))
}

/// `equipment_export_YYYYMMDD_HHMMSS.csv` for the given instant.
#[must_use]
pub fn default_export_file_name(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("equipment_export_{}.csv", crate::util::time::file_stamp(now))
}
