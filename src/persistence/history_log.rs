use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::observability::metrics::HISTORY_ROWS_APPENDED;
use crate::persistence::record::{HistoricalRecord, HistoricalRow};
use crate::persistence::schema::HistorySchema;

/// History Log - Append-only CSV file of reconciled snapshots
///
/// ## Format
/// - **Encoding**: UTF-8, comma-delimited, standard CSV quoting (`csv` crate)
/// - **Header**: written once, when the file is created or found empty
/// - **Rows**: one per persisted snapshot, in append order
///
/// ## Guarantees
/// - **Append-only**: existing rows are never rewritten or reordered; an
///   unterminated last line (torn write) is closed before the next row
/// - **Durability**: every append is flushed and `fsync`ed before returning
/// - **Layout check**: appending under a header that differs from the
///   configured schema fails with `Error::HistorySchemaMismatch`
/// - **Concurrent Access**: single writer only; no file locking
///
/// ## Reading
/// `last_record()` and `records()` are tolerant of older layouts: rows are
/// keyed by the header actually present in the file, and short rows simply
/// lack the trailing columns.
pub struct HistoryLog {
    path: PathBuf,
    schema: HistorySchema,
}

impl HistoryLog {
    pub fn new(path: impl AsRef<Path>, schema: HistorySchema) -> Self {
        HistoryLog {
            path: path.as_ref().to_path_buf(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &HistorySchema {
        &self.schema
    }

    /// Append one record, creating the file (and parent directories) with a
    /// header row on first use.
    pub fn append(&self, record: &HistoricalRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let expected = self.schema.header();
        let existing = self.existing_header()?;

        if let Some(found) = &existing {
            if *found != expected {
                return Err(Error::HistorySchemaMismatch {
                    expected: expected.join(","),
                    found: found.join(","),
                });
            }
        }

        let unterminated = self.ends_unterminated()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if unterminated {
            tracing::warn!("History log {:?} does not end in a newline; closing last line", self.path);
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if existing.is_none() {
            writer.write_record(&expected)?;
            tracing::info!("Created history log {:?}", self.path);
        }

        writer.write_record(record.to_fields())?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| Error::IoError(e.into_error()))?;
        file.sync_data()?;

        HISTORY_ROWS_APPENDED.inc();
        tracing::info!("Appended record {} to {:?}", record.timestamp, self.path);
        Ok(())
    }

    /// Most recent row, or `None` if the file is missing or has no data rows.
    pub fn last_record(&self) -> Result<Option<HistoricalRow>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(None);
        };

        let headers = reader.headers()?.clone();
        let mut last = None;
        for row in reader.records() {
            last = Some(row?);
        }

        Ok(last.map(|row| Self::to_row(&headers, &row)))
    }

    /// Every row in append order.
    pub fn records(&self) -> Result<Vec<HistoricalRow>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(Vec::new());
        };

        let headers = reader.headers()?.clone();
        reader.records()
            .map(|row| -> Result<HistoricalRow> { Ok(Self::to_row(&headers, &row?)) })
            .collect()
    }

    fn open_reader(&self) -> Result<Option<csv::Reader<File>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        Ok(Some(reader))
    }

    /// Header currently on disk, `None` when the file is missing or empty.
    fn existing_header(&self) -> Result<Option<Vec<String>>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(None);
        };

        let headers = reader.headers()?;
        if headers.is_empty() {
            return Ok(None);
        }

        Ok(Some(headers.iter().map(str::to_string).collect()))
    }

    /// True when the file is non-empty and its last byte is not `\n`.
    fn ends_unterminated(&self) -> Result<bool> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        if file.metadata()?.len() == 0 {
            return Ok(false);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn to_row(headers: &csv::StringRecord, row: &csv::StringRecord) -> HistoricalRow {
        HistoricalRow::from_pairs(headers.iter().zip(row.iter()))
    }
}
