// src/export/mod.rs
//! Trace export
//!
//! Serializes an ordered slice of [`SampleRecord`]s either as a pretty-printed
//! JSON array of records (two-space indent) or as CSV with a header row. Field
//! order and array order are preserved.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::constants::export;
use crate::error::{ImdError, ImdResult, IntoImdError};
use crate::imd::types::SampleRecord;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed array of record objects
    Json,
    /// Header row followed by one row per record
    Csv,
}

impl ExportFormat {
    /// Infer the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

/// Write records as a JSON array of objects
pub fn write_json<W: Write>(records: &[SampleRecord], writer: W) -> ImdResult<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(export::JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    records.serialize(&mut serializer)?;
    Ok(())
}

/// Write records as CSV with a `timestamp,mhs_voltage,okhs_voltage` header
pub fn write_csv<W: Write>(records: &[SampleRecord], writer: W) -> ImdResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to `path`, creating parent directories as needed
pub fn export_to_path(records: &[SampleRecord], path: &Path, format: ExportFormat) -> ImdResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).export_err(path)?;
    }

    let file = File::create(path).export_err(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => write_json(records, &mut writer)?,
        ExportFormat::Csv => write_csv(records, &mut writer)?,
    }

    writer.flush().export_err(path)?;
    tracing::info!(path = %path.display(), records = records.len(), ?format, "exported IMD trace");
    Ok(())
}

/// Read a JSON trace back (used by tooling and tests)
pub fn read_json(path: &Path) -> ImdResult<Vec<SampleRecord>> {
    let content = fs::read_to_string(path).map_err(ImdError::Io)?;
    Ok(serde_json::from_str(&content)?)
}
