//! Export of batch results.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::ExportError;
use crate::logging::Logger;
use crate::model::BatchResult;

/// Persists a batch result.
pub trait ExportSink {
    /// Write every family table, returning the written locations.
    fn export(&self, result: &BatchResult) -> Result<Vec<PathBuf>, ExportError>;
}

/// Writes one CSV file per family: `<timestamp>_<family>_export.csv`.
pub struct CsvExportSink {
    directory: PathBuf,
    timestamp: String,
    log: Logger,
}

impl CsvExportSink {
    /// Sink stamped with the current local time.
    pub fn new(directory: impl Into<PathBuf>, log: Logger) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        Self::with_timestamp(directory, timestamp, log)
    }

    /// Sink with a fixed timestamp prefix.
    pub fn with_timestamp(
        directory: impl Into<PathBuf>,
        timestamp: impl Into<String>,
        log: Logger,
    ) -> Self {
        Self {
            directory: directory.into(),
            timestamp: timestamp.into(),
            log,
        }
    }

    /// Path of the file for a family.
    pub fn path_for(&self, family: &str) -> PathBuf {
        let family: String = family
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.directory
            .join(format!("{}_{}_export.csv", self.timestamp, family))
    }

    fn write_file(path: &Path, records: Vec<Vec<String>>) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.write_record(&record)?;
        }
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ExportSink for CsvExportSink {
    fn export(&self, result: &BatchResult) -> Result<Vec<PathBuf>, ExportError> {
        log::info!(logger: self.log, "attempting data export: {} data set(s)", result.len());

        let mut claimed: HashMap<PathBuf, &str> = HashMap::with_capacity(result.len());
        let mut targets = Vec::with_capacity(result.len());
        for (family, table) in result {
            let path = self.path_for(family);
            if let Some(first) = claimed.insert(path.clone(), family) {
                return Err(ExportError::NameCollision {
                    first: first.to_string(),
                    second: family.clone(),
                    path,
                });
            }
            targets.push((path, table));
        }

        fs::create_dir_all(&self.directory).map_err(|source| ExportError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(targets.len());
        for (path, table) in targets {
            Self::write_file(&path, table.records())?;
            log::info!(logger: self.log, "> file saved: {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
