// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dataset::Dataset;
use crate::utils::error::StorageError;

pub struct StorageManager {
    output_path: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager writing to the given output path,
    /// creating parent directories as needed.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Result<Self, StorageError> {
        let output_path = output_path.as_ref().to_path_buf();

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self { output_path })
    }

    /// Serializes the dataset and writes it to the output path.
    ///
    /// The JSON is written to a temporary sibling first and renamed into
    /// place, so a failure mid-write never leaves a truncated dataset behind.
    pub fn save_dataset(&self, dataset: &Dataset) -> Result<PathBuf, StorageError> {
        let json = render_json(dataset)?;

        let tmp_path = self.output_path.with_extension("json.tmp");
        fs::write(&tmp_path, json.as_bytes()).map_err(StorageError::IoError)?;
        fs::rename(&tmp_path, &self.output_path).map_err(StorageError::IoError)?;

        tracing::info!("Saved dataset to {}", self.output_path.display());

        Ok(self.output_path.clone())
    }
}

/// Renders the dataset as pretty-printed JSON with 4-space indentation,
/// matching the published dataset files.
pub fn render_json(dataset: &Dataset) -> Result<String, StorageError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    dataset
        .serialize(&mut serializer)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    String::from_utf8(buf).map_err(|e| StorageError::SerializationError(e.to_string()))
}
