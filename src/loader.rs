//! Dataset file discovery and loading.
//!
//! Import plugins hand datasets over as JSON documents. An input path is
//! either one such document or a directory tree containing several.

use crate::constants::DATASET_FILE_EXTENSION;
use crate::error::{Error, Result};
use crate::models::Dataset;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Load one dataset document
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let dataset: Dataset = serde_json::from_reader(reader)?;

    debug!(
        "Loaded {}: {} logged data block(s), {} product(s)",
        path.display(),
        dataset.logged_data.len(),
        dataset.catalog.products.len()
    );
    Ok(dataset)
}

/// Expand an input path into dataset files, sorted for stable output
///
/// Files are returned as given; directories are searched recursively for
/// `.json` documents.
pub fn discover_datasets(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(Error::DatasetNotFound {
            path: input.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_file() && is_dataset_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!(
        "Found {} dataset file(s) under {}",
        files.len(),
        input.display()
    );
    Ok(files)
}

fn is_dataset_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DATASET_FILE_EXTENSION))
}
