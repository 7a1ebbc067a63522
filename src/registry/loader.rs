//! Reading registry documents from JSON

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::registry::error::LoadError;
use crate::registry::types::RegistryDocument;

/// Parse a registry document from a JSON string
pub fn from_json_str(json: &str) -> Result<RegistryDocument, LoadError> {
    let document: RegistryDocument = serde_json::from_str(json).inspect_err(|e| {
        warn!("Failed to parse registry document: {}", e);
    })?;
    log_loaded(&document);
    Ok(document)
}

/// Parse a registry document from any reader
pub fn from_reader<R: Read>(reader: R) -> Result<RegistryDocument, LoadError> {
    let document: RegistryDocument =
        serde_json::from_reader(BufReader::new(reader)).inspect_err(|e| {
            warn!("Failed to parse registry document: {}", e);
        })?;
    log_loaded(&document);
    Ok(document)
}

/// Read and parse a registry document from disk
pub fn from_path(path: &Path) -> Result<RegistryDocument, LoadError> {
    debug!("Reading registry document from {:?}", path);

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_reader(file)
}

fn log_loaded(document: &RegistryDocument) {
    info!(
        "Loaded registry with {} packages (generated {})",
        document.packages.len(),
        if document.generated.is_empty() {
            "unknown"
        } else {
            document.generated.as_str()
        }
    );
}
