//! Serialization of the merged document and management of the output file.
//!
//! The merged spec is written next to its inputs as `<root>/<name>.json` or
//! `<root>/<name>.yaml`. Outputs of previous runs are removed first, in both formats.

use crate::composite::CompositeDocument;
use crate::error::{MergeError, Result};
use crate::format::OutputFormat;
use crate::logger::MergeLogger;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Serializes the merged document to YAML.
///
/// # Errors
///
/// Returns [`MergeError::Serialization`] if serde_yaml rejects the document.
pub fn serialize_yaml(doc: &CompositeDocument) -> Result<String> {
    debug!("Serializing merged document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes the merged document to pretty-printed JSON.
///
/// # Errors
///
/// Returns [`MergeError::Serialization`] if serde_json rejects the document.
pub fn serialize_json(doc: &CompositeDocument) -> Result<String> {
    debug!("Serializing merged document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Serializes the merged document in `format`.
///
/// # Arguments
///
/// * `doc` - The merged document
/// * `format` - Output format resolved from the first loaded spec
///
/// # Returns
///
/// Returns the serialized document, ready to be written with [`write_to_file`].
///
/// # Example
///
/// ```
/// use openapi_merge::composite::CompositeDocument;
/// use openapi_merge::format::OutputFormat;
/// use openapi_merge::serializer::serialize;
///
/// let doc = CompositeDocument::with_header(Some("3.0.0".to_string()));
/// let yaml = serialize(&doc, OutputFormat::Yaml).unwrap();
/// assert!(yaml.contains("openapi: 3.0.0"));
/// ```
pub fn serialize(doc: &CompositeDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serialize_json(doc),
        OutputFormat::Yaml => serialize_yaml(doc),
    }
}

/// Location of the merged spec for `format`: `<root>/<merge_file_name>.<ext>`.
///
/// # Arguments
///
/// * `root` - The spec root directory
/// * `merge_file_name` - Base name of the merged file, without extension
/// * `format` - Decides the extension, `json` or `yaml`
pub fn output_path(root: &Path, merge_file_name: &str, format: OutputFormat) -> PathBuf {
    root.join(format!("{}.{}", merge_file_name, format.extension()))
}

/// Writes string content to a file, replacing whatever was there.
///
/// # Arguments
///
/// * `content` - The serialized merged document
/// * `path` - Destination, usually from [`output_path`]
///
/// # Errors
///
/// Returns [`MergeError::Write`] if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    fs::write(path, content).map_err(|source| MergeError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Removes merged outputs left by a previous run, in every format.
///
/// Best effort: a missing file is expected and ignored, any other failure is logged as a
/// warning and otherwise ignored.
///
/// # Arguments
///
/// * `root` - The spec root directory the outputs live in
/// * `merge_file_name` - Base name of the merged file, without extension
/// * `logger` - Receives one message per removed file or failed removal
///
/// # Returns
///
/// Returns the files that were actually removed.
///
/// # Example
///
/// ```no_run
/// use openapi_merge::logger::LogFacade;
/// use openapi_merge::serializer::remove_stale_outputs;
/// use std::path::Path;
///
/// let removed = remove_stale_outputs(Path::new("./specs"), "_merged_spec", &LogFacade);
/// println!("Removed {} stale file(s)", removed.len());
/// ```
pub fn remove_stale_outputs(
    root: &Path,
    merge_file_name: &str,
    logger: &dyn MergeLogger,
) -> Vec<PathBuf> {
    let mut removed = Vec::new();

    for format in OutputFormat::ALL {
        let path = output_path(root, merge_file_name, format);
        match fs::remove_file(&path) {
            Ok(()) => {
                logger.info(&format!(
                    "Removed merged spec from previous run: {}",
                    path.display()
                ));
                removed.push(path);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => logger.warn(&format!(
                "Failed to remove merged spec from previous run {}: {}",
                path.display(),
                e
            )),
        }
    }

    removed
}
