//! Output format detection and the facts pinned by the first loaded spec.

use crate::loader::SourceSpec;
use std::fmt;

/// Textual representation of the merged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Every format an output file may have been written in.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Yaml];

    /// JSON for names ending in `.json` (any case), YAML for everything else.
    pub fn detect(file_name: &str) -> Self {
        if file_name.to_lowercase().ends_with(".json") {
            OutputFormat::Json
        } else {
            OutputFormat::Yaml
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Version and output format for one run.
///
/// Both come from the first spec that loaded successfully; later specs never change
/// them, even when they declare a different version or use the other format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFacts {
    pub version: Option<String>,
    pub format: OutputFormat,
}

impl ResolvedFacts {
    /// Resolves the facts from specs in load order.
    ///
    /// With no loaded spec the version stays unset and the output falls back to YAML.
    pub fn from_loaded(specs: &[SourceSpec]) -> Self {
        match specs.first() {
            Some(first) => Self {
                version: Some(first.version.clone()),
                format: OutputFormat::detect(&first.relative_path),
            },
            None => Self {
                version: None,
                format: OutputFormat::Yaml,
            },
        }
    }
}
