use crate::error::{MergeError, Result};
use crate::format::ResolvedFacts;
use crate::loader::{SourceSpec, SpecLoader};
use crate::logger::{LogFacade, MergeLogger};
use crate::merge_engine::{CollisionPolicy, MergeEngine};
use crate::scanner::SpecScanner;
use crate::serializer::{output_path, remove_stale_outputs, serialize, write_to_file};
use std::path::PathBuf;

/// Base name of the merged file when none is configured
pub const DEFAULT_MERGE_FILE_NAME: &str = "_merged_spec";

/// Merges every OpenAPI document under a root directory into one spec.
///
/// The merged spec is written to `<root>/<merge_file_name>.json` or `.yaml`, depending on
/// the extension of the first file that loads successfully. Files that fail to load are
/// logged and left out.
///
/// # Example
///
/// ```no_run
/// use openapi_merge::merger::MergedSpecBuilder;
///
/// let written = MergedSpecBuilder::new("./specs", "_merged_spec")
///     .build_merged_spec()
///     .unwrap();
/// println!("Merged spec written to {}", written.display());
/// ```
pub struct MergedSpecBuilder {
    root: PathBuf,
    merge_file_name: String,
    policy: CollisionPolicy,
    logger: Box<dyn MergeLogger>,
}

impl MergedSpecBuilder {
    pub fn new(root: impl Into<PathBuf>, merge_file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            merge_file_name: merge_file_name.into(),
            policy: CollisionPolicy::default(),
            logger: Box::new(LogFacade),
        }
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: impl MergeLogger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    /// Runs the whole pipeline and returns the path of the merged spec.
    ///
    /// # Errors
    ///
    /// - [`MergeError::NoSpecifications`] if the root directory contains no files
    /// - [`MergeError::Discovery`] if the root directory cannot be listed
    /// - [`MergeError::Collision`] under [`CollisionPolicy::Strict`]
    /// - [`MergeError::Serialization`] or [`MergeError::Write`] if the output cannot be produced
    ///
    /// Stale outputs are removed before anything else, so they are gone even when the
    /// run fails afterwards.
    pub fn build_merged_spec(&self) -> Result<PathBuf> {
        let logger = self.logger.as_ref();

        remove_stale_outputs(&self.root, &self.merge_file_name, logger);

        let scan_result = SpecScanner::new(self.root.clone()).scan()?;
        if scan_result.spec_files.is_empty() {
            return Err(MergeError::NoSpecifications {
                root: self.root.clone(),
            });
        }
        logger.info(&format!(
            "In spec root directory {} found specs {:?}",
            self.root.display(),
            scan_result.spec_files
        ));

        let loaded = self.load_all(&scan_result.spec_files);
        if loaded.is_empty() {
            logger.error(&format!(
                "None of the {} files in {} could be read as a spec, the merged spec has no paths",
                scan_result.spec_files.len(),
                self.root.display()
            ));
        }
        let facts = ResolvedFacts::from_loaded(&loaded);

        let mut engine = MergeEngine::new(self.policy, logger);
        for spec in loaded {
            engine.add_spec(spec)?;
        }
        let document = engine.build(facts.version);

        let content = serialize(&document, facts.format)?;
        let merged_path = output_path(&self.root, &self.merge_file_name, facts.format);
        write_to_file(&content, &merged_path)?;

        logger.info(&format!(
            "Merged {} paths into {}",
            document.paths.len(),
            merged_path.display()
        ));

        Ok(merged_path)
    }

    /// Loads every file, keeping only the ones that parse.
    fn load_all(&self, spec_files: &[String]) -> Vec<SourceSpec> {
        let loader = SpecLoader::new(self.root.clone());

        let loaded: Vec<SourceSpec> = spec_files
            .iter()
            .filter_map(|relative_path| {
                self.logger.info(&format!(
                    "Reading spec: {}",
                    self.root.join(relative_path).display()
                ));
                match loader.load(relative_path) {
                    Ok(spec) => Some(spec),
                    Err(e) => {
                        self.logger
                            .error(&format!("{}. It will be ignored", e));
                        None
                    }
                }
            })
            .collect();

        self.logger.debug(&format!(
            "Loading complete: {} succeeded, {} failed",
            loaded.len(),
            spec_files.len() - loaded.len()
        ));

        loaded
    }
}
