use crate::composite::{Components, CompositeDocument, Reference, SecuritySchemeSummary};
use crate::error::{CollisionKind, MergeError, Result};
use crate::loader::{SourceSecurityScheme, SourceSpec};
use crate::logger::MergeLogger;
use std::collections::BTreeMap;

/// What happens when two specs declare the same path key or security scheme name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The spec merged later silently replaces the earlier entry
    #[default]
    LastWriterWins,
    /// The merge fails with [`MergeError::Collision`]
    Strict,
}

/// An entry together with the spec that declared it.
struct Declared<T> {
    source: String,
    value: T,
}

/// Folds loaded specs into one composite document.
///
/// Each path key becomes a `$ref` pointer to the spec that declared it. Security schemes
/// are collected by name and reduced to `{type, scheme}` when the document is built.
pub struct MergeEngine<'a> {
    policy: CollisionPolicy,
    logger: &'a dyn MergeLogger,
    paths: BTreeMap<String, Declared<Reference>>,
    security_schemes: BTreeMap<String, Declared<SourceSecurityScheme>>,
}

impl<'a> MergeEngine<'a> {
    pub fn new(policy: CollisionPolicy, logger: &'a dyn MergeLogger) -> Self {
        Self {
            policy,
            logger,
            paths: BTreeMap::new(),
            security_schemes: BTreeMap::new(),
        }
    }

    /// Adds every path and security scheme of `spec`.
    ///
    /// # Errors
    ///
    /// Under [`CollisionPolicy::Strict`], returns [`MergeError::Collision`] if an entry
    /// was already declared by another spec. Nothing from `spec` is added in that case.
    pub fn add_spec(&mut self, spec: SourceSpec) -> Result<()> {
        if self.policy == CollisionPolicy::Strict {
            self.check_collisions(&spec)?;
        }

        for path_key in &spec.paths {
            let reference = Reference::to_path(&spec.relative_path, path_key);
            let replaced = self.paths.insert(
                path_key.clone(),
                Declared {
                    source: spec.relative_path.clone(),
                    value: reference,
                },
            );
            if let Some(previous) = replaced {
                self.logger.debug(&format!(
                    "Path {} from {} replaces the one from {}",
                    path_key, spec.relative_path, previous.source
                ));
            }
        }

        for (name, scheme) in spec.security_schemes.into_iter().flatten() {
            let replaced = self.security_schemes.insert(
                name.clone(),
                Declared {
                    source: spec.relative_path.clone(),
                    value: scheme,
                },
            );
            if let Some(previous) = replaced {
                self.logger.debug(&format!(
                    "Security scheme {} from {} replaces the one from {}",
                    name, spec.relative_path, previous.source
                ));
            }
        }

        Ok(())
    }

    fn check_collisions(&self, spec: &SourceSpec) -> Result<()> {
        for path_key in &spec.paths {
            if let Some(previous) = self.paths.get(path_key) {
                if previous.source != spec.relative_path {
                    return Err(MergeError::Collision {
                        kind: CollisionKind::Path,
                        key: path_key.clone(),
                        previous: previous.source.clone(),
                        current: spec.relative_path.clone(),
                    });
                }
            }
        }

        for name in spec.security_schemes.iter().flat_map(|schemes| schemes.keys()) {
            if let Some(previous) = self.security_schemes.get(name) {
                if previous.source != spec.relative_path {
                    return Err(MergeError::Collision {
                        kind: CollisionKind::SecurityScheme,
                        key: name.clone(),
                        previous: previous.source.clone(),
                        current: spec.relative_path.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Builds the composite document under the synthesized header.
    pub fn build(self, version: Option<String>) -> CompositeDocument {
        self.logger.debug(&format!(
            "Building merged document with {} paths and {} security schemes",
            self.paths.len(),
            self.security_schemes.len()
        ));

        let mut document = CompositeDocument::with_header(version);
        document.paths = self
            .paths
            .into_iter()
            .map(|(path_key, declared)| (path_key, declared.value))
            .collect();

        if !self.security_schemes.is_empty() {
            let security_schemes = self
                .security_schemes
                .into_iter()
                .map(|(name, declared)| {
                    let summary = SecuritySchemeSummary {
                        kind: declared.value.kind,
                        scheme: declared.value.scheme,
                    };
                    (name, summary)
                })
                .collect();
            document.components = Some(Components { security_schemes });
        }

        document
    }
}
