use crate::error::{MergeError, Result};
use crate::format::OutputFormat;
use log::debug;
use oas3::spec::SecurityScheme;
use oas3::OpenApiV3Spec;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Loader for single OpenAPI documents inside a spec root directory.
///
/// The loader reads one file, decodes it as JSON or YAML into a typed [`OpenApiV3Spec`],
/// and extracts only what the merge needs: the declared `openapi` version, the path keys
/// and the named security schemes. Security schemes written as `$ref`s are resolved
/// against the same document; references to other files are not resolved.
///
/// # Example
///
/// ```no_run
/// use openapi_merge::loader::SpecLoader;
/// use std::path::PathBuf;
///
/// let loader = SpecLoader::new(PathBuf::from("./specs"));
/// let spec = loader.load("users.yaml").unwrap();
/// println!("{} declares {} paths", spec.relative_path, spec.paths.len());
/// ```
pub struct SpecLoader {
    root: PathBuf,
}

/// A successfully loaded spec file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    /// Path relative to the spec root, also used as the `$ref` target prefix
    pub relative_path: String,
    /// Value of the document's `openapi` field
    pub version: String,
    /// Path keys declared under `paths`
    pub paths: Vec<String>,
    /// Named schemes from `components.securitySchemes`, if the document declares any
    pub security_schemes: Option<BTreeMap<String, SourceSecurityScheme>>,
}

/// The parts of a security scheme that survive the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSecurityScheme {
    pub kind: SecuritySchemeType,
    pub scheme: Option<String>,
}

/// OpenAPI security scheme kinds, serialized as their `type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    #[serde(rename = "mutualTLS")]
    MutualTls,
}

impl From<&SecurityScheme> for SourceSecurityScheme {
    fn from(scheme: &SecurityScheme) -> Self {
        match scheme {
            SecurityScheme::ApiKey { .. } => Self {
                kind: SecuritySchemeType::ApiKey,
                scheme: None,
            },
            SecurityScheme::Http { scheme, .. } => Self {
                kind: SecuritySchemeType::Http,
                scheme: Some(scheme.clone()),
            },
            SecurityScheme::OAuth2 { .. } => Self {
                kind: SecuritySchemeType::OAuth2,
                scheme: None,
            },
            SecurityScheme::OpenIdConnect { .. } => Self {
                kind: SecuritySchemeType::OpenIdConnect,
                scheme: None,
            },
            // mutualTLS is the only kind left
            #[allow(unreachable_patterns)]
            _ => Self {
                kind: SecuritySchemeType::MutualTls,
                scheme: None,
            },
        }
    }
}

impl SpecLoader {
    /// Creates a loader resolving relative paths against `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Loads and extracts one spec file.
    ///
    /// # Arguments
    ///
    /// * `relative_path` - Path of the file relative to the spec root, with `/` separators
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Parse`] if:
    /// - The file cannot be read as UTF-8 text
    /// - The content is neither valid JSON nor valid YAML
    /// - The content is not an OpenAPI 3 document, or has no `paths`
    /// - A security scheme `$ref` cannot be resolved inside the document
    pub fn load(&self, relative_path: &str) -> Result<SourceSpec> {
        let path = self.root.join(relative_path);
        debug!("Loading spec: {}", path.display());

        let content = fs::read_to_string(&path)
            .map_err(|e| MergeError::parse(&path, format!("failed to read file: {}", e)))?;

        let mut document = Self::decode(&path, relative_path, &content)?;
        normalize_version(&mut document);

        let spec: OpenApiV3Spec = serde_json::from_value(document)
            .map_err(|e| MergeError::parse(&path, format!("not an OpenAPI document: {}", e)))?;
        let source = Self::extract(&path, relative_path, &spec)?;

        debug!(
            "Loaded {}: openapi {}, {} paths",
            relative_path,
            source.version,
            source.paths.len()
        );

        Ok(source)
    }

    /// `.json` files are read as JSON first and fall back to YAML, which also covers
    /// YAML content saved under a `.json` name. Everything else is read as YAML.
    fn decode(path: &Path, relative_path: &str, content: &str) -> Result<Value> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        match OutputFormat::detect(relative_path) {
            OutputFormat::Json => serde_json::from_str(content).or_else(|json_error| {
                serde_yaml::from_str(content).map_err(|_| {
                    MergeError::parse(path, format!("invalid JSON: {}", json_error))
                })
            }),
            OutputFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| MergeError::parse(path, format!("invalid YAML: {}", e))),
        }
    }

    fn extract(path: &Path, relative_path: &str, spec: &OpenApiV3Spec) -> Result<SourceSpec> {
        let paths = spec
            .paths
            .as_ref()
            .ok_or_else(|| MergeError::parse(path, "missing `paths` mapping"))?
            .keys()
            .cloned()
            .collect();

        let mut security_schemes = BTreeMap::new();
        if let Some(components) = spec.components.as_ref() {
            for (name, entry) in &components.security_schemes {
                let scheme = entry.resolve(spec).map_err(|e| {
                    MergeError::parse(path, format!("security scheme `{}`: {}", name, e))
                })?;
                security_schemes.insert(name.clone(), SourceSecurityScheme::from(&scheme));
            }
        }

        Ok(SourceSpec {
            relative_path: relative_path.to_string(),
            version: spec.openapi.clone(),
            paths,
            security_schemes: (!security_schemes.is_empty()).then_some(security_schemes),
        })
    }
}

/// Unquoted YAML versions such as `openapi: 3.1` decode as numbers; turn them back into
/// the string the typed document expects.
fn normalize_version(document: &mut Value) {
    if let Some(Value::Number(number)) = document.get("openapi") {
        let version = number.to_string();
        document["openapi"] = Value::String(version);
    }
}
