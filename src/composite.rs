use crate::loader::SecuritySchemeType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Title and description of every merged document
pub const MERGED_TITLE: &str = "merged spec";
/// `info.version` of every merged document
pub const MERGED_INFO_VERSION: &str = "1.0.0";
/// Single placeholder server of every merged document
pub const PLACEHOLDER_SERVER_URL: &str = "http://localhost:8080";

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
}

impl Info {
    /// The fixed info block of a merged document
    pub fn merged() -> Self {
        Self {
            title: MERGED_TITLE.to_string(),
            description: MERGED_TITLE.to_string(),
            version: MERGED_INFO_VERSION.to_string(),
        }
    }
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,
}

impl Server {
    pub fn placeholder() -> Self {
        Self {
            url: PLACEHOLDER_SERVER_URL.to_string(),
        }
    }
}

/// Pointer to a path item defined in another document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    /// Reference to `path_key` inside the spec at `relative_path`
    pub fn to_path(relative_path: &str, path_key: &str) -> Self {
        Self {
            reference: reference_pointer(relative_path, path_key),
        }
    }
}

/// Security scheme reduced to its type and, for kinds that have one, its scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecuritySchemeSummary {
    #[serde(rename = "type")]
    pub kind: SecuritySchemeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

/// OpenAPI Components object, limited to security schemes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    #[serde(rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, SecuritySchemeSummary>,
}

/// The merged document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeDocument {
    /// Version declared by the first loaded spec, `null` when none loaded
    pub openapi: Option<String>,
    pub info: Info,
    pub servers: Vec<Server>,
    /// Path key -> pointer into the declaring spec
    pub paths: BTreeMap<String, Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl CompositeDocument {
    /// Synthesizes the envelope of a merged document with no paths yet.
    pub fn with_header(version: Option<String>) -> Self {
        Self {
            openapi: version,
            info: Info::merged(),
            servers: vec![Server::placeholder()],
            paths: BTreeMap::new(),
            components: None,
        }
    }
}

/// JSON-pointer escaping of a path key.
///
/// Only `/` becomes `~1`. A literal `~` is left as is rather than becoming `~0`, which keeps
/// pointers identical to the ones earlier merged documents contain.
pub fn escape_path_key(path_key: &str) -> String {
    path_key.replace('/', "~1")
}

/// `./<relative_path>#/paths/<escaped key>`
pub fn reference_pointer(relative_path: &str, path_key: &str) -> String {
    format!("./{}#/paths/{}", relative_path, escape_path_key(path_key))
}
