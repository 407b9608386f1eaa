use openapi_merge::{
    error::{CollisionKind, MergeError},
    logger::{MergeLogger, NoopLogger},
    merge_engine::CollisionPolicy,
    merger::MergedSpecBuilder,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

const USERS_YAML: &str = include_str!("fixtures/users.yaml");
const ORDERS_JSON: &str = include_str!("fixtures/orders.json");
const OAUTH_YML: &str = include_str!("fixtures/oauth.yml");
const LEGACY_YAML: &str = include_str!("fixtures/legacy.yaml");
const NOTES_TXT: &str = include_str!("fixtures/notes.txt");

/// Helper function to create a temporary spec directory
fn create_spec_dir(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn merge(root: &Path) -> openapi_merge::Result<std::path::PathBuf> {
    MergedSpecBuilder::new(root, "merged")
        .with_logger(NoopLogger)
        .build_merged_spec()
}

fn read_merged(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Failed to read merged spec");
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content).expect("Merged spec is not valid JSON")
    } else {
        serde_yaml::from_str(&content).expect("Merged spec is not valid YAML")
    }
}

/// Shares what it records with the test after the builder takes ownership
#[derive(Clone, Default)]
struct RecordingLogger {
    infos: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl MergeLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warn(&self, _message: &str) {}

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

#[test]
fn test_empty_directory_fails_without_writing() {
    let temp_dir = create_spec_dir(vec![]);

    let result = merge(temp_dir.path());

    assert!(matches!(result, Err(MergeError::NoSpecifications { .. })));
    assert!(!temp_dir.path().join("merged.yaml").exists());
    assert!(!temp_dir.path().join("merged.json").exists());
}

#[test]
fn test_disjoint_specs_are_merged_into_refs() {
    let temp_dir = create_spec_dir(vec![
        ("spec1.yaml", "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths:\n  /a/b: {}\n  /c: {}\n"),
        ("spec2.yaml", "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths:\n  /d/{id}: {}\n"),
    ]);

    let written = merge(temp_dir.path()).unwrap();
    let merged = read_merged(&written);

    assert_eq!(written, temp_dir.path().join("merged.yaml"));
    assert_eq!(
        merged,
        json!({
            "openapi": "3.0.0",
            "info": {
                "title": "merged spec",
                "description": "merged spec",
                "version": "1.0.0"
            },
            "servers": [{"url": "http://localhost:8080"}],
            "paths": {
                "/a/b": {"$ref": "./spec1.yaml#/paths/~1a~1b"},
                "/c": {"$ref": "./spec1.yaml#/paths/~1c"},
                "/d/{id}": {"$ref": "./spec2.yaml#/paths/~1d~1{id}"}
            }
        })
    );
}

#[test]
fn test_real_world_specs_are_merged() {
    let temp_dir = create_spec_dir(vec![
        ("orders.json", ORDERS_JSON),
        ("users.yaml", USERS_YAML),
    ]);

    let written = merge(temp_dir.path()).unwrap();
    let merged = read_merged(&written);

    // orders.json is discovered first
    assert_eq!(written, temp_dir.path().join("merged.json"));
    assert_eq!(merged["openapi"], "3.0.1");
    assert_eq!(
        merged["paths"],
        json!({
            "/orders": {"$ref": "./orders.json#/paths/~1orders"},
            "/orders/{orderId}/items": {"$ref": "./orders.json#/paths/~1orders~1{orderId}~1items"},
            "/users": {"$ref": "./users.yaml#/paths/~1users"},
            "/users/{id}": {"$ref": "./users.yaml#/paths/~1users~1{id}"}
        })
    );
    // bearerAuth from users.yaml replaces the one in orders.json; bearerFormat is dropped
    assert_eq!(
        merged["components"]["securitySchemes"],
        json!({
            "apiKeyAuth": {"type": "apiKey"},
            "bearerAuth": {"type": "http", "scheme": "bearer"}
        })
    );
}

#[test]
fn test_path_collision_last_discovered_wins() {
    let temp_dir = create_spec_dir(vec![
        ("a.yaml", "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths:\n  /x: {}\n"),
        ("b.yaml", "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths:\n  /x: {}\n"),
    ]);

    let merged = read_merged(&merge(temp_dir.path()).unwrap());

    assert_eq!(merged["paths"], json!({"/x": {"$ref": "./b.yaml#/paths/~1x"}}));
}

#[test]
fn test_strict_mode_rejects_path_collision() {
    let temp_dir = create_spec_dir(vec![("oauth.yml", OAUTH_YML), ("users.yaml", USERS_YAML)]);

    let result = MergedSpecBuilder::new(temp_dir.path(), "merged")
        .with_collision_policy(CollisionPolicy::Strict)
        .with_logger(NoopLogger)
        .build_merged_spec();

    match result {
        Err(MergeError::Collision {
            kind,
            key,
            previous,
            current,
        }) => {
            assert_eq!(kind, CollisionKind::Path);
            assert_eq!(key, "/users");
            assert_eq!(previous, "oauth.yml");
            assert_eq!(current, "users.yaml");
        }
        other => panic!("expected a collision, got {:?}", other),
    }
    assert!(!temp_dir.path().join("merged.yaml").exists());
}

#[test]
fn test_unparseable_files_are_skipped() {
    let temp_dir = create_spec_dir(vec![
        ("broken.json", "{\"openapi\": \"3.0.0\", \"paths\": "),
        ("legacy.yaml", LEGACY_YAML),
        ("notes.txt", NOTES_TXT),
        ("users.yaml", USERS_YAML),
    ]);
    let logger = RecordingLogger::default();

    let written = MergedSpecBuilder::new(temp_dir.path(), "merged")
        .with_logger(logger.clone())
        .build_merged_spec()
        .unwrap();
    let merged = read_merged(&written);

    // broken.json is discovered first but never loads, so it does not pick the format
    assert_eq!(written, temp_dir.path().join("merged.yaml"));
    assert_eq!(merged["openapi"], "3.0.3");
    assert_eq!(
        merged["paths"],
        json!({
            "/users": {"$ref": "./users.yaml#/paths/~1users"},
            "/users/{id}": {"$ref": "./users.yaml#/paths/~1users~1{id}"}
        })
    );
    assert_eq!(
        merged["components"]["securitySchemes"],
        json!({"bearerAuth": {"type": "http", "scheme": "bearer"}})
    );

    let errors = logger.errors.borrow();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].contains("broken.json"));
    assert!(errors[1].contains("legacy.yaml"));
    assert!(errors[2].contains("notes.txt"));
}

#[test]
fn test_all_files_unparseable_still_writes_output() {
    let temp_dir = create_spec_dir(vec![("notes.txt", NOTES_TXT)]);
    let logger = RecordingLogger::default();

    let written = MergedSpecBuilder::new(temp_dir.path(), "merged")
        .with_logger(logger.clone())
        .build_merged_spec()
        .unwrap();
    let merged = read_merged(&written);

    assert_eq!(written, temp_dir.path().join("merged.yaml"));
    assert!(merged["openapi"].is_null());
    assert_eq!(merged["paths"], json!({}));
    assert!(merged.get("components").is_none());
    assert_eq!(logger.errors.borrow().len(), 2);
}

#[test]
fn test_first_json_spec_selects_json_output() {
    let temp_dir = create_spec_dir(vec![
        ("a.JSON", r#"{"openapi": "3.1.0", "info": {"title": "t", "version": "1"}, "paths": {"/a": {}}}"#),
        ("b.json", r#"{"openapi": "3.0.0", "info": {"title": "t", "version": "1"}, "paths": {"/b": {}}}"#),
    ]);

    let written = merge(temp_dir.path()).unwrap();

    assert_eq!(written, temp_dir.path().join("merged.json"));
    let merged = read_merged(&written);
    assert_eq!(merged["openapi"], "3.1.0");
}

#[test]
fn test_first_yaml_spec_selects_yaml_output_despite_later_json() {
    let temp_dir = create_spec_dir(vec![
        ("a.yml", "openapi: 3.0.2\ninfo:\n  title: t\n  version: '1'\npaths:\n  /a: {}\n"),
        ("b.json", r#"{"openapi": "3.1.0", "info": {"title": "t", "version": "1"}, "paths": {"/b": {}}}"#),
    ]);

    let written = merge(temp_dir.path()).unwrap();

    assert_eq!(written, temp_dir.path().join("merged.yaml"));
    assert!(!temp_dir.path().join("merged.json").exists());
    let merged = read_merged(&written);
    assert_eq!(merged["openapi"], "3.0.2");
    assert_eq!(merged["paths"]["/b"]["$ref"], "./b.json#/paths/~1b");
}

#[test]
fn test_rerun_replaces_stale_output_of_other_format() {
    let temp_dir = create_spec_dir(vec![
        ("merged.json", r#"{"openapi": "3.0.0", "info": {"title": "t", "version": "1"}, "paths": {"/stale": {}}}"#),
        ("users.yaml", USERS_YAML),
    ]);
    let logger = RecordingLogger::default();

    let written = MergedSpecBuilder::new(temp_dir.path(), "merged")
        .with_logger(logger.clone())
        .build_merged_spec()
        .unwrap();

    assert_eq!(written, temp_dir.path().join("merged.yaml"));
    assert!(!temp_dir.path().join("merged.json").exists());

    let mut names: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["merged.yaml", "users.yaml"]);

    // the stale output was removed before discovery, so it contributed nothing
    let merged = read_merged(&written);
    assert!(merged["paths"].get("/stale").is_none());
    assert!(logger
        .infos
        .borrow()
        .iter()
        .any(|message| message.contains("Removed merged spec from previous run")));
}

#[test]
fn test_rerun_is_idempotent() {
    let temp_dir = create_spec_dir(vec![("users.yaml", USERS_YAML)]);

    let first = merge(temp_dir.path()).unwrap();
    let first_content = fs::read_to_string(&first).unwrap();
    let second = merge(temp_dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), first_content);
}

#[test]
fn test_security_scheme_collision_last_discovered_wins() {
    let temp_dir = create_spec_dir(vec![
        (
            "a.yaml",
            "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths: {}\ncomponents:\n  securitySchemes:\n    auth:\n      type: apiKey\n      in: header\n      name: X-Key\n",
        ),
        (
            "b.yaml",
            "openapi: 3.0.0\ninfo:\n  title: t\n  version: '1'\npaths: {}\ncomponents:\n  securitySchemes:\n    auth:\n      type: http\n      scheme: digest\n",
        ),
    ]);

    let merged = read_merged(&merge(temp_dir.path()).unwrap());

    assert_eq!(
        merged["components"]["securitySchemes"],
        json!({"auth": {"type": "http", "scheme": "digest"}})
    );
}

#[test]
fn test_local_scheme_refs_are_resolved() {
    let temp_dir = create_spec_dir(vec![("oauth.yml", OAUTH_YML)]);

    let merged = read_merged(&merge(temp_dir.path()).unwrap());

    assert_eq!(
        merged["components"]["securitySchemes"],
        json!({
            "corporateOAuth": {"type": "oauth2"},
            "oauth": {"type": "oauth2"}
        })
    );
}

#[test]
fn test_nested_spec_directories() {
    let temp_dir = create_spec_dir(vec![
        ("v1/users.yaml", USERS_YAML),
        ("v2/orders.json", ORDERS_JSON),
    ]);

    let merged = read_merged(&merge(temp_dir.path()).unwrap());

    assert_eq!(merged["paths"]["/users"]["$ref"], "./v1/users.yaml#/paths/~1users");
    assert_eq!(merged["paths"]["/orders"]["$ref"], "./v2/orders.json#/paths/~1orders");
}
