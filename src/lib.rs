//! OpenAPI Merge - One composite OpenAPI document from a directory of specs.
//!
//! Projects often split their API description into one OpenAPI file per resource. Code
//! generators and documentation tools usually want a single entry point. This library
//! builds that entry point without copying content: every path of every input becomes a
//! `$ref` pointer into the file that declares it.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Lists every file under the spec root directory
//! 2. [`loader`] - Reads one file and extracts its version, path keys and security schemes
//! 3. [`format`] - Pins the version and output format from the first loaded spec
//! 4. [`merge_engine`] - Folds loaded specs into the [`composite`] document
//! 5. [`serializer`] - Writes the document as YAML or JSON and clears stale outputs
//! 6. [`merger`] - Runs the steps above in order
//!
//! Files that fail to load are logged through [`logger::MergeLogger`] and skipped.
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_merge::{merge_engine::CollisionPolicy, merger::MergedSpecBuilder};
//!
//! let written = MergedSpecBuilder::new("./specs", "_merged_spec")
//!     .with_collision_policy(CollisionPolicy::Strict)
//!     .build_merged_spec()
//!     .unwrap();
//! println!("{}", written.display());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod composite;
pub mod error;
pub mod format;
pub mod loader;
pub mod logger;
pub mod merge_engine;
pub mod merger;
pub mod scanner;
pub mod serializer;

pub use error::{MergeError, Result};
pub use merger::MergedSpecBuilder;
