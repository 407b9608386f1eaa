use crate::merge_engine::CollisionPolicy;
use crate::merger::{MergedSpecBuilder, DEFAULT_MERGE_FILE_NAME};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// OpenAPI Merge - Combine a directory of OpenAPI documents into one spec of `$ref` pointers
#[derive(Parser, Debug)]
#[command(name = "openapi-merge")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory containing the OpenAPI documents to merge
    #[arg(value_name = "SPEC_DIR")]
    pub spec_dir: PathBuf,

    /// Base name of the merged file, written as <SPEC_DIR>/<NAME>.json or .yaml
    #[arg(short = 'n', long = "name", value_name = "NAME", default_value = DEFAULT_MERGE_FILE_NAME)]
    pub merge_file_name: String,

    /// Fail when two documents declare the same path or security scheme
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn collision_policy(&self) -> CollisionPolicy {
        if self.strict {
            CollisionPolicy::Strict
        } else {
            CollisionPolicy::LastWriterWins
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.spec_dir.exists() {
        anyhow::bail!("Spec directory does not exist: {}", args.spec_dir.display());
    }

    if !args.spec_dir.is_dir() {
        anyhow::bail!(
            "Spec directory is not a directory: {}",
            args.spec_dir.display()
        );
    }

    if args.merge_file_name.trim().is_empty() {
        anyhow::bail!("Merged file name must not be empty");
    }

    if args.merge_file_name.contains(['/', '\\']) {
        anyhow::bail!(
            "Merged file name must not contain a path separator: {}",
            args.merge_file_name
        );
    }

    info!("Spec directory: {}", args.spec_dir.display());
    info!("Merged file name: {}", args.merge_file_name);
    info!("Collision policy: {:?}", args.collision_policy());

    Ok(args)
}

/// Run the merge and return the path of the merged spec
pub fn run(args: CliArgs) -> Result<PathBuf> {
    info!("Merging specs in {}...", args.spec_dir.display());

    let merged_path = MergedSpecBuilder::new(args.spec_dir.clone(), args.merge_file_name.clone())
        .with_collision_policy(args.collision_policy())
        .build_merged_spec()
        .with_context(|| format!("Failed to merge specs in {}", args.spec_dir.display()))?;

    info!("Merge complete: {}", merged_path.display());

    Ok(merged_path)
}
