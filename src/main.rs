//! OpenAPI Merge - Command-line tool for merging a directory of OpenAPI documents.
//!
//! Every document under the spec directory contributes its paths as `$ref` pointers and its
//! security schemes to one merged spec, written back into the same directory.
//!
//! # Usage
//!
//! ```bash
//! openapi-merge [OPTIONS] <SPEC_DIR>
//! ```
//!
//! # Examples
//!
//! Merge into `./specs/_merged_spec.yaml` (or `.json` when the first spec is JSON):
//! ```bash
//! openapi-merge ./specs
//! ```
//!
//! Choose the output name and refuse duplicate paths:
//! ```bash
//! openapi-merge ./specs -n api --strict
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_merge::cli;

fn main() -> Result<()> {
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI Merge starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    let merged_path = cli::run(args)?;
    println!("{}", merged_path.display());

    Ok(())
}
