//! MTL Normalizer
//!
//! Reads a Wavefront .mtl file and writes it back in canonical form: one
//! block per material in name order, `d` rewritten as `Tr`, unsupported
//! directives dropped.
//!
//! Usage: mtl_normalizer [--config codec.toml] <input.mtl> [output.mtl]
//!
//! Without an output path the input file is rewritten in place. Set
//! `RUST_LOG=debug` to see what the parser skipped.

use std::path::{Path, PathBuf};

use clap::Parser;
use phong_mtl::foundation::logging;
use phong_mtl::prelude::*;
use thiserror::Error;

/// Normalizer failures
#[derive(Error, Debug)]
enum NormalizeError {
    /// Config file could not be loaded
    #[error("Failed to load config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// Read or write failure
    #[error(transparent)]
    Mtl(#[from] MtlError),
}

/// Rewrite a Wavefront .mtl file in canonical form
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mtl_normalizer", version, about)]
struct Args {
    /// Material library to read
    input: PathBuf,

    /// Destination file; the input is rewritten in place when omitted
    output: Option<PathBuf>,

    /// Codec settings file (.toml or .ron)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<CodecConfig, NormalizeError> {
    match path {
        Some(path) => CodecConfig::load_from_file(path).map_err(|source| NormalizeError::Config {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(CodecConfig::default()),
    }
}

/// Normalize one file, returning the number of materials written
fn normalize(args: &Args) -> Result<usize, NormalizeError> {
    let config = load_config(args.config.as_deref())?;
    let file = MtlFile::open_with_config(&args.input, config)?;
    let count = file.materials().len();

    log::info!("Read {} materials from {}", count, args.input.display());
    for name in file.materials().names() {
        log::debug!("  {}", name);
    }

    file.save(args.output.as_deref())?;
    Ok(count)
}

fn main() {
    logging::init();

    // Usage errors print help and exit with status 2
    let args = Args::parse();

    match normalize(&args) {
        Ok(count) => {
            let output = args.output.as_ref().unwrap_or(&args.input);
            println!("Normalized {} materials: {} -> {}", count, args.input.display(), output.display());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
