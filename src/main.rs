//! tsdoc: generate documentation from annotated TypeScript source files.
//!
//! Reads `tsdoc.json` (optional), extracts every exported declaration with its
//! doc comment, type-checks `@example` blocks and writes one page per module:
//!
//! `tsdoc 'src/**/*.ts' -o docs`

mod check;
mod config;
mod model;
mod parser;
mod pipeline;
mod render;
mod toc;
mod tree;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use validation::Errors;

#[derive(Parser)]
#[command(
    name = "tsdoc",
    version,
    about = "Generate documentation from annotated TypeScript source files"
)]
struct Cli {
    /// Source files glob, relative to the working directory (default: src/**/*.ts).
    /// A directory documents every .ts file below it.
    pattern: Option<String>,

    /// Output directory (default: docs)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Exclude files matching this glob. Can be specified multiple times.
    #[arg(short = 'x', long)]
    exclude: Vec<String>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Configuration file (default: tsdoc.json when present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Do not type-check @example blocks
    #[arg(long)]
    no_check: bool,

    /// TypeScript compiler used to check examples (default: tsc)
    #[arg(long)]
    compiler: Option<String>,

    /// Project tsconfig the examples are checked against
    #[arg(long)]
    tsconfig: Option<PathBuf>,

    /// Fail on documented entities without a description
    #[arg(long)]
    enforce_descriptions: bool,

    /// Fail on documented entities without an example
    #[arg(long)]
    enforce_examples: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => {
            log::info!("Docs generation succeeded!");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("Errors:");
            for error in &errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let env = env_logger::Env::default().filter_or("TSDOC_LOG", if verbose { "debug" } else { "info" });
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(verbose)
        .init();
}

fn run(cli: &Cli) -> Result<(), Errors> {
    let (root, config) = resolve_config(cli).map_err(|e| vec![format!("{:#}", e)])?;
    let checker = check::Tsc {
        program: config.compiler.clone(),
        tsconfig: config.resolve_tsconfig(&root),
        root: root.clone(),
    };
    pipeline::run(&root, &config, &checker)
}

/// Working directory and the file configuration with CLI overrides applied.
fn resolve_config(cli: &Cli) -> Result<(PathBuf, Config)> {
    let root = std::env::current_dir().context("failed to determine the working directory")?;
    let mut config = Config::load(&root, cli.config.as_deref())?;

    if let Some(ref pattern) = cli.pattern {
        config.pattern = expand_pattern(&root, pattern);
    }
    if let Some(ref output) = cli.output {
        config.out_dir = output.clone();
    }
    config.exclude.extend(cli.exclude.iter().cloned());
    if let Some(ref format) = cli.format {
        config.format = format.clone();
    }
    if cli.no_check {
        config.check_examples = false;
    }
    if let Some(ref compiler) = cli.compiler {
        config.compiler = compiler.clone();
    }
    if let Some(ref tsconfig) = cli.tsconfig {
        config.tsconfig = Some(tsconfig.clone());
    }
    config.enforce_descriptions |= cli.enforce_descriptions;
    config.enforce_examples |= cli.enforce_examples;

    log::debug!("Configuration: {:?}", config);
    Ok((root, config))
}

/// A bare directory stands for every TypeScript file below it.
fn expand_pattern(root: &Path, pattern: &str) -> String {
    if root.join(pattern).is_dir() {
        format!("{}/**/*.ts", pattern.trim_end_matches('/'))
    } else {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_pattern_expands() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        assert_eq!(expand_pattern(dir.path(), "lib/"), "lib/**/*.ts");
        assert_eq!(expand_pattern(dir.path(), "lib/*.ts"), "lib/*.ts");
    }

    #[test]
    fn cli_flags() {
        let cli = Cli::try_parse_from([
            "tsdoc", "lib/**/*.ts", "-o", "out", "-x", "a", "-x", "b", "--no-check", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.pattern.as_deref(), Some("lib/**/*.ts"));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.exclude, vec!["a", "b"]);
        assert!(cli.no_check);
        assert_eq!(cli.format.as_deref(), Some("json"));
    }
}
