//! `tsdoc.json` configuration file support.
//!
//! Every key is optional; CLI flags take precedence over file values.
//!
//! ```json
//! {
//!   "pattern": "src/**/*.ts",
//!   "outDir": "docs",
//!   "exclude": ["src/internal/**"],
//!   "enforceDescriptions": true,
//!   "checkExamples": false
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the project root when `--config` is not given.
pub const DEFAULT_FILE: &str = "tsdoc.json";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Glob of the source files to document, relative to the root.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Output directory, relative to the root unless absolute.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Globs of matched files to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// `markdown` or `json`
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub enforce_descriptions: bool,

    #[serde(default)]
    pub enforce_examples: bool,

    /// Type-check `@example` blocks.
    #[serde(default = "default_true")]
    pub check_examples: bool,

    /// TypeScript compiler executable.
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Project compiler configuration the examples are checked against.
    #[serde(default)]
    pub tsconfig: Option<PathBuf>,
}

fn default_pattern() -> String {
    "src/**/*.ts".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_format() -> String {
    "markdown".to_string()
}

fn default_true() -> bool {
    true
}

fn default_compiler() -> String {
    "tsc".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            out_dir: default_out_dir(),
            exclude: Vec::new(),
            format: default_format(),
            enforce_descriptions: false,
            enforce_examples: false,
            check_examples: true,
            compiler: default_compiler(),
            tsconfig: None,
        }
    }
}

impl Config {
    /// Load the configuration: `explicit` must exist, otherwise `tsdoc.json`
    /// in `root` is used when present, otherwise defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(DEFAULT_FILE);
                if !candidate.is_file() {
                    log::debug!("No {} found, using defaults", DEFAULT_FILE);
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The project tsconfig to extend: the configured one, or `tsconfig.json`
    /// in `root` when it exists.
    pub fn resolve_tsconfig(&self, root: &Path) -> Option<PathBuf> {
        match self.tsconfig {
            Some(ref path) => Some(root.join(path)),
            None => {
                let candidate = root.join("tsconfig.json");
                candidate.is_file().then_some(candidate)
            }
        }
    }
}
