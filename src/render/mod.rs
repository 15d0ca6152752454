//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::model::Module;
use crate::validation::Errors;
use anyhow::{anyhow, Result};

/// Trait for rendering a Module into a specific output format.
pub trait Renderer {
    /// `order` is the module's 1-based position among all printed modules.
    fn render(&self, module: &Module, order: usize) -> Result<String, Errors>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}

/// Display title of a module: its path below the root.
pub fn module_title(module: &Module) -> String {
    module.relative_path().join("/")
}
