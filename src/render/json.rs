//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the Module model directly with its title and navigation order.

use crate::model::Module;
use crate::render::{module_title, Renderer};
use crate::validation::Errors;
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct Page<'a> {
    title: String,
    order: usize,
    module: &'a Module,
}

impl Renderer for JsonRenderer {
    fn render(&self, module: &Module, order: usize) -> Result<String, Errors> {
        let page = Page {
            title: module_title(module),
            order,
            module,
        };
        let mut out = serde_json::to_string_pretty(&page).map_err(|e| {
            vec![format!(
                "Cannot render module {}: {}",
                module.path.join("/"),
                e
            )]
        })?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
