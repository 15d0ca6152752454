//! The documentation pipeline.
//!
//! Stages run in order and the first failing stage stops the run with every
//! message it collected. Within the extraction, render and write stages all
//! items are attempted before the stage reports.

use crate::check::{self, TypeChecker};
use crate::config::Config;
use crate::model::{Module, Node};
use crate::parser::{self, ParseOptions};
use crate::render::{self, Renderer};
use crate::tree::{self, Entry};
use crate::validation::{Errors, Validation};
use std::fs;
use std::path::{Path, PathBuf};

/// Run every stage for the project at `root`.
pub fn run(root: &Path, config: &Config, checker: &dyn TypeChecker) -> Result<(), Errors> {
    let renderer = render::create_renderer(&config.format).map_err(|e| vec![e.to_string()])?;

    let files = resolve_files(root, &config.pattern, &config.exclude)?;
    log::info!("Found {} files", files.len());

    let entries = tree::flatten(tree::build(&files));
    let options = ParseOptions {
        enforce_descriptions: config.enforce_descriptions,
        enforce_examples: config.enforce_examples,
    };
    let mut nodes = parse_nodes(root, entries, options)?;

    if config.check_examples {
        check::check_examples(&nodes, checker)?;
    } else {
        log::info!("Skipping example checks");
    }

    sort_nodes(&mut nodes);

    let pages = render_nodes(&nodes, renderer.as_ref())?;
    let out_dir = root.join(&config.out_dir);
    write_pages(&out_dir, &pages)?;
    log::info!("Wrote {} files to {}", pages.len(), out_dir.display());
    Ok(())
}

/// Files matching `pattern` below `root` and none of `exclude`, as sorted
/// `/`-separated relative paths.
pub fn resolve_files(root: &Path, pattern: &str, exclude: &[String]) -> Result<Vec<String>, Errors> {
    let excludes: Vec<glob::Pattern> = exclude
        .iter()
        .map(|p| {
            Validation::from(
                glob::Pattern::new(p)
                    .map_err(|e| vec![format!("Invalid exclude pattern {}: {}", p, e)]),
            )
        })
        .collect::<Validation<Vec<_>>>()
        .into_result()?;

    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        pattern
    );
    let matches = glob::glob(&full)
        .map_err(|e| vec![format!("Invalid glob pattern {}: {}", pattern, e)])?;

    let mut files: Vec<String> = matches
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter_map(|path| relative_path(root, &path))
        .filter(|rel| !excludes.iter().any(|p| p.matches(rel)))
        .collect();
    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err(vec![format!("No files found matching {}", pattern)]);
    }
    Ok(files)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(segments.join("/"))
}

/// Read and parse every file entry, accumulating failures across files.
fn parse_nodes(root: &Path, entries: Vec<Entry>, options: ParseOptions) -> Result<Vec<Node>, Errors> {
    entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Directory(path) => Validation::success(Node::Index { path }),
            Entry::File(path) => parse_file(root, path, options).map(Node::Module),
        })
        .collect::<Validation<Vec<_>>>()
        .into_result()
}

fn parse_file(root: &Path, path: Vec<String>, options: ParseOptions) -> Validation<Module> {
    let file = path.iter().fold(root.to_path_buf(), |p, s| p.join(s));
    log::debug!("Parsing {}", file.display());
    match fs::read_to_string(&file) {
        Ok(source) => parser::parse_module(path, &source, options),
        Err(e) => Validation::failure(format!("Cannot read file {}: {}", file.display(), e)),
    }
}

/// Stable sort by `/`-joined path, ignoring case.
pub fn sort_nodes(nodes: &mut [Node]) {
    nodes.sort_by_cached_key(|node| node.path().join("/").to_lowercase());
}

/// A rendered module and its path below the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: PathBuf,
    pub content: String,
}

/// Render every module, numbering them from 1 in order.
fn render_nodes(nodes: &[Node], renderer: &dyn Renderer) -> Result<Vec<Page>, Errors> {
    let mut order = 0;
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Index { path } => {
                log::info!("Detected directory {}", path.join("/"));
                None
            }
            Node::Module(module) => {
                order += 1;
                log::info!("Printing module {}", module.path.join("/"));
                Some(Validation::from(renderer.render(module, order).map(
                    |content| Page {
                        path: page_path(module, renderer.file_extension()),
                        content,
                    },
                )))
            }
        })
        .collect::<Validation<Vec<_>>>()
        .into_result()
}

/// `a/b.ts` becomes `a/b.ts.<ext>`.
fn page_path(module: &Module, extension: &str) -> PathBuf {
    let mut path: PathBuf = module.relative_path().iter().collect();
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    path.set_file_name(name);
    path
}

fn write_pages(out_dir: &Path, pages: &[Page]) -> Result<(), Errors> {
    let errors: Errors = pages
        .iter()
        .filter_map(|page| {
            let path = out_dir.join(&page.path);
            let written = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| fs::write(&path, &page.content));
            written
                .err()
                .map(|e| format!("Cannot open file {}: {}", path.display(), e))
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
