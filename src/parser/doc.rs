//! `/** ... */` doc-comment parser.
//!
//! Recognised tags: `@since`, `@deprecated`, `@example`, `@internal`, `@file`.
//! Any other tag is ignored but still closes the description or example it follows.

use crate::model::Documentable;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z]+)\b[[:blank:]]*(.*)$").unwrap());

/// Everything a doc comment can say about the declaration it precedes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub description: Option<String>,
    pub since: Option<String>,
    pub deprecated: bool,
    pub example: Option<String>,
    /// `@internal`: the owner is left out of the documentation
    pub internal: bool,
    /// `@file`: module-level description
    pub file: Option<String>,
}

impl DocComment {
    pub fn documentable(&self) -> Documentable {
        Documentable {
            description: self.description.clone(),
            since: self.since.clone(),
            deprecated: self.deprecated,
            example: self.example.clone(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    Example,
    File,
    Other,
}

/// Is this raw comment a doc comment?
pub fn is_doc(raw: &str) -> bool {
    raw.starts_with("/**") && !raw.starts_with("/**/")
}

/// Parse a raw `/** ... */` comment.
pub fn parse(raw: &str) -> DocComment {
    let mut doc = DocComment::default();
    let mut section = Section::Description;
    let mut description: Vec<&str> = Vec::new();
    let mut example: Vec<&str> = Vec::new();
    let mut file: Vec<&str> = Vec::new();

    for line in content_lines(raw) {
        let trimmed = line.trim();
        if let Some(caps) = RE_TAG.captures(trimmed) {
            let rest = caps.get(2).map_or("", |m| m.as_str().trim());
            section = Section::Other;
            match &caps[1] {
                "since" => doc.since = non_empty(rest),
                "deprecated" => doc.deprecated = true,
                "internal" => doc.internal = true,
                "example" => {
                    section = Section::Example;
                    if !rest.is_empty() {
                        example.push(rest);
                    }
                }
                "file" => {
                    section = Section::File;
                    file.push(rest);
                }
                _ => {}
            }
            continue;
        }
        match section {
            Section::Description => description.push(trimmed),
            Section::Example => example.push(line.trim_end()),
            Section::File => file.push(trimmed),
            Section::Other => {}
        }
    }

    doc.description = join_block(&description);
    doc.example = join_block(&example);
    if !file.is_empty() {
        doc.file = Some(join_block(&file).unwrap_or_default());
    }
    doc
}

/// The doc comment attached to a declaration: the last doc comment before it
/// that is not a `@file` block. Plain comments in between are skipped.
pub fn attached<S: AsRef<str>>(comments: &[S]) -> Option<DocComment> {
    comments
        .iter()
        .map(AsRef::as_ref)
        .rev()
        .filter(|c| is_doc(c))
        .map(parse)
        .find(|doc| doc.file.is_none())
}

/// The `@file` description among a run of leading comments.
pub fn file_description<S: AsRef<str>>(comments: &[S]) -> Option<String> {
    comments
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| is_doc(c))
        .find_map(|c| parse(c).file)
        .and_then(|text| non_empty(&text))
}

/// Strip the comment delimiters and each line's leading `*`.
fn content_lines(raw: &str) -> Vec<&str> {
    let body = raw.strip_prefix("/**").unwrap_or(raw);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim_start();
            match line.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line,
            }
        })
        .collect()
}

/// Join lines, dropping leading and trailing blank lines.
fn join_block(lines: &[&str]) -> Option<String> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    let end = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(lines[start..=end].join("\n"))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
