//! GitHub-flavored markdown renderer.
//!
//! One page per module: front matter, overview, table of contents, then one
//! section per documented entity.

use crate::model::*;
use crate::render::{module_title, Renderer};
use crate::toc;
use crate::validation::Errors;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, module: &Module, order: usize) -> Result<String, Errors> {
        let title = module_title(module);
        let mut lines: Vec<String> = Vec::new();

        lines.push("---".to_string());
        lines.push(format!("title: {}", title));
        lines.push(format!("nav_order: {}", order));
        lines.push("parent: Modules".to_string());
        lines.push("---".to_string());
        lines.push(String::new());

        lines.push(format!("## {} overview\n", title));
        if let Some(ref desc) = module.description {
            lines.push(desc.clone());
            lines.push(String::new());
        }

        let sections = sections(module);
        if !sections.is_empty() {
            lines.push("<h2 class=\"text-delta\">Table of contents</h2>\n".to_string());
            for section in &sections {
                lines.push(toc::render_toc_item(&section.heading, section.depth));
            }
            lines.push(String::new());
            lines.push("---".to_string());
            lines.push(String::new());
        }

        for section in &sections {
            lines.push(render_section(section));
        }

        let mut output = lines.join("\n");
        if !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// A heading plus everything printed under it.
struct Section<'a> {
    heading: String,
    depth: usize,
    doc: &'a Documentable,
    signatures: Vec<&'a str>,
}

impl<'a> Section<'a> {
    fn new(kind: &str, name: &str, depth: usize, doc: &'a Documentable, signatures: Vec<&'a str>) -> Self {
        let name = if doc.deprecated {
            format!("~~{}~~", name)
        } else {
            name.to_string()
        };
        Section {
            heading: format!("{} ({})", name, kind),
            depth,
            doc,
            signatures,
        }
    }
}

fn sections(module: &Module) -> Vec<Section<'_>> {
    let mut out = Vec::new();
    for i in &module.interfaces {
        out.push(Section::new("interface", &i.name, 0, &i.doc, vec![&i.signature]));
    }
    for t in &module.type_aliases {
        out.push(Section::new("type alias", &t.name, 0, &t.doc, vec![&t.signature]));
    }
    for c in &module.constants {
        out.push(Section::new("constant", &c.name, 0, &c.doc, vec![&c.signature]));
    }
    for f in &module.functions {
        out.push(Section::new("function", &f.name, 0, &f.doc, signatures(f)));
    }
    for c in &module.classes {
        out.push(Section::new("class", &c.name, 0, &c.doc, vec![&c.signature]));
        // `Class.method`, unique across the classes of a module
        for m in &c.static_methods {
            let name = format!("{}.{}", c.name, m.name);
            out.push(Section::new("static method", &name, 1, &m.doc, signatures(m)));
        }
        for m in &c.methods {
            let name = format!("{}.{}", c.name, m.name);
            out.push(Section::new("method", &name, 1, &m.doc, signatures(m)));
        }
    }
    out
}

fn signatures(f: &Function) -> Vec<&str> {
    f.signatures.iter().map(String::as_str).collect()
}

fn render_section(section: &Section) -> String {
    let mut lines: Vec<String> = Vec::new();
    let hashes = "#".repeat(section.depth + 1);
    lines.push(format!("{} {}\n", hashes, section.heading));

    if let Some(ref desc) = section.doc.description {
        lines.push(desc.clone());
        lines.push(String::new());
    }

    lines.push("**Signature**\n".to_string());
    lines.push("```ts".to_string());
    lines.push(section.signatures.join("\n"));
    lines.push("```".to_string());
    lines.push(String::new());

    if let Some(ref example) = section.doc.example {
        lines.push("**Example**\n".to_string());
        lines.push("```ts".to_string());
        lines.push(example.clone());
        lines.push("```".to_string());
        lines.push(String::new());
    }

    if let Some(ref since) = section.doc.since {
        lines.push(format!("Added in v{}", since));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> Module {
        Module {
            path: vec!["src".to_string(), "option.ts".to_string()],
            description: Some("Optional values".to_string()),
            type_aliases: vec![TypeAlias {
                name: "Option".to_string(),
                doc: Documentable {
                    description: Some("An optional value".to_string()),
                    since: Some("1.0.0".to_string()),
                    ..Default::default()
                },
                signature: "export type Option<A> = None | Some<A>".to_string(),
            }],
            functions: vec![Function {
                name: "fold".to_string(),
                doc: Documentable {
                    deprecated: true,
                    example: Some("assert.strictEqual(1, 1)".to_string()),
                    ..Default::default()
                },
                signatures: vec![
                    "export function fold(a: int): int".to_string(),
                    "export function fold(a: number): number { ... }".to_string(),
                ],
            }],
            classes: vec![Class {
                name: "Box".to_string(),
                doc: Documentable::default(),
                signature: "export class Box {\n  ... \n}".to_string(),
                methods: vec![Method {
                    name: "map".to_string(),
                    doc: Documentable::default(),
                    signatures: vec!["map(): Box { ... }".to_string()],
                }],
                static_methods: vec![],
            }],
            ..Default::default()
        }
    }

    fn render(module: &Module) -> String {
        MarkdownRenderer.render(module, 3).unwrap()
    }

    #[test]
    fn front_matter() {
        let out = render(&module());
        assert!(out.starts_with("---\ntitle: option.ts\nnav_order: 3\nparent: Modules\n---\n"));
        assert!(out.contains("## option.ts overview\n\nOptional values\n"));
    }

    #[test]
    fn table_of_contents() {
        let out = render(&module());
        assert!(out.contains("- [Option (type alias)](#option-type-alias)"));
        assert!(out.contains("- [~~fold~~ (function)](#fold-function)"));
        assert!(out.contains("- [Box (class)](#box-class)\n  - [Box.map (method)](#boxmap-method)"));
    }

    #[test]
    fn entity_sections() {
        let out = render(&module());
        assert!(out.contains(
            "# Option (type alias)\n\nAn optional value\n\n**Signature**\n\n```ts\nexport type Option<A> = None | Some<A>\n```\n\nAdded in v1.0.0\n"
        ));
        assert!(out.contains(
            "```ts\nexport function fold(a: int): int\nexport function fold(a: number): number { ... }\n```"
        ));
        assert!(out.contains("**Example**\n\n```ts\nassert.strictEqual(1, 1)\n```"));
        assert!(out.contains("## Box.map (method)\n"));
    }

    #[test]
    fn same_method_name_in_two_classes() {
        let mut module = module();
        let mut other = module.classes[0].clone();
        other.name = "Pair".to_string();
        module.classes.push(other);
        let out = render(&module);
        assert!(out.contains("  - [Box.map (method)](#boxmap-method)"));
        assert!(out.contains("  - [Pair.map (method)](#pairmap-method)"));
        assert!(out.contains("## Pair.map (method)\n"));
    }

    #[test]
    fn empty_module_has_no_toc() {
        let module = Module {
            path: vec!["src".to_string(), "empty.ts".to_string()],
            ..Default::default()
        };
        let out = render(&module);
        assert!(!out.contains("Table of contents"));
        assert!(out.ends_with("## empty.ts overview\n"));
    }
}
