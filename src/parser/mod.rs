//! Turn one TypeScript file into a `Module`.
//!
//! The file is parsed with tree-sitter. Each declaration kind is extracted
//! independently from the syntax tree; their failures are accumulated so a
//! single file reports every problem it has.

pub mod class;
pub mod declaration;
pub mod doc;
pub mod function;
pub mod overload;

pub use class::get_classes;
pub use declaration::{get_constants, get_interfaces, get_type_aliases};
pub use function::get_functions;

use crate::model::{Class, Constant, Documentable, Function, Interface, Module, TypeAlias};
use crate::validation::{Errors, Validation};
use doc::DocComment;
use tree_sitter::{Node, Parser, Tree};

/// A source file and its syntax tree.
pub struct SourceFile {
    source: String,
    tree: Tree,
}

impl SourceFile {
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| e.to_string())?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| "no syntax tree produced".to_string())?;
        Ok(SourceFile {
            source: text.to_string(),
            tree,
        })
    }

    pub fn text(&self, node: Node) -> &str {
        &self.source[node.byte_range()]
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Top-level statements with their attached doc comments.
    ///
    /// Exports that tree-sitter recovered inside a syntax error are included.
    pub fn declarations(&self) -> Vec<Declaration<'_>> {
        let root = self.tree.root_node();
        let mut out = Vec::new();
        for node in root.children(&mut root.walk()) {
            if node.is_error() {
                out.extend(
                    node.named_children(&mut node.walk())
                        .filter(|n| n.kind() == "export_statement")
                        .map(|n| self.declaration(n)),
                );
            } else if node.kind() != "comment" {
                out.push(self.declaration(node));
            }
        }
        out
    }

    fn declaration<'a>(&'a self, node: Node<'a>) -> Declaration<'a> {
        let (exported, item) = match node.kind() {
            "export_statement" => (
                true,
                node.child_by_field_name("declaration")
                    .or_else(|| node.child_by_field_name("value")),
            ),
            _ => (false, Some(node)),
        };
        Declaration {
            node,
            item: item.map(ambient),
            exported,
            doc: doc::attached(&self.comments_before(node)),
        }
    }

    /// Comments directly before `node` in source order. Decorators in
    /// between are passed over.
    pub(crate) fn comments_before(&self, node: Node) -> Vec<&str> {
        let mut comments = Vec::new();
        let mut prev = node.prev_sibling();
        while let Some(sibling) = prev {
            match sibling.kind() {
                "comment" => comments.push(self.text(sibling)),
                "decorator" => {}
                _ => break,
            }
            prev = sibling.prev_sibling();
        }
        comments.reverse();
        comments
    }

    /// Comments before the first statement (or the whole file when it has none).
    fn leading_comments(&self) -> Vec<&str> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let comments = root
            .children(&mut cursor)
            .take_while(|n| n.kind() == "comment")
            .map(|n| self.text(n))
            .collect();
        comments
    }

    /// Source of the top-level syntax errors, with the exports recovered
    /// inside them blanked out.
    pub(crate) fn unparsed(&self) -> Vec<String> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let errors: Vec<Node> = root.children(&mut cursor).filter(|n| n.is_error()).collect();
        errors
            .into_iter()
            .map(|error| {
                let start = error.start_byte();
                let recovered: Vec<_> = error
                    .named_children(&mut error.walk())
                    .filter(|n| n.kind() == "export_statement")
                    .map(|n| n.start_byte() - start..n.end_byte() - start)
                    .collect();
                let mut text = self.text(error).to_string();
                for range in recovered.into_iter().rev() {
                    let blank: String = text[range.clone()]
                        .chars()
                        .map(|c| if c == '\n' { c } else { ' ' })
                        .collect();
                    text.replace_range(range, &blank);
                }
                text
            })
            .collect()
    }

    /// The `name` field of a declaration, `None` when it is anonymous.
    pub(crate) fn name_of(&self, node: Node) -> Option<&str> {
        node.child_by_field_name("name")
            .filter(|n| !n.is_missing())
            .map(|n| self.text(n))
            .filter(|name| !name.is_empty())
    }

    /// Text from the start of `from` up to the body of `node`, with the
    /// body collapsed to `{ ... }`; and whether there was a body.
    ///
    /// Without a body (an overload head) the text runs to the end of `node`,
    /// minus any trailing `;`.
    pub(crate) fn collapse_body(&self, from: Node, node: Node) -> (String, bool) {
        match node.child_by_field_name("body") {
            Some(body) => (
                format!(
                    "{} {{ ... }}",
                    self.slice(from.start_byte(), body.start_byte()).trim_end()
                ),
                true,
            ),
            None => (self.whole(from, node), false),
        }
    }

    /// Text from the start of `from` to the end of `node`, minus any trailing `;`.
    pub(crate) fn whole(&self, from: Node, node: Node) -> String {
        strip_semicolon(self.slice(from.start_byte(), node.end_byte())).to_string()
    }

    /// `export const` followed by the text of `declarator` up to `end`.
    pub(crate) fn declarator_text(&self, decl: &Declaration, declarator: Node, end: usize) -> String {
        let keyword_end = decl
            .item
            .and_then(|item| item.child(0))
            .map_or(declarator.start_byte(), |keyword| keyword.end_byte());
        format!(
            "{} {}",
            self.slice(decl.node.start_byte(), keyword_end).trim_end(),
            self.slice(declarator.start_byte(), end).trim_end()
        )
    }
}

/// The declaration wrapped by `declare`.
fn ambient(node: Node) -> Node {
    if node.kind() != "ambient_declaration" {
        return node;
    }
    let inner = node.named_children(&mut node.walk()).next();
    inner.unwrap_or(node)
}

pub(crate) fn strip_semicolon(text: &str) -> &str {
    let text = text.trim_end();
    text.strip_suffix(';').unwrap_or(text).trim_end()
}

/// A top-level statement together with its attached doc comment.
#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    /// The whole statement, `export` keyword included
    pub node: Node<'a>,
    /// What the statement declares: the exported declaration or default value
    pub item: Option<Node<'a>>,
    pub exported: bool,
    pub doc: Option<DocComment>,
}

impl<'a> Declaration<'a> {
    pub fn is_internal(&self) -> bool {
        self.doc.as_ref().is_some_and(|d| d.internal)
    }

    pub fn documentable(&self) -> Documentable {
        self.doc.as_ref().map(|d| d.documentable()).unwrap_or_default()
    }

    /// The exported item when it has one of `kinds`.
    pub fn exported_item(&self, kinds: &[&str]) -> Option<Node<'a>> {
        self.item
            .filter(|item| self.exported && kinds.contains(&item.kind()))
    }

    /// Declarators of an exported `const` binding a plain name.
    pub fn const_declarators(&self) -> Vec<Node<'a>> {
        let Some(item) = self.exported_item(&["lexical_declaration"]) else {
            return Vec::new();
        };
        if item.child(0).map(|keyword| keyword.kind()) != Some("const") {
            return Vec::new();
        }
        let declarators = item
            .named_children(&mut item.walk())
            .filter(|n| n.kind() == "variable_declarator")
            .filter(|n| {
                n.child_by_field_name("name")
                    .is_some_and(|name| name.kind() == "identifier")
            })
            .collect();
        declarators
    }
}

/// The `@file` description of a module, if its leading comments carry one.
pub fn get_module_description(file: &SourceFile) -> Option<String> {
    doc::file_description(&file.leading_comments())
}

/// Checks that run on top of extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub enforce_descriptions: bool,
    pub enforce_examples: bool,
}

/// Parse one file into a `Module`, accumulating every failure.
pub fn parse_module(path: Vec<String>, source: &str, options: ParseOptions) -> Validation<Module> {
    let name = path.join("/");
    let file = match SourceFile::parse(source) {
        Ok(file) => file,
        Err(e) => return Validation::failure(format!("Cannot parse module {}: {}", name, e)),
    };
    if file.has_syntax_errors() {
        log::warn!("Syntax errors in module {}, declarations near them may be missing", name);
    }
    let description = get_module_description(&file);

    let interfaces = enforce(&name, options, get_interfaces(&file));
    let type_aliases = enforce(&name, options, get_type_aliases(&file));
    let constants = enforce(&name, options, get_constants(&file));
    let functions = enforce(&name, options, get_functions(&name, &file));
    let classes = enforce(&name, options, get_classes(&name, &file));

    interfaces
        .zip(type_aliases)
        .zip(constants)
        .zip(functions)
        .zip(classes)
        .map(
            |((((interfaces, type_aliases), constants), functions), classes)| Module {
                path,
                description,
                interfaces,
                type_aliases,
                constants,
                functions,
                classes,
            },
        )
}

/// An extracted entity whose documentation can be checked.
trait Documented {
    const KIND: &'static str;

    /// Visit `(kind, name, doc)` for the entity and anything nested in it.
    fn visit(&self, f: &mut dyn FnMut(&str, &str, &Documentable));
}

macro_rules! documented {
    ($ty:ty, $kind:literal) => {
        impl Documented for $ty {
            const KIND: &'static str = $kind;

            fn visit(&self, f: &mut dyn FnMut(&str, &str, &Documentable)) {
                f(Self::KIND, &self.name, &self.doc);
            }
        }
    };
}

documented!(Interface, "interface");
documented!(TypeAlias, "type alias");
documented!(Constant, "constant");
documented!(Function, "function");

impl Documented for Class {
    const KIND: &'static str = "class";

    fn visit(&self, f: &mut dyn FnMut(&str, &str, &Documentable)) {
        f(Self::KIND, &self.name, &self.doc);
        for method in &self.static_methods {
            f("static method", &format!("{}.{}", self.name, method.name), &method.doc);
        }
        for method in &self.methods {
            f("method", &format!("{}.{}", self.name, method.name), &method.doc);
        }
    }
}

/// Apply the enforcement checks to a successful extraction.
///
/// Enforcement depends on extraction, so this sequences rather than accumulates.
fn enforce<T: Documented>(
    module: &str,
    options: ParseOptions,
    extracted: Validation<Vec<T>>,
) -> Validation<Vec<T>> {
    if !options.enforce_descriptions && !options.enforce_examples {
        return extracted;
    }
    extracted
        .into_result()
        .and_then(|items| {
            let mut errors: Errors = Vec::new();
            for item in &items {
                item.visit(&mut |kind, name, doc| {
                    if options.enforce_descriptions && doc.description.is_none() {
                        errors.push(format!(
                            "Missing description for {} {} in module {}",
                            kind, name, module
                        ));
                    }
                    if options.enforce_examples && doc.example.is_none() {
                        errors.push(format!(
                            "Missing example for {} {} in module {}",
                            kind, name, module
                        ));
                    }
                });
            }
            if errors.is_empty() {
                Ok(items)
            } else {
                Err(errors)
            }
        })
        .into()
}
