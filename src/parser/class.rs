//! Class extraction: header, constructor and public methods.

use crate::model::Class;
use crate::parser::overload::{self, Declared};
use crate::parser::{doc, Declaration, SourceFile};
use crate::validation::Validation;
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::Node;

const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration", "class"];

/// Class members that can be methods, including overload heads.
const METHOD_KINDS: &[&str] = &["method_definition", "method_signature", "abstract_method_signature"];

// An export tree-sitter could not parse because the class has no name.
static RE_ANONYMOUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)\bexport\s+(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\b\s*(?:[{]|extends\b|implements\b|$)",
    )
    .unwrap()
});

/// Extract every exported, non-internal class of a file.
pub fn get_classes(module: &str, file: &SourceFile) -> Validation<Vec<Class>> {
    let mut errors = Vec::new();
    let mut classes = Vec::new();

    for decl in file.declarations() {
        let Some(item) = decl.exported_item(CLASS_KINDS) else {
            continue;
        };
        if decl.is_internal() {
            continue;
        }
        match file.name_of(item) {
            Some(name) => classes.push(parse_class(file, name, &decl, item)),
            None => errors.push(missing_name(module)),
        }
    }

    for text in file.unparsed() {
        errors.extend(RE_ANONYMOUS.find_iter(&text).map(|_| missing_name(module)));
    }

    if !errors.is_empty() {
        return Validation::Failure(errors);
    }
    Validation::success(classes)
}

fn missing_name(module: &str) -> String {
    format!("Missing class name in module {}", module)
}

fn parse_class(file: &SourceFile, name: &str, decl: &Declaration, item: Node) -> Class {
    let doc = decl.documentable();
    let Some(body) = item.child_by_field_name("body") else {
        return Class {
            name: name.to_string(),
            doc,
            signature: file.whole(decl.node, item),
            methods: Vec::new(),
            static_methods: Vec::new(),
        };
    };

    let header = file.slice(decl.node.start_byte(), body.start_byte()).trim_end();

    let mut constructor = None;
    let mut methods = Vec::new();
    let mut static_methods = Vec::new();

    for member in body.named_children(&mut body.walk()) {
        if !METHOD_KINDS.contains(&member.kind()) {
            continue;
        }
        let Some(member_name) = member.child_by_field_name("name") else {
            continue;
        };
        let (start, inner_comments) = member_start(file, member);
        let (signature, has_body) = file.collapse_body(start, member);
        if file.text(member_name) == "constructor" {
            constructor = Some(signature);
            continue;
        }
        let mut comments = file.comments_before(member);
        comments.extend(inner_comments);
        let modifiers = modifiers(file, start, member, member_name);
        let hidden = member_name.kind() == "private_property_identifier"
            || modifiers
                .iter()
                .any(|m| matches!(*m, "private" | "protected" | "get" | "set"));
        if hidden {
            continue;
        }
        let decl = Declared {
            name: file.text(member_name).to_string(),
            signature,
            has_body,
            doc: doc::attached(&comments),
        };
        if modifiers.contains(&"static") {
            static_methods.push(decl);
        } else {
            methods.push(decl);
        }
    }

    let signature = match constructor {
        Some(ctor) => format!("{} {{\n  {}\n  ... \n}}", header, ctor),
        None => format!("{} {{\n  ... \n}}", header),
    };

    Class {
        name: name.to_string(),
        doc,
        signature,
        methods: overload::functions(methods),
        static_methods: overload::functions(static_methods),
    }
}

/// The first node of a member past its decorators, and the comments
/// among those decorators.
fn member_start<'a, 'f>(file: &'f SourceFile, member: Node<'a>) -> (Node<'a>, Vec<&'f str>) {
    let mut comments = Vec::new();
    let mut cursor = member.walk();
    for child in member.children(&mut cursor) {
        match child.kind() {
            "comment" => comments.push(file.text(child)),
            "decorator" => {}
            _ => return (child, comments),
        }
    }
    (member, comments)
}

/// Keywords before a member's name: accessibility, `static`, `get`, `async`...
fn modifiers<'a>(file: &'a SourceFile, start: Node, member: Node, name: Node) -> Vec<&'a str> {
    let mut cursor = member.walk();
    let modifiers = member
        .children(&mut cursor)
        .skip_while(|child| child.id() != start.id())
        .take_while(|child| child.id() != name.id())
        .map(|child| file.text(child))
        .collect();
    modifiers
}
