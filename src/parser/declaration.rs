//! Interfaces, type aliases and constants: single-signature declarations.

use crate::model::{Constant, Interface, TypeAlias};
use crate::parser::function::function_value_signature;
use crate::parser::{Declaration, SourceFile};
use crate::validation::Validation;
use tree_sitter::Node;

/// Exported, non-internal declarations of `kind` with their name and
/// declaration text.
fn exported<'a>(
    file: &'a SourceFile,
    kind: &'static str,
) -> impl Iterator<Item = (String, String, Declaration<'a>)> + 'a {
    file.declarations()
        .into_iter()
        .filter(|decl| !decl.is_internal())
        .filter_map(move |decl| {
            let item = decl.exported_item(&[kind])?;
            let name = file.name_of(item)?.to_string();
            Some((name, file.whole(decl.node, item), decl))
        })
}

pub fn get_interfaces(file: &SourceFile) -> Validation<Vec<Interface>> {
    Validation::success(
        exported(file, "interface_declaration")
            .map(|(name, signature, decl)| Interface {
                name,
                doc: decl.documentable(),
                signature,
            })
            .collect(),
    )
}

pub fn get_type_aliases(file: &SourceFile) -> Validation<Vec<TypeAlias>> {
    Validation::success(
        exported(file, "type_alias_declaration")
            .map(|(name, signature, decl)| TypeAlias {
                name,
                doc: decl.documentable(),
                signature,
            })
            .collect(),
    )
}

/// Exported constants, except function values that are listed as functions.
pub fn get_constants(file: &SourceFile) -> Validation<Vec<Constant>> {
    let mut constants = Vec::new();
    for decl in file.declarations() {
        if decl.is_internal() {
            continue;
        }
        for declarator in decl.const_declarators() {
            let Some(name) = file.name_of(declarator) else {
                continue;
            };
            // Documented function values belong to `get_functions`.
            if decl.doc.is_some() && function_value_signature(file, &decl, declarator).is_some() {
                continue;
            }
            constants.push(Constant {
                name: name.to_string(),
                doc: decl.documentable(),
                signature: constant_signature(file, &decl, declarator),
            });
        }
    }
    Validation::success(constants)
}

/// Declaration text with the initializer replaced by `...`.
fn constant_signature(file: &SourceFile, decl: &Declaration, declarator: Node) -> String {
    let eq = declarator
        .children(&mut declarator.walk())
        .find(|child| child.kind() == "=");
    match eq {
        Some(eq) => format!("{} = ...", file.declarator_text(decl, declarator, eq.start_byte())),
        None => file.declarator_text(decl, declarator, declarator.end_byte()),
    }
}
