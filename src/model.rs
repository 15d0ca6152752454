//! Format-agnostic data model for extracted documentation.

use serde::Serialize;

/// Metadata shared by every documented entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Documentable {
    pub description: Option<String>,
    /// `@since` version tag
    pub since: Option<String>,
    /// `@deprecated`
    pub deprecated: bool,
    /// Raw `@example` body
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub name: String,
    #[serde(flatten)]
    pub doc: Documentable,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeAlias {
    pub name: String,
    #[serde(flatten)]
    pub doc: Documentable,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    #[serde(flatten)]
    pub doc: Documentable,
    pub signature: String,
}

/// A function or an overload group of functions.
///
/// The last signature belongs to the implementation, the preceding ones are
/// overload heads, all in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    #[serde(flatten)]
    pub doc: Documentable,
    pub signatures: Vec<String>,
}

/// Class methods share the shape of functions.
pub type Method = Function;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub name: String,
    #[serde(flatten)]
    pub doc: Documentable,
    /// Class header plus constructor header, bodies collapsed
    pub signature: String,
    pub methods: Vec<Method>,
    pub static_methods: Vec<Method>,
}

/// One parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Path segments from the root; the first segment is the root marker.
    pub path: Vec<String>,
    /// `@file` description
    pub description: Option<String>,
    pub interfaces: Vec<Interface>,
    pub type_aliases: Vec<TypeAlias>,
    pub constants: Vec<Constant>,
    pub functions: Vec<Function>,
    pub classes: Vec<Class>,
}

impl Module {
    /// Path segments below the root marker. A file matched directly at the
    /// root keeps its own name.
    pub fn relative_path(&self) -> &[String] {
        match self.path.get(1..) {
            Some(rest) if !rest.is_empty() => rest,
            _ => &self.path,
        }
    }
}

/// A unit of the source hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Directory boundary, no content.
    Index { path: Vec<String> },
    Module(Module),
}

impl Node {
    pub fn path(&self) -> &[String] {
        match self {
            Node::Index { path } => path,
            Node::Module(module) => &module.path,
        }
    }
}
