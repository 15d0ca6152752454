//! Overload merging: fold adjacent same-named declarations into one entity.
//!
//! Single pass over sibling declarations. An open group collects heads until
//! a declaration with a body closes it; a different name closes the open
//! group and starts a new one.

use crate::model::Function;
use crate::parser::doc::DocComment;

/// One function-like declaration as it appears in the source.
#[derive(Debug, Clone)]
pub struct Declared {
    pub name: String,
    pub signature: String,
    pub has_body: bool,
    pub doc: Option<DocComment>,
}

/// Merged overload group, signatures in declaration order.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub signatures: Vec<String>,
    /// Doc of the last declaration in the group that has one
    pub doc: Option<DocComment>,
    /// Any member was marked `@internal`
    pub internal: bool,
}

impl Group {
    fn open(decl: Declared) -> Self {
        let internal = decl.doc.as_ref().is_some_and(|d| d.internal);
        Group {
            name: decl.name,
            signatures: vec![decl.signature],
            doc: decl.doc,
            internal,
        }
    }

    fn push(&mut self, decl: Declared) {
        self.signatures.push(decl.signature);
        if let Some(doc) = decl.doc {
            self.internal |= doc.internal;
            self.doc = Some(doc);
        }
    }

    pub fn into_function(self) -> Function {
        Function {
            name: self.name,
            doc: self.doc.map(|d| d.documentable()).unwrap_or_default(),
            signatures: self.signatures,
        }
    }
}

/// Merge declarations into overload groups, preserving source order.
pub fn merge(decls: Vec<Declared>) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut current: Option<Group> = None;

    for decl in decls {
        let has_body = decl.has_body;
        match current.as_mut() {
            Some(group) if group.name == decl.name => group.push(decl),
            _ => {
                groups.extend(current.take());
                current = Some(Group::open(decl));
            }
        }
        if has_body {
            groups.extend(current.take());
        }
    }
    // Heads with no implementation (ambient declarations)
    groups.extend(current);
    groups
}

/// Merge, drop `@internal` groups and convert to model functions.
pub fn functions(decls: Vec<Declared>) -> Vec<Function> {
    merge(decls)
        .into_iter()
        .filter(|g| !g.internal)
        .map(Group::into_function)
        .collect()
}
