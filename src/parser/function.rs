//! Function extraction: `function` declarations and documented const-bound
//! function values, merged into overload groups.

use crate::model::Function;
use crate::parser::overload::{self, Declared};
use crate::parser::{Declaration, SourceFile};
use crate::validation::Validation;
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::Node;

/// Function declarations, overload heads and default-exported function values.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "function_expression",
    "function",
    "generator_function",
];

// An export tree-sitter could not parse because the function has no name.
static RE_ANONYMOUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)\bexport\s+(?:default\s+)?(?:declare\s+)?(?:async\s+)?function\b\s*\*?\s*(?:[(<]|$)",
    )
    .unwrap()
});

/// Extract every exported, non-internal function of a file.
pub fn get_functions(module: &str, file: &SourceFile) -> Validation<Vec<Function>> {
    let mut errors = Vec::new();
    let mut decls = Vec::new();

    for decl in file.declarations() {
        if let Some(item) = decl.exported_item(FUNCTION_KINDS) {
            // Internal members are dropped with their whole overload group.
            match file.name_of(item) {
                Some(name) => {
                    let (signature, has_body) = file.collapse_body(decl.node, item);
                    decls.push(Declared {
                        name: name.to_string(),
                        signature,
                        has_body,
                        doc: decl.doc,
                    });
                }
                None if decl.is_internal() => {}
                None => errors.push(missing_name(module)),
            }
            continue;
        }
        if decl.is_internal() {
            continue;
        }
        // Const-bound functions are documented only when they carry a doc comment.
        let Some(ref doc) = decl.doc else {
            continue;
        };
        for declarator in decl.const_declarators() {
            let (Some(name), Some(signature)) = (
                file.name_of(declarator),
                function_value_signature(file, &decl, declarator),
            ) else {
                continue;
            };
            decls.push(Declared {
                name: name.to_string(),
                signature,
                has_body: true,
                doc: Some(doc.clone()),
            });
        }
    }

    for text in file.unparsed() {
        errors.extend(RE_ANONYMOUS.find_iter(&text).map(|_| missing_name(module)));
    }

    if !errors.is_empty() {
        return Validation::Failure(errors);
    }
    Validation::success(overload::functions(decls))
}

fn missing_name(module: &str) -> String {
    format!("Missing function name in module {}", module)
}

/// Signature of a const bound to an arrow function or function expression,
/// or `None` when the initializer is some other value.
pub(crate) fn function_value_signature(
    file: &SourceFile,
    decl: &Declaration,
    declarator: Node,
) -> Option<String> {
    let value = declarator.child_by_field_name("value")?;
    match value.kind() {
        "arrow_function" => {
            let arrow = value
                .children(&mut value.walk())
                .find(|child| child.kind() == "=>")?;
            Some(format!(
                "{} ...",
                file.declarator_text(decl, declarator, arrow.end_byte())
            ))
        }
        "function_expression" | "function" | "generator_function" => {
            let body = value.child_by_field_name("body")?;
            Some(format!(
                "{} {{ ... }}",
                file.declarator_text(decl, declarator, body.start_byte())
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Documentable;

    fn functions(src: &str) -> Validation<Vec<Function>> {
        get_functions("test", &SourceFile::parse(src).unwrap())
    }

    fn documented() -> Documentable {
        Documentable {
            description: Some("a description...".to_string()),
            since: Some("1.0.0".to_string()),
            deprecated: true,
            example: None,
        }
    }

    const DOC: &str = "/**\n * a description...\n * @since 1.0.0\n * @deprecated\n */\n";

    #[test]
    fn anonymous_function_is_an_error() {
        assert_eq!(
            functions("export function(a: number, b: number): number { return a + b }"),
            Validation::Failure(vec!["Missing function name in module test".to_string()])
        );
    }

    #[test]
    fn private_function_is_skipped() {
        assert_eq!(
            functions("function sum(a: number, b: number): number { return a + b }"),
            Validation::success(vec![])
        );
    }

    #[test]
    fn internal_function_is_skipped() {
        assert_eq!(
            functions("/** @internal */export function sum(a: number, b: number): number { return a + b }"),
            Validation::success(vec![])
        );
    }

    #[test]
    fn private_and_internal_variables_are_skipped() {
        assert_eq!(
            functions("const sum = (a: number, b: number): number => a + b "),
            Validation::success(vec![])
        );
        assert_eq!(
            functions("/** @internal */export const sum = (a: number, b: number): number => a + b "),
            Validation::success(vec![])
        );
    }

    #[test]
    fn plain_constants_are_not_functions() {
        assert_eq!(functions("export const a = 1"), Validation::success(vec![]));
        assert_eq!(
            functions("/** one */\nexport const a = (1 + 2) * 3"),
            Validation::success(vec![])
        );
    }

    #[test]
    fn const_function() {
        let src = format!(
            "{}export const sum = (a: number, b: number): number => a + b",
            DOC
        );
        assert_eq!(
            functions(&src),
            Validation::success(vec![Function {
                name: "sum".to_string(),
                doc: documented(),
                signatures: vec!["export const sum = (a: number, b: number): number => ...".to_string()],
            }])
        );
    }

    #[test]
    fn function_declaration() {
        let src = format!(
            "{}export function sum(a: number, b: number): number {{ return a + b }}",
            DOC
        );
        assert_eq!(
            functions(&src),
            Validation::success(vec![Function {
                name: "sum".to_string(),
                doc: documented(),
                signatures: vec!["export function sum(a: number, b: number): number { ... }".to_string()],
            }])
        );
    }

    #[test]
    fn overloads() {
        let src = "/**\n* a description...\n* @since 1.0.0\n* @deprecated\n*/\nexport function sum(a: int, b: int): int\nexport function sum(a: number, b: number): number { return a + b }";
        assert_eq!(
            functions(src),
            Validation::success(vec![Function {
                name: "sum".to_string(),
                doc: documented(),
                signatures: vec![
                    "export function sum(a: int, b: int): int".to_string(),
                    "export function sum(a: number, b: number): number { ... }".to_string(),
                ],
            }])
        );
    }

    #[test]
    fn undocumented_declaration_has_empty_metadata() {
        let result = functions("export function f(): void {}");
        assert_eq!(
            result,
            Validation::success(vec![Function {
                name: "f".to_string(),
                doc: Documentable::default(),
                signatures: vec!["export function f(): void { ... }".to_string()],
            }])
        );
    }

    #[test]
    fn generic_and_curried_arrows() {
        let src = "/** id */\nexport const id = <A>(a: A): A => a\n/** curried */\nexport const add = (a: number) => (b: number): number => a + b\n";
        let Validation::Success(funcs) = functions(src) else {
            panic!("expected success");
        };
        assert_eq!(funcs[0].signatures, vec!["export const id = <A>(a: A): A => ..."]);
        assert_eq!(funcs[1].signatures, vec!["export const add = (a: number) => ..."]);
    }

    #[test]
    fn function_expression() {
        let src = "/** f */\nexport const f = function (a: number) {\n  return a\n}";
        let Validation::Success(funcs) = functions(src) else {
            panic!("expected success");
        };
        assert_eq!(funcs[0].signatures, vec!["export const f = function (a: number) { ... }"]);
    }

    #[test]
    fn all_anonymous_functions_are_reported() {
        let src = "export function() {}\nexport function sum() {}\nexport function() {}";
        assert_eq!(
            functions(src),
            Validation::Failure(vec![
                "Missing function name in module test".to_string(),
                "Missing function name in module test".to_string(),
            ])
        );
    }

    #[test]
    fn async_and_generator_functions() {
        let src = "export async function load(url: string): Promise<string> { return url }\nexport function* ids(): Generator<number> { yield 1 }";
        let Validation::Success(funcs) = functions(src) else {
            panic!("expected success");
        };
        assert_eq!(
            funcs[0].signatures,
            vec!["export async function load(url: string): Promise<string> { ... }"]
        );
        assert_eq!(funcs[1].name, "ids");
    }

    #[test]
    fn anonymous_default_export_is_an_error() {
        assert_eq!(
            functions("export default function (a: number) { return a }"),
            Validation::Failure(vec!["Missing function name in module test".to_string()])
        );
    }

    #[test]
    fn declarations_after_a_regex_literal() {
        let src = "const BRACE = /\\{/g\n/** a */\nexport const a = (s: string) => s.replace(BRACE, '')\nexport function b(): void {}";
        let Validation::Success(funcs) = functions(src) else {
            panic!("expected success");
        };
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(funcs[0].signatures, vec!["export const a = (s: string) => ..."]);
    }

    #[test]
    fn internal_overload_head_hides_the_group() {
        let src = "/** @internal */\nexport function f(a: int): int\nexport function f(a: number): number { return a }\nexport function g() {}";
        let Validation::Success(funcs) = functions(src) else {
            panic!("expected success");
        };
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["g"]);
    }
}
