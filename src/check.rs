//! Example checking: every `@example` of a function or method becomes a
//! standalone TypeScript unit, and all units are type-checked together.

use crate::model::{Function, Node};
use crate::validation::Errors;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

/// Synthesized units: relative file name to source text.
pub type Units = BTreeMap<String, String>;

const PRELUDE: &str = "import * as assert from 'assert'\n\n";

static RE_DIAGNOSTIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\S.*\(\d+,\d+\): )?error TS\d+: ").unwrap());

/// Type-checks a set of units, returning one message per diagnostic.
pub trait TypeChecker {
    fn check(&self, units: &Units) -> Vec<String>;
}

impl<F> TypeChecker for F
where
    F: Fn(&Units) -> Vec<String>,
{
    fn check(&self, units: &Units) -> Vec<String> {
        self(units)
    }
}

/// Collect the examples of every function and method in `nodes`.
pub fn collect(nodes: &[Node]) -> Units {
    let mut units = Units::new();
    for node in nodes {
        let Node::Module(module) = node else {
            continue;
        };
        let dir = module.path.join("/");
        let mut add = |name: String, f: &Function| {
            if let Some(example) = f.doc.example.as_deref().filter(|e| !e.trim().is_empty()) {
                units.insert(
                    format!("{}/{}.ts", dir, name),
                    format!("{}{}\n", PRELUDE, example),
                );
            }
        };
        for f in &module.functions {
            add(f.name.clone(), f);
        }
        for class in &module.classes {
            for m in &class.static_methods {
                add(format!("{}.{}", class.name, m.name), m);
            }
            for m in &class.methods {
                add(format!("{}.prototype.{}", class.name, m.name), m);
            }
        }
    }
    units
}

/// Validate every example of `nodes`. Succeeds without invoking the checker
/// when there is nothing to check.
pub fn check_examples(nodes: &[Node], checker: &dyn TypeChecker) -> Result<(), Errors> {
    let units = collect(nodes);
    if units.is_empty() {
        log::debug!("No examples to check");
        return Ok(());
    }
    log::info!("Type checking {} examples", units.len());
    let failures = checker.check(&units);
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

/// Split compiler output into one message per diagnostic, keeping indented
/// continuation lines with the diagnostic they belong to.
pub fn parse_diagnostics(output: &str) -> Vec<String> {
    let mut diagnostics: Vec<String> = Vec::new();
    let mut in_diagnostic = false;
    for line in output.lines() {
        if RE_DIAGNOSTIC.is_match(line) {
            diagnostics.push(line.trim_end().to_string());
            in_diagnostic = true;
        } else if in_diagnostic && line.starts_with(char::is_whitespace) && !line.trim().is_empty() {
            if let Some(last) = diagnostics.last_mut() {
                last.push('\n');
                last.push_str(line.trim_end());
            }
        } else {
            in_diagnostic = false;
        }
    }
    diagnostics
}

/// The TypeScript compiler, run once over all units.
#[derive(Debug, Clone)]
pub struct Tsc {
    pub program: String,
    /// Project configuration the generated one extends
    pub tsconfig: Option<PathBuf>,
    /// Project root; units are written below it so module resolution works
    pub root: PathBuf,
}

impl Tsc {
    fn write_units(&self, dir: &Path, units: &Units) -> Result<PathBuf, Errors> {
        let mut errors = Vec::new();
        for (name, source) in units {
            let path = dir.join(name);
            let written = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| fs::write(&path, source));
            if let Err(e) = written {
                errors.push(format!("Cannot open file {}: {}", path.display(), e));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut config = serde_json::json!({
            "compilerOptions": { "noEmit": true },
            "files": units.keys().collect::<Vec<_>>(),
            "include": [],
        });
        if let Some(ref tsconfig) = self.tsconfig {
            let base = fs::canonicalize(tsconfig).unwrap_or_else(|_| tsconfig.clone());
            config["extends"] = serde_json::Value::String(base.display().to_string());
        } else {
            config["compilerOptions"]["esModuleInterop"] = serde_json::Value::Bool(true);
        }
        let path = dir.join("tsconfig.json");
        let text = serde_json::to_string_pretty(&config)
            .map_err(|e| vec![format!("Cannot write file {}: {}", path.display(), e)])?;
        fs::write(&path, text)
            .map_err(|e| vec![format!("Cannot open file {}: {}", path.display(), e)])?;
        Ok(path)
    }

    fn run(&self, units: &Units) -> Result<(), Errors> {
        let dir = tempfile::Builder::new()
            .prefix(".tsdoc-examples-")
            .tempdir_in(&self.root)
            .map_err(|e| {
                vec![format!(
                    "Cannot create directory in {}: {}",
                    self.root.display(),
                    e
                )]
            })?;
        let config = self.write_units(dir.path(), units)?;
        log::debug!("Running {} on {}", self.program, config.display());

        let output = Command::new(&self.program)
            .arg("--project")
            .arg(&config)
            .args(["--pretty", "false"])
            .current_dir(&self.root)
            .output()
            .map_err(|e| vec![format!("Cannot run {}: {}", self.program, e)])?;
        if output.status.success() {
            return Ok(());
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        // Report unit names rather than temporary paths
        for prefix in [dir.path().to_path_buf(), relative_to(dir.path(), &self.root)] {
            let prefix = format!("{}/", prefix.display());
            if prefix != "/" {
                text = text.replace(&prefix, "");
            }
        }

        let diagnostics = parse_diagnostics(&text);
        if diagnostics.is_empty() {
            Err(vec![format!(
                "{} failed ({}): {}",
                self.program,
                output.status,
                text.trim()
            )])
        } else {
            Err(diagnostics)
        }
    }
}

impl TypeChecker for Tsc {
    fn check(&self, units: &Units) -> Vec<String> {
        self.run(units).err().unwrap_or_default()
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Class, Documentable, Module};
    use std::cell::Cell;

    fn function(name: &str, example: Option<&str>) -> Function {
        Function {
            name: name.to_string(),
            doc: Documentable {
                example: example.map(str::to_string),
                ..Default::default()
            },
            signatures: vec![],
        }
    }

    fn node(path: &[&str], functions: Vec<Function>, classes: Vec<Class>) -> Node {
        Node::Module(Module {
            path: path.iter().map(|s| s.to_string()).collect(),
            functions,
            classes,
            ..Default::default()
        })
    }

    #[test]
    fn collects_functions_and_methods() {
        let class = Class {
            name: "Box".to_string(),
            doc: Documentable::default(),
            signature: String::new(),
            methods: vec![function("map", Some("new Box().map()"))],
            static_methods: vec![function("of", Some("Box.of(1)"))],
        };
        let nodes = vec![
            Node::Index {
                path: vec!["src".to_string()],
            },
            node(&["src", "box.ts"], vec![function("make", Some("make()"))], vec![class]),
            node(&["src", "other.ts"], vec![function("make", Some("make(2)")), function("plain", None)], vec![]),
        ];
        let units = collect(&nodes);
        let names: Vec<&str> = units.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "src/box.ts/Box.of.ts",
                "src/box.ts/Box.prototype.map.ts",
                "src/box.ts/make.ts",
                "src/other.ts/make.ts",
            ]
        );
        assert_eq!(
            units["src/box.ts/make.ts"],
            "import * as assert from 'assert'\n\nmake()\n"
        );
    }

    #[test]
    fn checker_not_invoked_without_examples() {
        let called = Cell::new(false);
        let checker = |_: &Units| -> Vec<String> {
            called.set(true);
            Vec::new()
        };
        let nodes = vec![node(&["src", "a.ts"], vec![function("f", None)], vec![])];
        assert_eq!(check_examples(&nodes, &checker), Ok(()));
        assert!(!called.get());
    }

    #[test]
    fn diagnostics_become_failures() {
        let checker = |units: &Units| -> Vec<String> {
            units
                .keys()
                .map(|name| format!("{}(3,1): error TS2322: Type 'string' is not assignable to type 'number'.", name))
                .collect()
        };
        let nodes = vec![node(&["src", "a.ts"], vec![function("f", Some("const n: number = ''"))], vec![])];
        assert_eq!(
            check_examples(&nodes, &checker),
            Err(vec![
                "src/a.ts/f.ts(3,1): error TS2322: Type 'string' is not assignable to type 'number'."
                    .to_string()
            ])
        );
    }

    #[test]
    fn parse_compiler_output() {
        let output = "src/a.ts/f.ts(3,7): error TS2322: Type 'string' is not assignable to type 'number'.\n\
                      src/a.ts/g.ts(4,1): error TS2345: Argument of type 'A' is not assignable.\n  \
                      Property 'x' is missing.\n\
                      error TS5058: The specified path does not exist.\n\
                      Found 3 errors.\n";
        assert_eq!(
            parse_diagnostics(output),
            vec![
                "src/a.ts/f.ts(3,7): error TS2322: Type 'string' is not assignable to type 'number'.".to_string(),
                "src/a.ts/g.ts(4,1): error TS2345: Argument of type 'A' is not assignable.\n  Property 'x' is missing."
                    .to_string(),
                "error TS5058: The specified path does not exist.".to_string(),
            ]
        );
    }

    #[test]
    fn missing_compiler_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let tsc = Tsc {
            program: "tsdoc-no-such-compiler".to_string(),
            tsconfig: None,
            root: root.path().to_path_buf(),
        };
        let mut units = Units::new();
        units.insert("src/a.ts/f.ts".to_string(), "f()\n".to_string());
        let failures = tsc.check(&units);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with("Cannot run tsdoc-no-such-compiler: "));
        // The temporary directory is removed again
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
