//! Source hierarchy: fold matched file paths into a forest of directories and files.

use std::collections::BTreeMap;

/// Nested directory listing. A file maps to an empty listing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dir(BTreeMap<String, Dir>);

/// A node of the source hierarchy before any file is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory(Vec<String>),
    File(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<T> {
    pub value: T,
    pub forest: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    pub fn leaf(value: T) -> Self {
        Tree {
            value,
            forest: Vec::new(),
        }
    }
}

/// Fold `/`-separated paths into nested directory maps.
pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Dir {
    let mut root = Dir::default();
    for path in paths {
        let mut dir = &mut root;
        for segment in path.as_ref().split('/').filter(|s| !s.is_empty()) {
            dir = dir.0.entry(segment.to_string()).or_default();
        }
    }
    root
}

/// Convert a directory map into a forest; children are ordered by name.
pub fn from_dir(dir: &Dir) -> Vec<Tree<Entry>> {
    walk(dir, &[])
}

fn walk(dir: &Dir, prefix: &[String]) -> Vec<Tree<Entry>> {
    dir.0
        .iter()
        .map(|(name, children)| {
            let mut path = prefix.to_vec();
            path.push(name.clone());
            if children.0.is_empty() {
                Tree::leaf(Entry::File(path))
            } else {
                let forest = walk(children, &path);
                Tree {
                    value: Entry::Directory(path),
                    forest,
                }
            }
        })
        .collect()
}

/// Build the forest for a set of relative file paths.
pub fn build<S: AsRef<str>>(paths: &[S]) -> Vec<Tree<Entry>> {
    from_dir(&from_paths(paths))
}

/// Depth-first, pre-order listing of every value in the forest.
pub fn flatten<T>(forest: Vec<Tree<T>>) -> Vec<T> {
    let mut out = Vec::new();
    for tree in forest {
        out.push(tree.value);
        out.extend(flatten(tree.forest));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &[&str]) -> Tree<Entry> {
        Tree::leaf(Entry::File(path.iter().map(|s| s.to_string()).collect()))
    }

    fn directory(path: &[&str], forest: Vec<Tree<Entry>>) -> Tree<Entry> {
        Tree {
            value: Entry::Directory(path.iter().map(|s| s.to_string()).collect()),
            forest,
        }
    }

    #[test]
    fn paths_fold_into_maps() {
        assert_eq!(from_paths::<&str>(&[]), Dir::default());
        let dir = from_paths(&["a/b", "a/c"]);
        let a = &dir.0["a"];
        assert_eq!(a.0.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(a.0["b"].0.is_empty());
    }

    #[test]
    fn empty_input_is_empty_forest() {
        assert_eq!(build::<&str>(&[]), vec![]);
    }

    #[test]
    fn single_file_is_a_leaf() {
        assert_eq!(build(&["a"]), vec![file(&["a"])]);
    }

    #[test]
    fn nested_file() {
        assert_eq!(
            build(&["a/b"]),
            vec![directory(&["a"], vec![file(&["a", "b"])])]
        );
    }

    #[test]
    fn siblings_share_a_directory() {
        assert_eq!(
            build(&["a/b", "a/c"]),
            vec![directory(&["a"], vec![file(&["a", "b"]), file(&["a", "c"])])]
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = build(&["src/a.ts", "src/lib/b.ts", "src/c.ts", "x.ts"]);
        let backward = build(&["x.ts", "src/c.ts", "src/lib/b.ts", "src/a.ts"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn flatten_is_pre_order() {
        let entries = flatten(build(&["a/b", "a/c/d"]));
        let paths: Vec<String> = entries
            .iter()
            .map(|e| match e {
                Entry::Directory(p) => format!("dir:{}", p.join("/")),
                Entry::File(p) => format!("file:{}", p.join("/")),
            })
            .collect();
        assert_eq!(paths, vec!["dir:a", "file:a/b", "dir:a/c", "file:a/c/d"]);
    }
}
