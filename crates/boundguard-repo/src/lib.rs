//! Repository adapters: discover project files and load import graphs.
//!
//! This crate is allowed to do filesystem IO. It should not spawn external processes;
//! diff scoping should be supplied as a list of changed paths by the caller (typically the CLI).

#![forbid(unsafe_code)]

mod discover;
mod graph;

use anyhow::Context;
use boundguard_domain::model::{ImportEdge, ProjectModel};
use boundguard_domain::pattern::split_path;
use boundguard_types::RepoPath;
use camino::Utf8Path;
use std::collections::BTreeSet;

pub use discover::{FileFilter, discover_files};
pub use graph::{ImportGraph, load_import_graph, parse_graph_json, parse_graph_text};

/// Input to scope selection. In `Diff`, the caller provides the changed files (from git).
#[derive(Clone, Debug)]
pub enum ScopeInput {
    Repo,
    Diff { changed_files: Vec<RepoPath> },
}

/// Build the in-memory project model used by the policy engine.
///
/// Project files are the discovered files plus the graph's own file list, both run through
/// `filter`. Edges with a well-formed endpoint outside the filter (external packages, ignored
/// files, absolute paths outside `repo_root`) are dropped; malformed relative endpoints are
/// kept so the engine can report them.
pub fn build_project_model(
    repo_root: &Utf8Path,
    graph: ImportGraph,
    filter: &FileFilter,
    scope: ScopeInput,
) -> anyhow::Result<ProjectModel> {
    let discovered = discover_files(repo_root, filter).context("discover project files")?;

    let mut files: BTreeSet<RepoPath> = discovered.into_iter().collect();
    files.extend(
        graph
            .files
            .into_iter()
            .map(|p| RepoPath::new(relativize(repo_root, p.as_str())))
            .filter(|p| filter.accepts(p.as_str())),
    );

    let edges: Vec<ImportEdge> = graph
        .edges
        .into_iter()
        .map(|e| ImportEdge {
            importer: relativize(repo_root, &e.importer),
            imported: relativize(repo_root, &e.imported),
            line: e.line,
        })
        .filter(|e| {
            endpoint_in_project(filter, &e.importer) && endpoint_in_project(filter, &e.imported)
        })
        .collect();

    let changed_files = match scope {
        ScopeInput::Repo => Vec::new(),
        ScopeInput::Diff { changed_files } => changed_files,
    };

    Ok(ProjectModel {
        files: files.into_iter().collect(),
        edges,
        changed_files,
    })
}

/// Called after `relativize`, so an absolute path here lies outside the root.
fn endpoint_in_project(filter: &FileFilter, path: &str) -> bool {
    if Utf8Path::new(path).is_absolute() {
        return false;
    }
    split_path(path).is_err() || filter.accepts(path)
}

/// Absolute paths under the root become relative; everything else is kept verbatim.
fn relativize(repo_root: &Utf8Path, path: &str) -> String {
    let p = Utf8Path::new(path);
    if p.is_absolute()
        && let Some(rel) = RepoPath::relative_to(repo_root, p)
    {
        return rel.as_str().to_string();
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn touch(path: &Utf8Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, "").expect("write file");
    }

    fn default_filter() -> FileFilter {
        FileFilter::new(&["src/**/*.*".to_string()], &["**/*.spec.ts".to_string()])
            .expect("filter")
    }

    #[test]
    fn model_unions_discovered_and_graph_files() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        touch(&root.join("src/main.ts"));

        let graph = ImportGraph {
            files: vec![RepoPath::new("src/App.vue"), RepoPath::new("scripts/build.ts")],
            edges: vec![ImportEdge::new("src/main.ts", "src/App.vue")],
        };
        let model =
            build_project_model(&root, graph, &default_filter(), ScopeInput::Repo).expect("model");
        assert_eq!(
            model.files,
            vec![RepoPath::new("src/App.vue"), RepoPath::new("src/main.ts")]
        );
        assert_eq!(model.edges.len(), 1);
        assert!(model.changed_files.is_empty());
    }

    #[test]
    fn external_and_ignored_endpoints_are_dropped() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        let graph = ImportGraph {
            files: Vec::new(),
            edges: vec![
                ImportEdge::new("src/main.ts", "node_modules/vue/index.js"),
                ImportEdge::new("src/main.spec.ts", "src/main.ts"),
                ImportEdge::new("src/main.ts", "../outside.ts"),
                ImportEdge::new("src/main.ts", "src/App.vue"),
            ],
        };
        let model =
            build_project_model(&root, graph, &default_filter(), ScopeInput::Repo).expect("model");
        let kept: Vec<&str> = model.edges.iter().map(|e| e.imported.as_str()).collect();
        assert_eq!(kept, vec!["../outside.ts", "src/App.vue"]);
    }

    #[test]
    fn absolute_graph_paths_are_made_relative() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let abs = root.join("src/main.ts");

        let graph = ImportGraph {
            files: vec![RepoPath::new(abs.as_str())],
            edges: vec![ImportEdge::new(abs.as_str(), "src/App.vue")],
        };
        let model =
            build_project_model(&root, graph, &default_filter(), ScopeInput::Repo).expect("model");
        assert_eq!(model.files, vec![RepoPath::new("src/main.ts")]);
        assert_eq!(model.edges[0].importer, "src/main.ts");
    }

    #[test]
    fn absolute_endpoints_outside_root_are_dropped() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp).join("app");
        let hoisted = utf8_root(&tmp).join("node_modules/vue/index.js");
        touch(&root.join("src/main.ts"));

        let graph = ImportGraph {
            files: Vec::new(),
            edges: vec![
                ImportEdge::new("src/main.ts", hoisted.as_str()),
                ImportEdge::new(root.join("src/main.ts").as_str(), "src/App.vue"),
            ],
        };
        let model =
            build_project_model(&root, graph, &default_filter(), ScopeInput::Repo).expect("model");
        assert_eq!(model.edges.len(), 1);
        assert_eq!(model.edges[0].importer, "src/main.ts");
    }

    #[test]
    fn diff_scope_carries_changed_files() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let changed = vec![RepoPath::new("src/main.ts")];
        let model = build_project_model(
            &root,
            ImportGraph::default(),
            &default_filter(),
            ScopeInput::Diff {
                changed_files: changed.clone(),
            },
        )
        .expect("model");
        assert_eq!(model.changed_files, changed);
    }

    proptest! {
        #[test]
        fn text_graph_parser_never_panics(input in ".*") {
            let _ = parse_graph_text(&input);
            let _ = parse_graph_json(&input);
        }
    }
}
