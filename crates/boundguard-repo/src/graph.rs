use anyhow::Context;
use boundguard_domain::model::ImportEdge;
use boundguard_types::RepoPath;
use camino::Utf8Path;
use serde::Deserialize;

/// Import graph supplied by whatever resolved the project's module specifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportGraph {
    /// Extra project files named by the graph producer.
    pub files: Vec<RepoPath>,
    pub edges: Vec<ImportEdge>,
}

#[derive(Deserialize)]
struct GraphDocument {
    #[serde(default)]
    files: Vec<String>,
    edges: Vec<EdgeDocument>,
}

#[derive(Deserialize)]
struct EdgeDocument {
    importer: String,
    imported: String,
    #[serde(default)]
    line: Option<u32>,
}

/// Parse `{ "files": [..], "edges": [{ "importer", "imported", "line"? }] }`.
pub fn parse_graph_json(input: &str) -> anyhow::Result<ImportGraph> {
    let doc: GraphDocument = serde_json::from_str(input).context("parse import graph JSON")?;
    Ok(ImportGraph {
        files: doc.files.iter().map(RepoPath::new).collect(),
        edges: doc
            .edges
            .into_iter()
            .map(|e| ImportEdge {
                importer: e.importer,
                imported: e.imported,
                line: e.line,
            })
            .collect(),
    })
}

/// Parse one `importer -> imported` edge per line. Blank lines and `#` comments are skipped.
pub fn parse_graph_text(input: &str) -> anyhow::Result<ImportGraph> {
    let mut edges = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((importer, imported)) = line.split_once("->") else {
            anyhow::bail!("line {}: expected `importer -> imported`", idx + 1);
        };
        let (importer, imported) = (importer.trim(), imported.trim());
        if importer.is_empty() || imported.is_empty() {
            anyhow::bail!("line {}: edge has an empty side", idx + 1);
        }
        edges.push(ImportEdge::new(importer, imported));
    }
    Ok(ImportGraph {
        files: Vec::new(),
        edges,
    })
}

/// Read an import graph file.
///
/// `.json` files, or content starting with `{`, are JSON; anything else is the text format.
pub fn load_import_graph(path: &Utf8Path) -> anyhow::Result<ImportGraph> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let is_json = path.extension() == Some("json") || text.trim_start().starts_with('{');
    if is_json {
        parse_graph_json(&text).with_context(|| format!("parse {path}"))
    } else {
        parse_graph_text(&text).with_context(|| format!("parse {path}"))
    }
}
