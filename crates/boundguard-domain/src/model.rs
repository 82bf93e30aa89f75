use boundguard_types::RepoPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named values extracted from wildcard positions of an element pattern.
pub type Captures = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The whole path must match `base_pattern/pattern`.
    Full,
    /// The trailing part of the path must match `pattern`, the leading part `base_pattern`.
    File,
}

/// How one architectural layer is recognized and parameterized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDefinition {
    pub element_type: String,
    pub base_pattern: Option<String>,
    pub pattern: String,
    pub mode: MatchMode,
    pub capture_names: Vec<String>,
}

impl ElementDefinition {
    pub fn full(element_type: &str, pattern: &str) -> Self {
        Self {
            element_type: element_type.to_string(),
            base_pattern: None,
            pattern: pattern.to_string(),
            mode: MatchMode::Full,
            capture_names: Vec::new(),
        }
    }

    pub fn file(element_type: &str, base_pattern: Option<&str>, pattern: &str) -> Self {
        Self {
            element_type: element_type.to_string(),
            base_pattern: base_pattern.map(str::to_string),
            pattern: pattern.to_string(),
            mode: MatchMode::File,
            capture_names: Vec::new(),
        }
    }

    pub fn with_captures(mut self, names: &[&str]) -> Self {
        self.capture_names = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// A classified file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: String,
    pub captures: Captures,
    pub file_path: String,
}

impl Element {
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures.get(name).map(String::as_str)
    }
}

/// One `importer -> imported` dependency, as found by the caller's import analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    pub importer: String,
    pub imported: String,
    /// Line of the import statement in the importer, when the caller knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ImportEdge {
    pub fn new(importer: &str, imported: &str) -> Self {
        Self {
            importer: importer.to_string(),
            imported: imported.to_string(),
            line: None,
        }
    }
}

/// Everything one check run looks at.
#[derive(Clone, Debug, Default)]
pub struct ProjectModel {
    /// All project files in scope for classification.
    pub files: Vec<RepoPath>,

    /// Import edges between project files.
    pub edges: Vec<ImportEdge>,

    /// Importers changed in the diff under review (only read in diff scope).
    pub changed_files: Vec<RepoPath>,
}
