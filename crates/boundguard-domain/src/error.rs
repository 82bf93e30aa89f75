use thiserror::Error;

/// A malformed element definition or rule entry, detected when the policy is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("element #{index} has an empty type")]
    EmptyElementType { index: usize },

    #[error("element type '{element_type}' is defined more than once")]
    DuplicateElementType { element_type: String },

    #[error("element '{element_type}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        element_type: String,
        pattern: String,
        reason: String,
    },

    #[error(
        "element '{element_type}' declares {declared} capture(s) but its patterns only have {wildcards} wildcard(s)"
    )]
    TooManyCaptures {
        element_type: String,
        declared: usize,
        wildcards: usize,
    },

    #[error("rule #{rule_index} has an empty `from` list")]
    EmptyFrom { rule_index: usize },

    #[error("rule #{rule_index} references unknown element type '{element_type}'")]
    UnknownElementType {
        rule_index: usize,
        element_type: String,
    },

    #[error(
        "rule #{rule_index} constrains capture '{capture}' which element '{element_type}' does not declare"
    )]
    UndeclaredCapture {
        rule_index: usize,
        element_type: String,
        capture: String,
    },

    #[error(
        "rule #{rule_index} references '${{{capture}}}' but importer type '{from_type}' does not capture it"
    )]
    UndeclaredBackReference {
        rule_index: usize,
        from_type: String,
        capture: String,
    },
}

/// Raised in strict mode when project files match no element definition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} file(s) match no element definition: {}", paths.len(), paths.join(", "))]
pub struct UnclassifiedFileError {
    pub paths: Vec<String>,
}

/// A path that is not normalized, forward-slash, and project-root-relative.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("malformed path '{path}': {kind}")]
pub struct PathError {
    pub path: String,
    pub kind: PathErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathErrorKind {
    #[error("path is empty")]
    Empty,
    #[error("path is absolute")]
    Absolute,
    #[error("path contains backslashes")]
    Backslash,
    #[error("path contains an empty segment")]
    EmptySegment,
    #[error("path contains a '.' or '..' segment")]
    DotSegment,
}
