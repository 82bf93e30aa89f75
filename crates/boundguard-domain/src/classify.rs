use crate::error::ConfigurationError;
use crate::model::{Element, ElementDefinition};
use crate::pattern::{CompiledElement, split_path};
use std::collections::{BTreeMap, BTreeSet};

/// The ordered element table, compiled once and immutable afterwards.
#[derive(Clone, Debug)]
pub struct Classifier {
    elements: Vec<CompiledElement>,
}

impl Classifier {
    /// Compile and validate an element table.
    ///
    /// Table order is preserved: it is the tie-break when several definitions match.
    pub fn new(definitions: Vec<ElementDefinition>) -> Result<Self, ConfigurationError> {
        let mut seen = BTreeSet::new();
        let mut elements = Vec::with_capacity(definitions.len());

        for (index, definition) in definitions.into_iter().enumerate() {
            if definition.element_type.trim().is_empty() {
                return Err(ConfigurationError::EmptyElementType { index });
            }
            if !seen.insert(definition.element_type.clone()) {
                return Err(ConfigurationError::DuplicateElementType {
                    element_type: definition.element_type,
                });
            }

            let element_type = definition.element_type.clone();
            let compiled = CompiledElement::compile(definition).map_err(|(pattern, reason)| {
                ConfigurationError::InvalidPattern {
                    element_type: element_type.clone(),
                    pattern,
                    reason,
                }
            })?;

            let declared = compiled.definition.capture_names.len();
            let wildcards = compiled.wildcards();
            if declared > wildcards {
                return Err(ConfigurationError::TooManyCaptures {
                    element_type,
                    declared,
                    wildcards,
                });
            }

            elements.push(compiled);
        }

        Ok(Self { elements })
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ElementDefinition> {
        self.elements.iter().map(|e| &e.definition)
    }

    pub fn definition(&self, element_type: &str) -> Option<&ElementDefinition> {
        self.definitions().find(|d| d.element_type == element_type)
    }

    /// Classify one path. Malformed paths are never classified.
    pub fn classify(&self, path: &str) -> Option<Element> {
        let segments = split_path(path).ok()?;
        self.elements.iter().find_map(|element| {
            element.match_segments(&segments).map(|captures| Element {
                element_type: element.definition.element_type.clone(),
                captures,
                file_path: path.to_string(),
            })
        })
    }
}

/// Classify `path` against an ordered definition table; the first match wins.
///
/// Invalid definitions are skipped here; use [`Classifier::new`] to reject them up front.
pub fn classify(path: &str, definitions: &[ElementDefinition]) -> Option<Element> {
    definitions.iter().find_map(|definition| {
        crate::pattern::match_path(path, definition).map(|captures| Element {
            element_type: definition.element_type.clone(),
            captures,
            file_path: path.to_string(),
        })
    })
}

/// Classification of a file set, computed once per run and keyed by path.
#[derive(Clone, Debug, Default)]
pub struct ClassifiedFiles {
    by_path: BTreeMap<String, Option<Element>>,
}

impl ClassifiedFiles {
    pub fn build<'a, I>(classifier: &Classifier, paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let by_path = paths
            .into_iter()
            .map(|p| (p.to_string(), classifier.classify(p)))
            .collect();
        Self { by_path }
    }

    /// `None` when the path was not part of the indexed set.
    pub fn get(&self, path: &str) -> Option<Option<&Element>> {
        self.by_path.get(path).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    pub fn classified_count(&self) -> usize {
        self.by_path.values().filter(|e| e.is_some()).count()
    }

    /// Unclassified paths, in sorted order.
    pub fn unclassified(&self) -> impl Iterator<Item = &str> {
        self.by_path
            .iter()
            .filter(|(_, e)| e.is_none())
            .map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Element>)> {
        self.by_path.iter().map(|(p, e)| (p.as_str(), e.as_ref()))
    }
}
