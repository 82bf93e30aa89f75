use crate::classify::{ClassifiedFiles, Classifier};
use crate::error::{PathError, UnclassifiedFileError};
use crate::evaluate::{DenyReason, EdgeVerdict, decide};
use crate::model::{Element, ImportEdge};
use crate::pattern::split_path;
use crate::policy::{RuleTable, UnknownFiles};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// One denied edge, with enough context to render a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    pub edge: ImportEdge,
    pub importer_element: Option<Element>,
    pub imported_element: Option<Element>,
    pub reason: DenyReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
    /// Set when `reason` is [`DenyReason::MalformedPath`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Lazy, restartable sequence of violations over a batch of edges.
///
/// A clone continues from the same position; [`Violations::restart`] starts a fresh pass.
#[derive(Clone, Debug)]
pub struct Violations<'a> {
    edges: &'a [ImportEdge],
    classifier: &'a Classifier,
    rules: &'a RuleTable,
    unknown_files: UnknownFiles,
    index: Option<&'a ClassifiedFiles>,
    position: usize,
}

impl<'a> Violations<'a> {
    /// Use a precomputed classification index; paths missing from it are classified on demand.
    pub fn with_index(mut self, index: &'a ClassifiedFiles) -> Self {
        self.index = Some(index);
        self
    }

    pub fn restart(&self) -> Self {
        Self {
            position: 0,
            ..self.clone()
        }
    }
}

impl Iterator for Violations<'_> {
    type Item = ViolationReport;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(edge) = self.edges.get(self.position) {
            self.position += 1;
            let report = check_edge(
                edge,
                self.classifier,
                self.rules,
                self.unknown_files,
                self.index,
            );
            if report.is_some() {
                return report;
            }
        }
        None
    }
}

/// Collect every denied edge in `edges`, never stopping at the first one.
///
/// In [`UnknownFiles::Reject`] mode every endpoint is classified first and the call
/// fails before any verdict is produced if one of them is unclassified.
pub fn evaluate_all<'a>(
    edges: &'a [ImportEdge],
    classifier: &'a Classifier,
    rules: &'a RuleTable,
    unknown_files: UnknownFiles,
) -> Result<Violations<'a>, UnclassifiedFileError> {
    if unknown_files.rejects_unclassified() {
        reject_unclassified_endpoints(edges, classifier, None)?;
    }
    Ok(Violations {
        edges,
        classifier,
        rules,
        unknown_files,
        index: None,
        position: 0,
    })
}

/// Parallel [`evaluate_all`]; results keep the input edge order.
pub fn evaluate_all_par(
    edges: &[ImportEdge],
    classifier: &Classifier,
    rules: &RuleTable,
    unknown_files: UnknownFiles,
    index: Option<&ClassifiedFiles>,
) -> Result<Vec<ViolationReport>, UnclassifiedFileError> {
    if unknown_files.rejects_unclassified() {
        reject_unclassified_endpoints(edges, classifier, index)?;
    }
    Ok(edges
        .par_iter()
        .filter_map(|edge| check_edge(edge, classifier, rules, unknown_files, index))
        .collect())
}

fn reject_unclassified_endpoints(
    edges: &[ImportEdge],
    classifier: &Classifier,
    index: Option<&ClassifiedFiles>,
) -> Result<(), UnclassifiedFileError> {
    let paths: BTreeSet<&str> = edges
        .iter()
        .flat_map(|e| [e.importer.as_str(), e.imported.as_str()])
        .filter(|p| split_path(p).is_ok())
        .collect();

    let unclassified: Vec<String> = paths
        .into_iter()
        .filter(|p| lookup(p, classifier, index).is_none())
        .map(str::to_string)
        .collect();

    if unclassified.is_empty() {
        Ok(())
    } else {
        Err(UnclassifiedFileError {
            paths: unclassified,
        })
    }
}

fn lookup(
    path: &str,
    classifier: &Classifier,
    index: Option<&ClassifiedFiles>,
) -> Option<Element> {
    match index.and_then(|i| i.get(path)) {
        Some(cached) => cached.cloned(),
        None => classifier.classify(path),
    }
}

fn check_edge(
    edge: &ImportEdge,
    classifier: &Classifier,
    rules: &RuleTable,
    unknown_files: UnknownFiles,
    index: Option<&ClassifiedFiles>,
) -> Option<ViolationReport> {
    if let Err(err) = split_path(&edge.importer).and_then(|_| split_path(&edge.imported)) {
        return Some(malformed(edge, err));
    }

    let importer = lookup(&edge.importer, classifier, index);
    let imported = lookup(&edge.imported, classifier, index);

    match decide(importer.as_ref(), imported.as_ref(), rules, unknown_files) {
        EdgeVerdict::Allowed => None,
        EdgeVerdict::Denied(denial) => Some(ViolationReport {
            edge: edge.clone(),
            importer_element: denial.importer,
            imported_element: denial.imported,
            reason: denial.reason,
            rule_index: denial.rule_index,
            detail: None,
        }),
    }
}

fn malformed(edge: &ImportEdge, err: PathError) -> ViolationReport {
    ViolationReport {
        edge: edge.clone(),
        importer_element: None,
        imported_element: None,
        reason: DenyReason::MalformedPath,
        rule_index: None,
        detail: Some(err.to_string()),
    }
}
