use crate::classify::Classifier;
use crate::error::PathError;
use crate::model::{Element, ImportEdge};
use crate::pattern::split_path;
use crate::policy::{DefaultPolicy, RuleTable, UnknownFiles};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenyReason {
    NotInAllowList,
    UnclassifiedFile,
    MalformedPath,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::NotInAllowList => "not-in-allow-list",
            DenyReason::UnclassifiedFile => "unclassified-file",
            DenyReason::MalformedPath => "malformed-path",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenyReason,
    pub importer: Option<Element>,
    pub imported: Option<Element>,
    /// Index of the rule that decided the denial; `None` when the default policy did.
    pub rule_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeVerdict {
    Allowed,
    Denied(Denial),
}

impl EdgeVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EdgeVerdict::Allowed)
    }
}

/// Decide whether `edge` is allowed.
///
/// A pure function of its inputs: the only failure is a malformed path on either side.
pub fn evaluate(
    edge: &ImportEdge,
    classifier: &Classifier,
    rules: &RuleTable,
    unknown_files: UnknownFiles,
) -> Result<EdgeVerdict, PathError> {
    split_path(&edge.importer)?;
    split_path(&edge.imported)?;

    let importer = classifier.classify(&edge.importer);
    let imported = classifier.classify(&edge.imported);
    Ok(decide(importer.as_ref(), imported.as_ref(), rules, unknown_files))
}

/// Verdict for an edge whose endpoints are already classified.
pub(crate) fn decide(
    importer: Option<&Element>,
    imported: Option<&Element>,
    rules: &RuleTable,
    unknown_files: UnknownFiles,
) -> EdgeVerdict {
    let (Some(importer), Some(imported)) = (importer, imported) else {
        return match unknown_files {
            UnknownFiles::Allow => EdgeVerdict::Allowed,
            UnknownFiles::Report | UnknownFiles::Reject => EdgeVerdict::Denied(Denial {
                reason: DenyReason::UnclassifiedFile,
                importer: importer.cloned(),
                imported: imported.cloned(),
                rule_index: None,
            }),
        };
    };

    let Some((rule_index, rule)) = rules.matching_rule(&importer.element_type) else {
        return match rules.default_policy {
            DefaultPolicy::Allow => EdgeVerdict::Allowed,
            DefaultPolicy::Disallow => EdgeVerdict::Denied(Denial {
                reason: DenyReason::NotInAllowList,
                importer: Some(importer.clone()),
                imported: Some(imported.clone()),
                rule_index: None,
            }),
        };
    };

    if rule.allow.iter().any(|entry| entry.matches(importer, imported)) {
        EdgeVerdict::Allowed
    } else {
        EdgeVerdict::Denied(Denial {
            reason: DenyReason::NotInAllowList,
            importer: Some(importer.clone()),
            imported: Some(imported.clone()),
            rule_index: Some(rule_index),
        })
    }
}
