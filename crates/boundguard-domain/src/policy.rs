use crate::classify::Classifier;
use crate::error::ConfigurationError;
use crate::model::Element;
use boundguard_types::Severity;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Repo,
    Diff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Verdict used when no rule's `from` names the importer's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultPolicy {
    Allow,
    Disallow,
}

/// What to do with files that match no element definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnknownFiles {
    /// Edges touching unknown files are not checked.
    Allow,
    /// Unknown files are reported as violations; the run continues.
    Report,
    /// Any unknown file aborts the run before edges are evaluated.
    Reject,
}

impl UnknownFiles {
    pub fn rejects_unclassified(self) -> bool {
        self == UnknownFiles::Reject
    }
}

/// Required value for one capture of the imported element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureRequirement {
    /// `${name}`: must equal the importer's own capture `name`.
    SameAs(String),
    /// Must equal this literal.
    Literal(String),
}

impl CaptureRequirement {
    /// Parse a constraint value: `${name}` is a back-reference, anything else a literal.
    pub fn parse(value: &str) -> Self {
        match value
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) if !name.is_empty() => CaptureRequirement::SameAs(name.to_string()),
            _ => CaptureRequirement::Literal(value.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowEntry {
    pub element_type: String,
    /// Imported capture name -> requirement.
    pub captures: BTreeMap<String, CaptureRequirement>,
}

impl AllowEntry {
    pub fn any(element_type: &str) -> Self {
        Self {
            element_type: element_type.to_string(),
            captures: BTreeMap::new(),
        }
    }

    /// Require `capture` to be equal on both sides of the import.
    pub fn same(element_type: &str, capture: &str) -> Self {
        let mut captures = BTreeMap::new();
        captures.insert(
            capture.to_string(),
            CaptureRequirement::SameAs(capture.to_string()),
        );
        Self {
            element_type: element_type.to_string(),
            captures,
        }
    }

    pub fn matches(&self, importer: &Element, imported: &Element) -> bool {
        if self.element_type != imported.element_type {
            return false;
        }
        self.captures.iter().all(|(name, requirement)| {
            let Some(actual) = imported.capture(name) else {
                return false;
            };
            match requirement {
                CaptureRequirement::SameAs(importer_name) => {
                    importer.capture(importer_name) == Some(actual)
                }
                CaptureRequirement::Literal(expected) => expected == actual,
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub from: Vec<String>,
    pub allow: Vec<AllowEntry>,
    /// Extra text shown with denials decided by this rule.
    pub message: Option<String>,
}

impl Rule {
    pub fn new(from: &[&str], allow: Vec<AllowEntry>) -> Self {
        Self {
            from: from.iter().map(|f| f.to_string()).collect(),
            allow,
            message: None,
        }
    }

    pub fn applies_to(&self, element_type: &str) -> bool {
        self.from.iter().any(|f| f == element_type)
    }
}

/// Ordered rules plus the fallback verdict. The first rule naming the importer wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    pub default_policy: DefaultPolicy,
    pub rules: Vec<Rule>,
}

impl RuleTable {
    /// Index and rule of the first rule whose `from` contains `element_type`.
    pub fn matching_rule(&self, element_type: &str) -> Option<(usize, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.applies_to(element_type))
    }

    /// Check every type and capture reference against the element table.
    pub fn validate(&self, classifier: &Classifier) -> Result<(), ConfigurationError> {
        for (rule_index, rule) in self.rules.iter().enumerate() {
            if rule.from.is_empty() {
                return Err(ConfigurationError::EmptyFrom { rule_index });
            }

            let mut from_defs = Vec::with_capacity(rule.from.len());
            for from in &rule.from {
                let def = classifier.definition(from).ok_or_else(|| {
                    ConfigurationError::UnknownElementType {
                        rule_index,
                        element_type: from.clone(),
                    }
                })?;
                from_defs.push(def);
            }

            for entry in &rule.allow {
                let target = classifier.definition(&entry.element_type).ok_or_else(|| {
                    ConfigurationError::UnknownElementType {
                        rule_index,
                        element_type: entry.element_type.clone(),
                    }
                })?;

                for (capture, requirement) in &entry.captures {
                    if !target.capture_names.contains(capture) {
                        return Err(ConfigurationError::UndeclaredCapture {
                            rule_index,
                            element_type: entry.element_type.clone(),
                            capture: capture.clone(),
                        });
                    }
                    if let CaptureRequirement::SameAs(name) = requirement
                        && let Some(from_def) =
                            from_defs.iter().find(|d| !d.capture_names.contains(name))
                    {
                        return Err(ConfigurationError::UndeclaredBackReference {
                            rule_index,
                            from_type: from_def.element_type.clone(),
                            capture: name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// A validated element table and rule table, loaded once per run.
#[derive(Clone, Debug)]
pub struct BoundaryPolicy {
    pub classifier: Classifier,
    pub rules: RuleTable,
}

impl BoundaryPolicy {
    pub fn new(
        elements: Vec<crate::model::ElementDefinition>,
        rules: RuleTable,
    ) -> Result<Self, ConfigurationError> {
        let classifier = Classifier::new(elements)?;
        rules.validate(&classifier)?;
        Ok(Self { classifier, rules })
    }
}

#[derive(Clone, Debug)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub severity: Severity,
}

impl CheckPolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub scope: Scope,
    pub fail_on: FailOn,
    pub max_findings: usize,
    pub unknown_files: UnknownFiles,
    pub policy: BoundaryPolicy,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }
}
