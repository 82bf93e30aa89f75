use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `boundguard.toml` schema v1.
///
/// User-facing and permissive: enum-like fields stay strings here and are checked during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundguardConfigV1 {
    /// Optional schema string for tooling (`boundguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default), `recommended`, or `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Verdict when no rule names the importer's type: `allow` or `disallow` (default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// `allow`, `report`, or `reject`. Defaults come from the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_files: Option<String>,

    /// Globs selecting project files. Empty means `src/**/*.*`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Globs removed from the project file set and from edge endpoints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Element definitions, tried in order.
    #[serde(default)]
    pub elements: Vec<ElementConfig>,

    /// Dependency rules, first matching `from` wins.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementConfig {
    #[serde(rename = "type")]
    pub element_type: String,

    /// `file` (default) or `full`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(
        default,
        alias = "basePattern",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_pattern: Option<String>,

    pub pattern: String,

    /// Names for the first wildcards of `base_pattern` + `pattern`, left to right.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capture: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    pub from: Vec<String>,

    #[serde(default)]
    pub allow: Vec<AllowEntryConfig>,

    /// Shown as help text on denials this rule decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `"type"` or `["type", { capture = "${capture}" }]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AllowEntryConfig {
    Type(String),
    Constrained(String, BTreeMap<String, String>),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
