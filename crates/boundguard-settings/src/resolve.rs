use crate::model::{AllowEntryConfig, BoundguardConfigV1, ElementConfig, RuleConfig};
use crate::presets;
use anyhow::Context;
use boundguard_domain::model::{ElementDefinition, MatchMode};
use boundguard_domain::policy::{
    AllowEntry, BoundaryPolicy, CaptureRequirement, CheckPolicy, DefaultPolicy, EffectiveConfig,
    FailOn, Rule, RuleTable, Scope, UnknownFiles,
};
use boundguard_types::Severity;
use globset::Glob;

pub const DEFAULT_INCLUDE: &str = "src/**/*.*";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub scope: Option<String>,
    pub max_findings: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Validated include globs; never empty.
    pub include: Vec<String>,
    /// Validated ignore globs.
    pub ignore: Vec<String>,
}

pub fn resolve_config(
    cfg: BoundguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut preset = presets::preset(&profile);

    // Scope
    if let Some(scope_s) = overrides.scope.clone().or(cfg.scope.clone()) {
        preset.scope = parse_scope(&scope_s)?;
    }

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        preset.max_findings = mf as usize;
    }

    if let Some(unknown) = cfg.unknown_files.as_deref() {
        preset.unknown_files = parse_unknown_files(unknown)?;
    }

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        let entry = preset
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        preset.fail_on = parse_fail_on(fail_on_s)?;
    }

    let default_policy = match cfg.default.as_deref() {
        Some(v) => parse_default_policy(v)?,
        None => DefaultPolicy::Disallow,
    };

    let elements = cfg
        .elements
        .iter()
        .enumerate()
        .map(|(i, e)| element_definition(e).with_context(|| format!("invalid element #{i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let rules = RuleTable {
        default_policy,
        rules: cfg.rules.iter().map(rule).collect(),
    };
    let policy = BoundaryPolicy::new(elements, rules).context("invalid boundary policy")?;

    let include = if cfg.include.is_empty() {
        vec![DEFAULT_INCLUDE.to_string()]
    } else {
        cfg.include
    };
    validate_globs("include", &include)?;
    validate_globs("ignore", &cfg.ignore)?;

    Ok(ResolvedConfig {
        effective: EffectiveConfig {
            profile: preset.profile,
            scope: preset.scope,
            fail_on: preset.fail_on,
            max_findings: preset.max_findings,
            unknown_files: preset.unknown_files,
            policy,
            checks: preset.checks,
        },
        include,
        ignore: cfg.ignore,
    })
}

fn element_definition(cfg: &ElementConfig) -> anyhow::Result<ElementDefinition> {
    let mode = match cfg.mode.as_deref() {
        None | Some("file") => MatchMode::File,
        Some("full") => MatchMode::Full,
        Some(other) => anyhow::bail!(
            "unsupported mode '{other}' for element '{}' (expected 'file' or 'full')",
            cfg.element_type
        ),
    };
    Ok(ElementDefinition {
        element_type: cfg.element_type.clone(),
        base_pattern: cfg.base_pattern.clone(),
        pattern: cfg.pattern.clone(),
        mode,
        capture_names: cfg.capture.clone(),
    })
}

fn rule(cfg: &RuleConfig) -> Rule {
    Rule {
        from: cfg.from.clone(),
        allow: cfg.allow.iter().map(allow_entry).collect(),
        message: cfg.message.clone(),
    }
}

fn allow_entry(cfg: &AllowEntryConfig) -> AllowEntry {
    match cfg {
        AllowEntryConfig::Type(t) => AllowEntry::any(t),
        AllowEntryConfig::Constrained(t, captures) => AllowEntry {
            element_type: t.clone(),
            captures: captures
                .iter()
                .map(|(name, value)| (name.clone(), CaptureRequirement::parse(value)))
                .collect(),
        },
    }
}

fn validate_globs(field: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid {field} glob: {pattern}"))?;
    }
    Ok(())
}

fn parse_scope(v: &str) -> anyhow::Result<Scope> {
    match v {
        "repo" => Ok(Scope::Repo),
        "diff" => Ok(Scope::Diff),
        other => anyhow::bail!("unknown scope: {other} (expected 'repo' or 'diff')"),
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}

fn parse_default_policy(v: &str) -> anyhow::Result<DefaultPolicy> {
    match v {
        "allow" => Ok(DefaultPolicy::Allow),
        "disallow" => Ok(DefaultPolicy::Disallow),
        other => anyhow::bail!("unknown default policy: {other} (expected allow|disallow)"),
    }
}

fn parse_unknown_files(v: &str) -> anyhow::Result<UnknownFiles> {
    match v {
        "allow" => Ok(UnknownFiles::Allow),
        "report" => Ok(UnknownFiles::Report),
        "reject" => Ok(UnknownFiles::Reject),
        other => anyhow::bail!("unknown unknown_files: {other} (expected allow|report|reject)"),
    }
}
