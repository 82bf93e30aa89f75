use crate::classify::ClassifiedFiles;
use crate::error::UnclassifiedFileError;
use crate::evaluate::DenyReason;
use crate::fingerprint::fingerprint_for_edge;
use crate::model::{Element, ImportEdge, ProjectModel};
use crate::pattern::split_path;
use crate::policy::{EffectiveConfig, FailOn, Scope, UnknownFiles};
use crate::report::{DomainReport, SeverityCounts};
use crate::violations::{ViolationReport, evaluate_all_par};
use boundguard_types::{BoundguardData, Finding, Location, RepoPath, Severity, Verdict, ids};
use serde_json::{Value, json};
use std::collections::BTreeSet;

/// Classify the project, evaluate every in-scope edge, and build the findings report.
///
/// Fails only in strict mode, when a project file or edge endpoint is unclassified.
pub fn check(
    model: &ProjectModel,
    cfg: &EffectiveConfig,
) -> Result<DomainReport, UnclassifiedFileError> {
    let policy = &cfg.policy;

    let mut paths: BTreeSet<&str> = model.files.iter().map(RepoPath::as_str).collect();
    paths.extend(
        model
            .edges
            .iter()
            .flat_map(|e| [e.importer.as_str(), e.imported.as_str()])
            .filter(|p| split_path(p).is_ok()),
    );
    let index = ClassifiedFiles::build(&policy.classifier, paths);

    if cfg.unknown_files.rejects_unclassified() {
        let unclassified: Vec<String> = index.unclassified().map(str::to_string).collect();
        if !unclassified.is_empty() {
            return Err(UnclassifiedFileError {
                paths: unclassified,
            });
        }
    }

    let edges = edges_in_scope(model, cfg.scope);
    let violations = evaluate_all_par(
        &edges,
        &policy.classifier,
        &policy.rules,
        cfg.unknown_files,
        Some(&index),
    )?;

    let mut findings: Vec<Finding> = Vec::new();
    edge_findings(cfg, &violations, &mut findings);
    if cfg.unknown_files == UnknownFiles::Report {
        unknown_file_findings(cfg, model, &index, &mut findings);
    }

    Ok(finish(
        findings,
        cfg,
        index.len() as u32,
        index.classified_count() as u32,
        edges.len() as u32,
    ))
}

fn finish(
    mut findings: Vec<Finding>,
    cfg: &EffectiveConfig,
    files_scanned: u32,
    files_classified: u32,
    edges_scanned: u32,
) -> DomainReport {
    // Deterministic ordering before truncation.
    findings.sort_by(compare_findings);

    let total = findings.len() as u32;
    // Verdict and counts cover every finding, including those truncated below.
    let verdict = compute_verdict(&findings, cfg.fail_on);
    let counts = SeverityCounts::from_findings(&findings);

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let data = BoundguardData {
        scope: scope_name(cfg.scope).to_string(),
        profile: cfg.profile.clone(),
        files_scanned,
        files_classified,
        edges_scanned,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
    }
}

fn scope_name(scope: Scope) -> &'static str {
    match scope {
        Scope::Repo => "repo",
        Scope::Diff => "diff",
    }
}

fn edges_in_scope(model: &ProjectModel, scope: Scope) -> Vec<ImportEdge> {
    match scope {
        Scope::Repo => model.edges.clone(),
        Scope::Diff => {
            let changed: BTreeSet<&str> =
                model.changed_files.iter().map(RepoPath::as_str).collect();
            model
                .edges
                .iter()
                .filter(|e| changed.contains(e.importer.as_str()))
                .cloned()
                .collect()
        }
    }
}

fn edge_findings(cfg: &EffectiveConfig, violations: &[ViolationReport], out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_BOUNDARIES_ELEMENT_TYPES) else {
        return;
    };

    for v in violations {
        let (code, message, help) = match v.reason {
            // Reported once per file below instead of once per edge.
            DenyReason::UnclassifiedFile => continue,
            DenyReason::MalformedPath => (
                ids::CODE_MALFORMED_PATH,
                format!(
                    "import '{}' -> '{}' was skipped: {}",
                    v.edge.importer,
                    v.edge.imported,
                    v.detail.as_deref().unwrap_or("malformed path")
                ),
                "Supply import edges with normalized, project-root-relative paths.".to_string(),
            ),
            DenyReason::NotInAllowList => (
                ids::CODE_NOT_IN_ALLOW_LIST,
                denial_message(v),
                denial_help(cfg, v),
            ),
        };

        let fingerprint = fingerprint_for_edge(
            ids::CHECK_BOUNDARIES_ELEMENT_TYPES,
            code,
            &v.edge.importer,
            Some(&v.edge.imported),
        );
        out.push(Finding {
            severity: policy.severity,
            check_id: ids::CHECK_BOUNDARIES_ELEMENT_TYPES.to_string(),
            code: code.to_string(),
            message,
            location: Some(Location {
                path: RepoPath::new(&v.edge.importer),
                line: v.edge.line,
                col: None,
            }),
            help: Some(help),
            url: None,
            fingerprint: Some(fingerprint),
            data: json!({
                "importer": v.edge.importer,
                "imported": v.edge.imported,
                "importer_element": element_json(v.importer_element.as_ref()),
                "imported_element": element_json(v.imported_element.as_ref()),
                "reason": v.reason.as_str(),
                "rule_index": v.rule_index,
            }),
        });
    }
}

fn denial_message(v: &ViolationReport) -> String {
    let kind = |e: Option<&Element>| {
        e.map(|e| e.element_type.clone())
            .unwrap_or_else(|| "unknown".to_string())
    };
    let importer = kind(v.importer_element.as_ref());
    let imported = kind(v.imported_element.as_ref());

    let mismatched: Vec<String> = match (&v.importer_element, &v.imported_element) {
        (Some(from), Some(to)) => to
            .captures
            .iter()
            .filter_map(|(name, value)| {
                let own = from.capture(name)?;
                (own != value.as_str()).then(|| format!("{name} '{own}' vs '{value}'"))
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut message = format!(
        "'{}' ({importer}) may not import '{}' ({imported})",
        v.edge.importer, v.edge.imported
    );
    if !mismatched.is_empty() {
        message.push_str(&format!(": {}", mismatched.join(", ")));
    }
    message
}

fn denial_help(cfg: &EffectiveConfig, v: &ViolationReport) -> String {
    let rule = v.rule_index.and_then(|i| cfg.policy.rules.rules.get(i));
    match rule {
        Some(rule) => match &rule.message {
            Some(custom) => custom.clone(),
            None => {
                let allowed: Vec<&str> =
                    rule.allow.iter().map(|a| a.element_type.as_str()).collect();
                format!(
                    "Rule #{} allows only: {}.",
                    v.rule_index.unwrap_or_default(),
                    if allowed.is_empty() {
                        "nothing".to_string()
                    } else {
                        allowed.join(", ")
                    }
                )
            }
        },
        None => "No rule names the importer's element type and the default policy is disallow."
            .to_string(),
    }
}

fn element_json(element: Option<&Element>) -> Value {
    match element {
        Some(e) => json!({ "type": e.element_type, "captures": e.captures }),
        None => Value::Null,
    }
}

/// In diff scope only changed files are reported.
fn unknown_file_findings(
    cfg: &EffectiveConfig,
    model: &ProjectModel,
    index: &ClassifiedFiles,
    out: &mut Vec<Finding>,
) {
    let Some(policy) = cfg.check_policy(ids::CHECK_BOUNDARIES_NO_UNKNOWN_FILES) else {
        return;
    };
    let changed: BTreeSet<&str> = model.changed_files.iter().map(RepoPath::as_str).collect();
    out.extend(
        index
            .unclassified()
            .filter(|path| cfg.scope == Scope::Repo || changed.contains(path))
            .map(|path| unclassified_finding(path, policy.severity)),
    );
}

fn unclassified_finding(path: &str, severity: Severity) -> Finding {
    let fingerprint = fingerprint_for_edge(
        ids::CHECK_BOUNDARIES_NO_UNKNOWN_FILES,
        ids::CODE_UNCLASSIFIED_FILE,
        path,
        None,
    );
    Finding {
        severity,
        check_id: ids::CHECK_BOUNDARIES_NO_UNKNOWN_FILES.to_string(),
        code: ids::CODE_UNCLASSIFIED_FILE.to_string(),
        message: format!("file '{path}' matches no element definition"),
        location: Some(Location {
            path: RepoPath::new(path),
            line: None,
            col: None,
        }),
        help: Some(
            "Add an element definition covering this file, move it, or ignore it.".to_string(),
        ),
        url: None,
        fingerprint: Some(fingerprint),
        data: json!({ "path": path }),
    }
}

/// Failing report for a run rejected in strict mode.
///
/// One error per unclassified path and no edge verdicts.
pub fn rejected_report(err: &UnclassifiedFileError, cfg: &EffectiveConfig) -> DomainReport {
    let findings: Vec<Finding> = err
        .paths
        .iter()
        .map(|p| unclassified_finding(p, Severity::Error))
        .collect();
    finish(findings, cfg, 0, 0, 0)
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) location.path (missing last)
    // 3) location.line (missing last)
    // 4) check_id
    // 5) code
    // 6) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let (ap, al) = match &a.location {
        Some(l) => (l.path.as_str(), l.line.unwrap_or(u32::MAX)),
        None => ("~", u32::MAX),
    };
    let (bp, bl) = match &b.location {
        Some(l) => (l.path.as_str(), l.line.unwrap_or(u32::MAX)),
        None => ("~", u32::MAX),
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then(ap.cmp(bp))
        .then(al.cmp(&bl))
        .then(a.check_id.cmp(&b.check_id))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}
