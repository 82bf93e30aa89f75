//! The `check` use case: evaluate the boundary policy and produce a report.

use crate::config::{ConfigFormat, load_config};
use anyhow::Context;
use boundguard_domain::policy::Scope as DomainScope;
use boundguard_domain::report::DomainReport;
use boundguard_repo::{FileFilter, ScopeInput};
use boundguard_settings::{Overrides, ResolvedConfig};
use boundguard_types::{
    BoundguardReport, RepoPath, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict,
};
use camino::Utf8Path;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Repository root path.
    pub repo_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub config_format: ConfigFormat,
    /// Import graph file (JSON or `importer -> imported` text).
    pub graph_path: &'a Utf8Path,
    /// CLI overrides.
    pub overrides: Overrides,
    /// For diff scope: list of changed files (relative to repo root).
    pub changed_files: Option<Vec<RepoPath>>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: BoundguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, load the import graph, evaluate policy, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let resolved = load_config(input.config_text, input.config_format, input.overrides.clone())?;
    let effective = &resolved.effective;
    debug!(
        profile = %effective.profile,
        elements = effective.policy.classifier.definitions().count(),
        rules = effective.policy.rules.rules.len(),
        "resolved config"
    );

    let scope_input = match effective.scope {
        DomainScope::Repo => ScopeInput::Repo,
        DomainScope::Diff => {
            let changed_files = input
                .changed_files
                .clone()
                .context("diff scope requires changed_files")?;
            ScopeInput::Diff { changed_files }
        }
    };

    let graph =
        boundguard_repo::load_import_graph(input.graph_path).context("load import graph")?;
    let graph_edges = graph.edges.len();

    let filter = FileFilter::new(&resolved.include, &resolved.ignore)?;
    let model = boundguard_repo::build_project_model(input.repo_root, graph, &filter, scope_input)
        .context("build project model")?;
    debug!(
        files = model.files.len(),
        edges = model.edges.len(),
        dropped_edges = graph_edges - model.edges.len(),
        "built project model"
    );

    let domain_report = match boundguard_domain::check(&model, effective) {
        Ok(report) => report,
        Err(err) => {
            warn!(unclassified = err.paths.len(), "strict mode rejected unclassified files");
            boundguard_domain::rejected_report(&err, effective)
        }
    };
    let DomainReport {
        verdict,
        findings,
        data,
        counts,
    } = domain_report;
    info!(
        verdict = ?verdict,
        errors = counts.error,
        warnings = counts.warning,
        edges = data.edges_scanned,
        "check finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "boundguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        findings,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
