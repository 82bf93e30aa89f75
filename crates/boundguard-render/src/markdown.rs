use crate::{RenderableFinding, RenderableReport, RenderableSeverity, RenderableVerdictStatus};
use std::collections::BTreeMap;

/// Render a PR-comment friendly summary: verdict, run statistics, then findings grouped by check.
pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Boundguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!("**Verdict: {verdict}**"));
    if !report.data.profile.is_empty() {
        out.push_str(&format!(" · profile `{}`", report.data.profile));
    }
    if !report.data.scope.is_empty() {
        out.push_str(&format!(" · scope `{}`", report.data.scope));
    }
    out.push_str("\n\n");

    let d = &report.data;
    out.push_str("| files | classified | edges | findings |\n");
    out.push_str("|---:|---:|---:|---:|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} / {} |\n\n",
        d.files_scanned, d.files_classified, d.edges_scanned, d.findings_emitted, d.findings_total
    ));

    if let Some(r) = &d.truncated_reason {
        out.push_str(&format!("> Note: {r}\n\n"));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    let mut by_check: BTreeMap<&str, Vec<&RenderableFinding>> = BTreeMap::new();
    for f in &report.findings {
        by_check.entry(f.check_id.as_str()).or_default().push(f);
    }

    for (check_id, findings) in by_check {
        out.push_str(&format!("## `{check_id}` ({})\n\n", findings.len()));
        for f in findings {
            let sev = match f.severity {
                RenderableSeverity::Info => "INFO",
                RenderableSeverity::Warning => "WARN",
                RenderableSeverity::Error => "ERROR",
            };
            match &f.location {
                Some(loc) => out.push_str(&format!(
                    "- [{sev}] `{}` {}: {}\n",
                    loc.display(),
                    f.code,
                    f.message
                )),
                None => out.push_str(&format!("- [{sev}] {}: {}\n", f.code, f.message)),
            }
            if let Some(help) = &f.help {
                out.push_str(&format!("  - help: {help}\n"));
            }
            if let Some(url) = &f.url {
                out.push_str(&format!("  - url: {url}\n"));
            }
        }
        out.push('\n');
    }

    out
}
