use anyhow::Context;
use boundguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use boundguard_types::{
    BoundguardData, BoundguardReport, Finding, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<BoundguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: '{schema}' (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse boundguard report")
}

pub fn serialize_report(report: &BoundguardReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn to_renderable(report: &BoundguardReport) -> RenderableReport {
    let d = &report.data;
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            profile: d.profile.clone(),
            scope: d.scope.clone(),
            files_scanned: d.files_scanned,
            files_classified: d.files_classified,
            edges_scanned: d.edges_scanned,
            findings_emitted: d.findings_emitted,
            findings_total: d.findings_total,
            truncated_reason: d.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
        }),
        help: f.help.clone(),
        url: f.url.clone(),
    }
}

fn envelope(verdict: Verdict, findings: Vec<Finding>, data: BoundguardData) -> BoundguardReport {
    let now = OffsetDateTime::now_utc();
    BoundguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "boundguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict,
        findings,
        data,
    }
}

/// A failing report carrying one `tool.runtime` finding, written when the check itself errors.
pub fn runtime_error_report(message: &str) -> BoundguardReport {
    envelope(
        Verdict::Fail,
        vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: None,
            help: Some("Fix the tool error and re-run boundguard.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        BoundguardData {
            scope: "repo".to_string(),
            profile: "unknown".to_string(),
            findings_total: 1,
            findings_emitted: 1,
            ..BoundguardData::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_survives_serialization() {
        let report = runtime_error_report("graph file missing");
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.ends_with("}\n"));

        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed.verdict, Verdict::Fail);
        assert_eq!(parsed.findings[0].check_id, ids::CHECK_TOOL_RUNTIME);
        assert_eq!(parsed.findings[0].message, "graph file missing");
    }

    #[test]
    fn foreign_schema_is_rejected() {
        let err = parse_report_json(r#"{ "schema": "otherlint.report.v1" }"#).unwrap_err();
        assert!(err.to_string().contains("unknown report schema"));
        assert!(parse_report_json("not json").is_err());
    }

    #[test]
    fn renderable_keeps_run_statistics() {
        let mut report = envelope(
            Verdict::Pass,
            Vec::new(),
            BoundguardData {
                scope: "diff".to_string(),
                profile: "recommended".to_string(),
                ..BoundguardData::default()
            },
        );
        report.data.files_scanned = 7;
        report.data.edges_scanned = 12;

        let r = to_renderable(&report);
        assert_eq!(r.verdict, RenderableVerdictStatus::Pass);
        assert_eq!(r.data.scope, "diff");
        assert_eq!(r.data.profile, "recommended");
        assert_eq!(r.data.files_scanned, 7);
        assert_eq!(r.data.edges_scanned, 12);
        assert!(r.findings.is_empty());
    }
}
