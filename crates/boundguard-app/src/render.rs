//! Render use cases: markdown and GitHub annotations from in-memory reports.

use boundguard_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    boundguard_render::render_markdown(report)
}

/// At most `max` annotation lines; GitHub drops annotations beyond a per-step limit anyway.
pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    boundguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boundguard_render::{
        RenderableData, RenderableFinding, RenderableSeverity, RenderableVerdictStatus,
    };

    fn sample_report() -> RenderableReport {
        let finding = |code: &str| RenderableFinding {
            severity: RenderableSeverity::Warning,
            check_id: "boundaries.no_unknown_files".to_string(),
            code: code.to_string(),
            message: "stray file".to_string(),
            location: None,
            help: None,
            url: None,
        };
        RenderableReport {
            verdict: RenderableVerdictStatus::Warn,
            findings: vec![finding("unclassified_file"), finding("unclassified_file")],
            data: RenderableData {
                findings_emitted: 2,
                findings_total: 2,
                ..RenderableData::default()
            },
        }
    }

    #[test]
    fn render_annotations_respects_max() {
        let report = sample_report();
        assert_eq!(render_annotations(&report, 1).len(), 1);
        assert_eq!(render_annotations(&report, 10).len(), 2);
    }

    #[test]
    fn render_markdown_smoke() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("**Verdict: WARN**"));
    }
}
