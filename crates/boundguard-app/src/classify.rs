//! The `classify` use case: show which element each project file belongs to.

use crate::config::{ConfigFormat, load_config};
use anyhow::Context;
use boundguard_domain::ClassifiedFiles;
use boundguard_domain::model::Element;
use boundguard_repo::FileFilter;
use boundguard_settings::Overrides;
use camino::Utf8Path;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct ClassifyInput<'a> {
    pub repo_root: &'a Utf8Path,
    pub config_text: &'a str,
    pub config_format: ConfigFormat,
    pub overrides: Overrides,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedEntry {
    pub path: String,
    /// `None` when the file matches no element definition.
    pub element: Option<Element>,
}

/// Discover project files and classify each one, in path order.
pub fn run_classify(input: ClassifyInput<'_>) -> anyhow::Result<Vec<ClassifiedEntry>> {
    let resolved = load_config(input.config_text, input.config_format, input.overrides)?;
    let filter = FileFilter::new(&resolved.include, &resolved.ignore)?;
    let files = boundguard_repo::discover_files(input.repo_root, &filter)
        .context("discover project files")?;

    let index = ClassifiedFiles::build(
        &resolved.effective.policy.classifier,
        files.iter().map(|p| p.as_str()),
    );
    debug!(
        files = index.len(),
        classified = index.classified_count(),
        "classified project files"
    );

    Ok(index
        .iter()
        .map(|(path, element)| ClassifiedEntry {
            path: path.to_string(),
            element: element.cloned(),
        })
        .collect())
}

/// Text output is one `path  type  key=value ...` line per file; JSON is an array of entries.
pub fn format_classification(entries: &[ClassifiedEntry], json: bool) -> anyhow::Result<String> {
    if json {
        let mut out =
            serde_json::to_string_pretty(entries).context("serialize classification")?;
        out.push('\n');
        return Ok(out);
    }

    let width = entries.iter().map(|e| e.path.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let label = match &entry.element {
            Some(element) => {
                let mut label = element.element_type.clone();
                for (name, value) in &element.captures {
                    label.push_str(&format!(" {name}={value}"));
                }
                label
            }
            None => "(unclassified)".to_string(),
        };
        out.push_str(&format!("{:<width$}  {label}\n", entry.path));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    const CONFIG: &str = r#"
[[elements]]
type = "domain-store"
basePattern = "src/domains"
pattern = "*/store/*.ts"
capture = ["domainName"]
"#;

    #[test]
    fn classifies_discovered_files() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        for f in ["src/domains/billing/store/account.ts", "src/random/misc.ts"] {
            let p = root.join(f);
            std::fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
            std::fs::write(&p, "").expect("write file");
        }

        let entries = run_classify(ClassifyInput {
            repo_root: &root,
            config_text: CONFIG,
            config_format: ConfigFormat::Toml,
            overrides: Overrides::default(),
        })
        .expect("classify");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "src/domains/billing/store/account.ts");
        let element = entries[0].element.as_ref().expect("classified");
        assert_eq!(element.capture("domainName"), Some("billing"));
        assert!(entries[1].element.is_none());

        let text = format_classification(&entries, false).expect("text");
        assert!(text.contains("domain-store domainName=billing"));
        assert!(text.contains("src/random/misc.ts"));
        assert!(text.contains("(unclassified)"));

        let json = format_classification(&entries, true).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value[0]["element"]["type"], "domain-store");
        assert!(value[1]["element"].is_null());
    }
}
