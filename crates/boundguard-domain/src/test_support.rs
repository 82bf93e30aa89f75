use crate::model::{ElementDefinition, ImportEdge, ProjectModel};
use crate::policy::{
    AllowEntry, BoundaryPolicy, CheckPolicy, DefaultPolicy, EffectiveConfig, FailOn, Rule,
    RuleTable, Scope, UnknownFiles,
};
use boundguard_types::{RepoPath, Severity, ids};
use std::collections::BTreeMap;

/// Element table of a Vue app split into `src/domains/<domainName>/<layer>`.
pub fn vue_domain_elements() -> Vec<ElementDefinition> {
    let domain = |element_type: &str, pattern: &str| {
        ElementDefinition::file(element_type, Some("src/domains"), pattern)
            .with_captures(&["domainName"])
    };
    vec![
        ElementDefinition::full("main", "src/main.ts"),
        ElementDefinition::full("app-vue", "src/App.vue"),
        domain("domain-index", "*/index.ts"),
        domain("domain-api", "*/api/**/*.ts"),
        domain("domain-store", "*/store/*.ts"),
        domain("domain-components", "*/components/**/*.vue"),
        domain("domain-router", "*/router/*.ts"),
        domain("domain-types", "*/types/*.ts"),
        domain("domain-views", "*/views/*.vue"),
        ElementDefinition::file("shared", None, "src/shared/**/*.ts"),
        ElementDefinition::file("core-http", None, "src/core/http/*.ts"),
    ]
}

/// Layer rules: views -> components -> store -> api -> types, scoped to one domain.
pub fn vue_domain_rules() -> RuleTable {
    let same = |t: &str| AllowEntry::same(t, "domainName");
    RuleTable {
        default_policy: DefaultPolicy::Disallow,
        rules: vec![
            Rule::new(&["main"], vec![AllowEntry::any("app-vue")]),
            Rule::new(
                &["app-vue"],
                vec![AllowEntry::any("domain-index"), AllowEntry::any("shared")],
            ),
            Rule::new(
                &["domain-index"],
                vec![
                    same("domain-api"),
                    same("domain-store"),
                    same("domain-components"),
                    same("domain-router"),
                    same("domain-types"),
                    same("domain-views"),
                ],
            ),
            Rule::new(
                &["domain-api"],
                vec![
                    same("domain-types"),
                    AllowEntry::any("core-http"),
                    AllowEntry::any("domain-index"),
                ],
            ),
            Rule::new(
                &["domain-store"],
                vec![
                    same("domain-types"),
                    same("domain-api"),
                    AllowEntry::any("domain-index"),
                ],
            ),
            Rule::new(
                &["domain-components"],
                vec![
                    same("domain-types"),
                    same("domain-api"),
                    same("domain-store"),
                    same("domain-components"),
                    AllowEntry::any("domain-index"),
                    AllowEntry::any("shared"),
                ],
            ),
            Rule::new(
                &["domain-views"],
                vec![
                    same("domain-types"),
                    same("domain-api"),
                    same("domain-store"),
                    same("domain-components"),
                    same("domain-router"),
                    AllowEntry::any("domain-index"),
                ],
            ),
            Rule::new(
                &["domain-router"],
                vec![same("domain-types"), same("domain-views")],
            ),
        ],
    }
}

pub fn vue_domain_policy() -> BoundaryPolicy {
    BoundaryPolicy::new(vue_domain_elements(), vue_domain_rules()).expect("reference policy")
}

pub fn config(unknown_files: UnknownFiles) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(
        ids::CHECK_BOUNDARIES_ELEMENT_TYPES.to_string(),
        CheckPolicy::enabled(Severity::Error),
    );
    checks.insert(
        ids::CHECK_BOUNDARIES_NO_UNKNOWN_FILES.to_string(),
        CheckPolicy::enabled(Severity::Error),
    );
    EffectiveConfig {
        profile: "test".to_string(),
        scope: Scope::Repo,
        fail_on: FailOn::Error,
        max_findings: 200,
        unknown_files,
        policy: vue_domain_policy(),
        checks,
    }
}

pub fn edge(importer: &str, imported: &str) -> ImportEdge {
    ImportEdge::new(importer, imported)
}

pub fn project(files: &[&str], edges: Vec<ImportEdge>) -> ProjectModel {
    ProjectModel {
        files: files.iter().map(RepoPath::new).collect(),
        edges,
        changed_files: Vec::new(),
    }
}
