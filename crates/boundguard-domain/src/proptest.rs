//! Property-based tests for the domain crate.
//!
//! Invariants covered:
//! - classification is deterministic and honours table order
//! - edge verdicts do not depend on evaluation order
//! - the default policy decides edges no rule covers
//! - same-domain back-references hold for every generated domain pair

use crate::classify::Classifier;
use crate::engine::check;
use crate::evaluate::{EdgeVerdict, evaluate};
use crate::model::{ElementDefinition, ImportEdge};
use crate::policy::{DefaultPolicy, RuleTable, UnknownFiles};
use crate::test_support::{config, edge, project, vue_domain_elements, vue_domain_policy};
use crate::violations::evaluate_all;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_-]{0,11}").unwrap()
}

fn arb_layer() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "api", "store", "components", "router", "types", "views", "misc",
    ])
}

/// Paths under the Vue domain layout, plus a few that match nothing.
fn arb_project_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("src/main.ts".to_string()),
        Just("src/App.vue".to_string()),
        arb_segment().prop_map(|d| format!("src/domains/{d}/index.ts")),
        (arb_segment(), arb_layer(), arb_segment()).prop_map(|(d, layer, f)| {
            let ext = if matches!(layer, "components" | "views") {
                "vue"
            } else {
                "ts"
            };
            format!("src/domains/{d}/{layer}/{f}.{ext}")
        }),
        arb_segment().prop_map(|f| format!("src/shared/{f}.ts")),
        arb_segment().prop_map(|f| format!("src/core/http/{f}.ts")),
        (arb_segment(), arb_segment()).prop_map(|(a, b)| format!("src/{a}/{b}.ts")),
    ]
}

fn arb_edge() -> impl Strategy<Value = ImportEdge> {
    (arb_project_path(), arb_project_path()).prop_map(|(a, b)| ImportEdge::new(&a, &b))
}

fn verdicts(edges: &[ImportEdge], unknown_files: UnknownFiles) -> Vec<(ImportEdge, bool)> {
    let policy = vue_domain_policy();
    let mut out: Vec<(ImportEdge, bool)> = edges
        .iter()
        .map(|e| {
            let v = evaluate(e, &policy.classifier, &policy.rules, unknown_files)
                .expect("generated paths are well-formed");
            (e.clone(), v.is_allowed())
        })
        .collect();
    out.sort_by(|a, b| {
        (&a.0.importer, &a.0.imported, a.1).cmp(&(&b.0.importer, &b.0.imported, b.1))
    });
    out
}

// ============================================================================
// Classification
// ============================================================================

proptest! {
    #[test]
    fn classification_is_deterministic(path in arb_project_path()) {
        let classifier = Classifier::new(vue_domain_elements()).expect("valid");
        let first = classifier.classify(&path);
        let second = classifier.classify(&path);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn first_matching_definition_wins(file in arb_segment(), swap in any::<bool>()) {
        let broad = ElementDefinition::file("broad", None, "lib/**/*.ts");
        let narrow = ElementDefinition::file("narrow", None, "lib/*.ts");
        let (first, expected) = if swap {
            (vec![narrow.clone(), broad.clone()], "narrow")
        } else {
            (vec![broad, narrow], "broad")
        };
        let classifier = Classifier::new(first).expect("valid");
        let path = format!("lib/{file}.ts");
        let element = classifier.classify(&path).expect("both definitions match");
        prop_assert_eq!(element.element_type, expected);
    }

    #[test]
    fn domain_capture_is_the_directory_name(domain in arb_segment(), file in arb_segment()) {
        let classifier = Classifier::new(vue_domain_elements()).expect("valid");
        let path = format!("src/domains/{domain}/store/{file}.ts");
        let element = classifier.classify(&path).expect("store file");
        prop_assert_eq!(element.element_type.as_str(), "domain-store");
        prop_assert_eq!(element.capture("domainName"), Some(domain.as_str()));
        prop_assert_eq!(element.file_path, path);
    }
}

// ============================================================================
// Evaluation
// ============================================================================

proptest! {
    /// Verdicts are a pure function of the edge; shuffling the batch changes nothing.
    #[test]
    fn verdicts_ignore_evaluation_order(
        edges in prop::collection::vec(arb_edge(), 0..30),
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        use rand::seq::SliceRandom;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut shuffled = edges.clone();
        shuffled.shuffle(&mut rng);

        for mode in [UnknownFiles::Allow, UnknownFiles::Report] {
            prop_assert_eq!(verdicts(&edges, mode), verdicts(&shuffled, mode));
        }
    }

    /// The violation sequence reports exactly the denied edges, once each.
    #[test]
    fn violations_match_single_edge_verdicts(edges in prop::collection::vec(arb_edge(), 0..30)) {
        let policy = vue_domain_policy();
        let denied = edges
            .iter()
            .filter(|e| {
                !evaluate(e, &policy.classifier, &policy.rules, UnknownFiles::Report)
                    .expect("well-formed")
                    .is_allowed()
            })
            .count();
        let reported = evaluate_all(&edges, &policy.classifier, &policy.rules, UnknownFiles::Report)
            .expect("report mode")
            .count();
        prop_assert_eq!(denied, reported);
    }

    #[test]
    fn empty_rule_table_falls_back_to_default(e in arb_edge()) {
        let policy = vue_domain_policy();
        let classified = policy.classifier.classify(&e.importer).is_some()
            && policy.classifier.classify(&e.imported).is_some();
        prop_assume!(classified);

        let defaults = [(DefaultPolicy::Allow, true), (DefaultPolicy::Disallow, false)];
        for (default_policy, allowed) in defaults {
            let rules = RuleTable { default_policy, rules: Vec::new() };
            let verdict = evaluate(&e, &policy.classifier, &rules, UnknownFiles::Allow)
                .expect("well-formed");
            prop_assert_eq!(verdict.is_allowed(), allowed);
        }
    }

    /// A store may reach an api only inside its own domain.
    #[test]
    fn domain_back_reference_holds(a in arb_segment(), b in arb_segment(), f in arb_segment()) {
        let policy = vue_domain_policy();
        let e = edge(
            &format!("src/domains/{a}/store/{f}.ts"),
            &format!("src/domains/{b}/api/{f}.ts"),
        );
        let verdict = evaluate(&e, &policy.classifier, &policy.rules, UnknownFiles::Reject)
            .expect("well-formed");
        prop_assert_eq!(verdict == EdgeVerdict::Allowed, a == b);
    }

    /// Reports come out in the same order regardless of input edge order.
    #[test]
    fn report_is_order_independent(
        edges in prop::collection::vec(arb_edge(), 0..20),
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        use rand::seq::SliceRandom;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut shuffled = edges.clone();
        shuffled.shuffle(&mut rng);

        let cfg = config(UnknownFiles::Report);
        let a = check(&project(&[], edges), &cfg).expect("report mode");
        let b = check(&project(&[], shuffled), &cfg).expect("report mode");
        prop_assert_eq!(a.verdict, b.verdict);
        prop_assert_eq!(a.findings, b.findings);
    }
}
