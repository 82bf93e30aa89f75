use boundguard_domain::policy::{CheckPolicy, FailOn, Scope, UnknownFiles};
use boundguard_types::Severity;
use std::collections::BTreeMap;

/// Profile defaults, before the repo's element and rule tables are attached.
#[derive(Clone, Debug)]
pub struct Preset {
    pub profile: String,
    pub scope: Scope,
    pub fail_on: FailOn,
    pub max_findings: usize,
    pub unknown_files: UnknownFiles,
    pub checks: BTreeMap<String, CheckPolicy>,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Preset {
    match profile {
        "recommended" => recommended_profile(),
        "warn" => warn_profile(),
        // default
        _ => strict_profile(),
    }
}

pub fn known_profiles() -> &'static [&'static str] {
    &["strict", "recommended", "warn"]
}

fn strict_profile() -> Preset {
    Preset {
        profile: "strict".to_string(),
        scope: Scope::Repo,
        fail_on: FailOn::Error,
        max_findings: 200,
        unknown_files: UnknownFiles::Reject,
        checks: default_checks(Severity::Error, Severity::Error),
    }
}

fn recommended_profile() -> Preset {
    // Boundary violations fail; stray files are surfaced without failing the run.
    Preset {
        profile: "recommended".to_string(),
        scope: Scope::Repo,
        fail_on: FailOn::Error,
        max_findings: 200,
        unknown_files: UnknownFiles::Report,
        checks: default_checks(Severity::Error, Severity::Warning),
    }
}

fn warn_profile() -> Preset {
    Preset {
        profile: "warn".to_string(),
        scope: Scope::Repo,
        fail_on: FailOn::Error,
        max_findings: 200,
        unknown_files: UnknownFiles::Report,
        checks: default_checks(Severity::Warning, Severity::Warning),
    }
}

fn default_checks(boundaries: Severity, unknown: Severity) -> BTreeMap<String, CheckPolicy> {
    use boundguard_types::ids::*;
    let mut m = BTreeMap::new();

    m.insert(
        CHECK_BOUNDARIES_ELEMENT_TYPES.to_string(),
        CheckPolicy::enabled(boundaries),
    );
    m.insert(
        CHECK_BOUNDARIES_NO_UNKNOWN_FILES.to_string(),
        CheckPolicy::enabled(unknown),
    );

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_falls_back_to_strict() {
        let p = preset("nonsense");
        assert_eq!(p.profile, "strict");
        assert_eq!(p.unknown_files, UnknownFiles::Reject);
    }

    #[test]
    fn every_known_profile_resolves_to_itself() {
        for name in known_profiles() {
            assert_eq!(preset(name).profile, *name);
        }
    }
}
