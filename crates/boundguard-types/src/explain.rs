//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Code or config that would trigger a finding.
    pub before: &'static str,
    /// Code or config that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_BOUNDARIES_ELEMENT_TYPES => Some(explain_element_types()),
        ids::CHECK_BOUNDARIES_NO_UNKNOWN_FILES => Some(explain_no_unknown_files()),

        // Codes
        ids::CODE_NOT_IN_ALLOW_LIST => Some(explain_not_in_allow_list()),
        ids::CODE_MALFORMED_PATH => Some(explain_malformed_path()),
        ids::CODE_UNCLASSIFIED_FILE => Some(explain_unclassified_file()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_BOUNDARIES_ELEMENT_TYPES,
        ids::CHECK_BOUNDARIES_NO_UNKNOWN_FILES,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_NOT_IN_ALLOW_LIST,
        ids::CODE_MALFORMED_PATH,
        ids::CODE_UNCLASSIFIED_FILE,
    ]
}

// --- Check-level explanations ---

fn explain_element_types() -> Explanation {
    Explanation {
        title: "Element Type Boundaries",
        description: "\
Checks every import edge against the rule table.

Each file is classified into an element type (for example `domain-store` or
`domain-api`) by the first matching element pattern. The first rule whose
`from` list names the importer's type decides which element types it may
import. Allow entries may also require that a captured path variable, such as
`domainName`, is equal on both sides of the import.

When no rule names the importer's type, the configured `default` policy applies.",
        remediation: "\
Move the import to a layer that is allowed to depend on the target, or expose
the needed symbol through the target domain's `index.ts`. If the dependency is
intended, add the target type to the importer's `allow` list.",
        examples: ExamplePair {
            before: r#"// src/domains/billing/api/account.ts
import { useAccountStore } from "../store/account";"#,
            after: r#"// src/domains/billing/store/account.ts
import { fetchAccount } from "../api/account";"#,
        },
    }
}

fn explain_no_unknown_files() -> Explanation {
    Explanation {
        title: "No Unknown Files",
        description: "\
Detects project files that match no element definition.

Unclassified files sit outside the layering policy, so imports into or out of
them cannot be checked. With `unknown_files = \"reject\"` the whole run fails
before any import is evaluated; with `\"report\"` each file becomes a finding.",
        remediation: "\
Move the file under a directory covered by an element pattern, add an element
definition for it, or add it to `ignore`.",
        examples: ExamplePair {
            before: r#"src/random/misc.ts"#,
            after: r#"src/shared/misc.ts"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_not_in_allow_list() -> Explanation {
    Explanation {
        title: "Import Not In Allow List",
        description: "\
The importer's matching rule does not allow the imported element.

This also covers imports across domains: an element in domain `billing` may
only import elements whose own `domainName` capture is also `billing` when the
allow entry carries `{ domainName = \"${domainName}\" }`.",
        remediation: "\
Import from the same domain, go through the other domain's `index.ts`, or
change the rule table if the dependency direction is intended.",
        examples: ExamplePair {
            before: r#"// src/domains/billing/store/account.ts
import { fetchOrder } from "../../shipping/api/order";"#,
            after: r#"// src/domains/billing/store/account.ts
import { fetchOrder } from "@/domains/shipping";"#,
        },
    }
}

fn explain_malformed_path() -> Explanation {
    Explanation {
        title: "Malformed Path",
        description: "\
An import edge carried a path that is not a normalized, forward-slash,
project-root-relative path (empty, absolute, containing backslashes, or
containing empty, `.` or `..` segments). The edge is skipped; the rest of the
batch is still evaluated.",
        remediation: "\
Fix the tool that produced the import graph so it emits paths relative to the
project root.",
        examples: ExamplePair {
            before: r#"/home/dev/app/src/main.ts -> ./src/App.vue"#,
            after: r#"src/main.ts -> src/App.vue"#,
        },
    }
}

fn explain_unclassified_file() -> Explanation {
    Explanation {
        title: "Unclassified File",
        description: "\
A project file matched none of the element definitions.",
        remediation: "\
Add an element definition covering the file, move it, or ignore it.",
        examples: ExamplePair {
            before: r#"[[elements]]
type = "shared"
mode = "file"
pattern = "src/shared/**/*.ts""#,
            after: r#"[[elements]]
type = "shared"
mode = "file"
pattern = "src/shared/**/*.ts"

[[elements]]
type = "misc"
mode = "file"
pattern = "src/random/*.ts""#,
        },
    }
}
