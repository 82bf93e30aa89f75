//! Pure boundary policy evaluation (no IO).
//!
//! Input: element definitions, a rule table, and a project model (files + import edges)
//! constructed elsewhere.
//! Output: per-edge verdicts, violation reports, and a findings report.

#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod pattern;
pub mod policy;
pub mod report;
pub mod violations;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use classify::{ClassifiedFiles, Classifier, classify};
pub use engine::{check, rejected_report};
pub use error::{ConfigurationError, PathError, UnclassifiedFileError};
pub use evaluate::{Denial, DenyReason, EdgeVerdict, evaluate};
pub use pattern::match_path;
pub use violations::{ViolationReport, Violations, evaluate_all, evaluate_all_par};
