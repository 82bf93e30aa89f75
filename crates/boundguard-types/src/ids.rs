//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_BOUNDARIES_ELEMENT_TYPES: &str = "boundaries.element_types";
pub const CHECK_BOUNDARIES_NO_UNKNOWN_FILES: &str = "boundaries.no_unknown_files";

// Codes: boundaries.element_types
pub const CODE_NOT_IN_ALLOW_LIST: &str = "not_in_allow_list";
pub const CODE_MALFORMED_PATH: &str = "malformed_path";

// Codes: boundaries.no_unknown_files
pub const CODE_UNCLASSIFIED_FILE: &str = "unclassified_file";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
