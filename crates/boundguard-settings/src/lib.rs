//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{AllowEntryConfig, BoundguardConfigV1, CheckConfig, ElementConfig, RuleConfig};
pub use presets::known_profiles;
pub use resolve::{DEFAULT_INCLUDE, Overrides, ResolvedConfig};

/// Parse `boundguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<BoundguardConfigV1> {
    let cfg: BoundguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Parse a JSON config document into the same model as [`parse_config_toml`].
pub fn parse_config_json(input: &str) -> anyhow::Result<BoundguardConfigV1> {
    let cfg: BoundguardConfigV1 = serde_json::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profile + overrides + policy tables).
pub fn resolve_config(
    cfg: BoundguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// JSON schema of the config document.
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(BoundguardConfigV1)
}
