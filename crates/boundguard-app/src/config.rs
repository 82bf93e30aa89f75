//! Config document loading shared by the use cases.

use anyhow::Context;
use boundguard_settings::{BoundguardConfigV1, Overrides, ResolvedConfig};
use camino::Utf8Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is TOML.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Parse and resolve config text. Empty text means "all defaults".
pub fn load_config(
    text: &str,
    format: ConfigFormat,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let cfg = if text.trim().is_empty() {
        BoundguardConfigV1::default()
    } else {
        match format {
            ConfigFormat::Toml => boundguard_settings::parse_config_toml(text),
            ConfigFormat::Json => boundguard_settings::parse_config_json(text),
        }
        .context("parse config")?
    };

    boundguard_settings::resolve_config(cfg, overrides).context("resolve config")
}
