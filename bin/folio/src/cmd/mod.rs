//! CLI commands.

pub mod check;
pub mod list;
pub mod site;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;

/// Load configuration (file plus `FOLIO__*` environment overrides), then
/// apply a `--root` override from the command line.
pub fn load_config(config_path: &Path, root: Option<&Path>) -> Result<Config> {
    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if let Some(root) = root {
        tracing::info!(root = %root.display(), "Overriding content root from CLI");
        config.content.root = root.to_path_buf();
    }

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
