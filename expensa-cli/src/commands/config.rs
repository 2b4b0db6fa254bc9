use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use shared::config::ClientConfig;

/// Writes the default configuration in `format` (yaml, json or toml).
pub fn generate_config(format: &str, output: Option<&Path>) -> Result<()> {
    let config = ClientConfig::with_defaults();
    let format = format.trim().to_ascii_lowercase();
    let serialized = match format.as_str() {
        "yaml" | "yml" => serde_yml::to_string(&config).context("failed to render YAML")?,
        "json" => serde_json::to_string_pretty(&config).context("failed to render JSON")?,
        "toml" => toml::to_string_pretty(&config).context("failed to render TOML")?,
        other => bail!("unsupported format `{other}`; use yaml, json or toml"),
    };

    let path = output.map_or_else(|| PathBuf::from(format!("expensa.{format}")), Path::to_path_buf);
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write configuration to {}", path.display()))?;

    println!("Configuration file '{}' generated successfully.", path.display());
    Ok(())
}
