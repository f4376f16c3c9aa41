//! Layered config loading.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. YAML file: `--config`, else `orgchart.yaml` in the platform config dir
//! 3. Environment variables: `ORGCHART_DB`, `ORGCHART_SEED`
//! 4. CLI flags (applied by the binary)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::config::schema::OrgChartConfig;
use crate::error::{OrgChartError, Result};

const CONFIG_FILE: &str = "orgchart.yaml";

/// `<platform config dir>/orgchart.yaml`, if a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Parse a YAML config file.
pub fn read_config_file(path: &Path) -> Result<OrgChartConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        OrgChartError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&contents)
        .map_err(|e| OrgChartError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Override file values with `ORGCHART_*` variables from `lookup`.
pub fn apply_env(config: &mut OrgChartConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(db) = lookup("ORGCHART_DB").filter(|v| !v.is_empty()) {
        config.database = PathBuf::from(db);
    }
    if let Some(seed) = lookup("ORGCHART_SEED").filter(|v| !v.is_empty()) {
        config.seed = Some(PathBuf::from(seed));
    }
}

/// Load defaults, then the config file, then the process environment.
///
/// An explicit path must exist; the default path is used only if present.
pub fn load_config(explicit: Option<&Path>) -> Result<OrgChartConfig> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using default config file");
                read_config_file(&path)?
            }
            None => OrgChartConfig::default(),
        },
    };
    apply_env(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}
