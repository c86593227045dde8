//! Configuration loading and management.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use inv_core::{Biller, ProjectId};
use serde::{Deserialize, Serialize};

use crate::timesheet::TimeUnits;

/// Application configuration.
///
/// ```toml
/// time_units = "min"
///
/// [biller]
/// name = "standard"
/// base_fee = 50
/// bins = [10, 15, inf]
/// rates = [100, 90, 80]
/// frequency = "W"
///
/// [project_rates]
/// acme = 120
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Unit of the `time_spent` timesheet column.
    #[serde(default)]
    pub time_units: TimeUnits,

    /// Tiered biller used by `inv bill`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biller: Option<Biller>,

    /// Flat hourly rate per project, used by `inv project-rates`.
    #[serde(default)]
    pub project_rates: HashMap<ProjectId, f64>,
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    ///
    /// Biller settings are validated while loading, so a mismatched or
    /// negative tier configuration fails here rather than mid-invoice.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (INV_*)
        figment = figment.merge(Env::prefixed("INV_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for inv.
///
/// On Linux: `~/.config/inv`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("inv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inv_core::{CostFunction, Frequency};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_dirs_config_path_ends_with_inv() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "inv");
    }

    #[test]
    fn test_default_config_has_no_biller() {
        let config = Config::default();
        assert_eq!(config.time_units, TimeUnits::Hours);
        assert!(config.biller.is_none());
        assert!(config.project_rates.is_empty());
    }

    #[test]
    fn test_load_tiered_biller_from_file() {
        let file = write_config(
            r#"
time_units = "min"

[biller]
name = "standard"
base_fee = 1
bins = [10, 15, inf]
rates = [1, 2, 3]
frequency = "W"

[project_rates]
acme = 120.0
"#,
        );

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.time_units, TimeUnits::Minutes);

        let biller = config.biller.unwrap();
        assert_eq!(biller.name(), Some("standard"));
        assert_eq!(biller.frequency(), Some(Frequency::weekly()));
        assert!((biller.cost(27.0).unwrap() - 47.0).abs() < 1e-9);

        let acme = ProjectId::new("acme").unwrap();
        assert_eq!(config.project_rates.get(&acme), Some(&120.0));
    }

    #[test]
    fn test_invalid_biller_fails_to_load() {
        let file = write_config(
            r"
[biller]
bins = [10, inf]
rates = [100]
",
        );

        let err = Config::load_from(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("2 tier widths but 1 rates"));
    }

    #[test]
    fn test_unknown_frequency_fails_to_load() {
        let file = write_config(
            r#"
[biller]
bins = [inf]
rates = [100]
frequency = "fortnightly"
"#,
        );

        assert!(Config::load_from(Some(file.path())).is_err());
    }
}
