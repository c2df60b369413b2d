//! Audit run configuration loading and validation

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete audit configuration
///
/// Every section and field has a default matching the original file
/// layout, so an absent or partial configuration file still yields a
/// runnable setup. CLI flags override file values after loading.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub inputs: InputsSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// Paths of the five input relation tables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputsSection {
    #[serde(default = "default_assignments")]
    pub assignments: PathBuf,

    #[serde(default = "default_grants")]
    pub grants: PathBuf,

    #[serde(default = "default_sod")]
    pub sod: PathBuf,

    #[serde(default = "default_toxic")]
    pub toxic: PathBuf,

    #[serde(default = "default_hierarchy")]
    pub hierarchy: PathBuf,
}

/// Report destination and format
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSection {
    #[serde(default = "default_output")]
    pub path: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Evaluation runtime settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RuntimeSection {
    /// Worker threads for the evaluation fan-out; 0 uses one per core
    #[serde(default)]
    pub threads: usize,
}

/// Report output format
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Delimited rows with a header, matching the original report shape
    #[default]
    Csv,
    /// Pretty-printed JSON array of violation records
    Json,
}

impl Default for InputsSection {
    fn default() -> Self {
        Self {
            assignments: default_assignments(),
            grants: default_grants(),
            sod: default_sod(),
            toxic: default_toxic(),
            hierarchy: default_hierarchy(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: default_output(),
            format: OutputFormat::default(),
        }
    }
}

impl AuditConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read configuration file {:?}", path.as_ref()))?;

        let config: AuditConfig =
            toml::from_str(&contents).context("Failed to parse configuration file")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let tables = [
            ("assignments", &self.inputs.assignments),
            ("grants", &self.inputs.grants),
            ("sod", &self.inputs.sod),
            ("toxic", &self.inputs.toxic),
            ("hierarchy", &self.inputs.hierarchy),
        ];
        for (name, path) in tables {
            if path.as_os_str().is_empty() {
                bail!("Input table path for '{}' is empty", name);
            }
        }
        if self.output.path.as_os_str().is_empty() {
            bail!("Output path is empty");
        }
        Ok(())
    }
}

fn default_assignments() -> PathBuf {
    PathBuf::from("roles.csv")
}

fn default_grants() -> PathBuf {
    PathBuf::from("privileges.csv")
}

fn default_sod() -> PathBuf {
    PathBuf::from("sod_rules.csv")
}

fn default_toxic() -> PathBuf {
    PathBuf::from("toxic_actions.csv")
}

fn default_hierarchy() -> PathBuf {
    PathBuf::from("role_hierarchy.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("analysis_result.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_original_layout() {
        let config = AuditConfig::default();

        assert_eq!(config.inputs.assignments, PathBuf::from("roles.csv"));
        assert_eq!(config.inputs.hierarchy, PathBuf::from("role_hierarchy.csv"));
        assert_eq!(config.output.path, PathBuf::from("analysis_result.csv"));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.runtime.threads, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\npath = \"audit.json\"\nformat = \"json\"\n\n[runtime]\nthreads = 4\n"
        )
        .unwrap();

        let config = AuditConfig::load(file.path()).unwrap();
        assert_eq!(config.output.path, PathBuf::from("audit.json"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.runtime.threads, 4);
        // Untouched section keeps its defaults
        assert_eq!(config.inputs.grants, PathBuf::from("privileges.csv"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AuditConfig::load("/nonexistent/rolescope.toml").is_err());
    }

    #[test]
    fn test_empty_path_fails_validation() {
        let mut config = AuditConfig::default();
        config.inputs.sod = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
