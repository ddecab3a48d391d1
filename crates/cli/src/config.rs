//! Configuration file support for measurement runs

use anyhow::{Context, Result};
use finder_core::measure::{ContainsSweep, DedupeSweep};
use finder_core::FinderKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Seed for the data generator (random if omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Cap sizes and query sets at 100 elements
    #[serde(default)]
    pub short: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<ContainsSweep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedupe: Option<DedupeSweep>,
}

impl BenchConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            _ => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                extension
            )),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Both sweeps with the full default grids
    pub fn full() -> Self {
        Self {
            seed: None,
            short: false,
            contains: Some(ContainsSweep::default()),
            dedupe: Some(DedupeSweep::default()),
        }
    }

    /// Small grid suitable for a quick sanity check
    pub fn quick() -> Self {
        Self {
            seed: Some(1),
            short: true,
            contains: Some(ContainsSweep {
                finders: FinderKind::ALL.to_vec(),
                num_elems: vec![1, 10, 100],
                hit_rates: vec![1.0, 0.5, 0.0],
                str_lens: vec![1, 10],
                test_set_len: 100,
            }),
            dedupe: Some(DedupeSweep {
                finders: FinderKind::ALL.to_vec(),
                num_elems: vec![10, 100],
                dup_rates: vec![0.8, 0.0],
            }),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_config_has_both_sweeps() {
        let config = BenchConfig::full();
        assert!(config.contains.is_some());
        assert!(config.dedupe.is_some());
        assert!(!config.short);
    }

    #[test]
    fn test_save_and_load_yaml() {
        let config = BenchConfig::quick();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().with_extension("yaml");

        config.save(&path).unwrap();
        let loaded = BenchConfig::load(&path).unwrap();

        assert_eq!(config, loaded);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_and_load_toml() {
        let config = BenchConfig::quick();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().with_extension("toml");

        config.save(&path).unwrap();
        let loaded = BenchConfig::load(&path).unwrap();

        assert_eq!(config, loaded);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_partial_yaml_uses_sweep_defaults() {
        let mut temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(temp_file, "short: true").unwrap();
        writeln!(temp_file, "dedupe:").unwrap();
        writeln!(temp_file, "  finders: [map]").unwrap();
        temp_file.flush().unwrap();

        let loaded = BenchConfig::load(temp_file.path()).unwrap();

        assert!(loaded.short);
        assert!(loaded.contains.is_none());
        let dedupe = loaded.dedupe.unwrap();
        assert_eq!(dedupe.finders, vec![FinderKind::Map]);
        assert_eq!(dedupe.dup_rates, DedupeSweep::default().dup_rates);
    }

    #[test]
    fn test_unsupported_format() {
        let config = BenchConfig::full();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().with_extension("json");

        assert!(config.save(&path).is_err());
        assert!(BenchConfig::load(&path).is_err());
    }
}
