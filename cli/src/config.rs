//! Sandbox configuration: where the world file lives and who acts

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "tidepool.toml";
const DEFAULT_WORLD: &str = "tidepool.world.json";

/// Resolved configuration for one CLI invocation.
pub struct SandboxConfig {
    /// Path of the JSON world file all commands operate on.
    pub world_path: PathBuf,
    /// Account name used when a command omits `--as`.
    pub actor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    world: Option<PathBuf>,
    actor: Option<String>,
}

impl SandboxConfig {
    /// Resolve configuration from an explicit `--config` path, the
    /// default `tidepool.toml` if present, or built-in defaults.
    /// `--world` overrides whatever the file says.
    pub fn load(config_path: Option<&Path>, world_override: Option<PathBuf>) -> Result<Self> {
        let file = match config_path {
            Some(path) => read_config(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.exists() {
                    read_config(default)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let world_path = world_override
            .or(file.world)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORLD));

        Ok(Self {
            world_path,
            actor: file.actor,
        })
    }
}

fn read_config(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_falls_back_to_default_world() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = SandboxConfig::load(Some(file.path()), None).unwrap();
        assert_eq!(config.world_path, PathBuf::from(DEFAULT_WORLD));
        assert!(config.actor.is_none());
    }

    #[test]
    fn explicit_config_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "world = \"/tmp/demo.json\"\nactor = \"alice\"").unwrap();
        let config = SandboxConfig::load(Some(file.path()), None).unwrap();
        assert_eq!(config.world_path, PathBuf::from("/tmp/demo.json"));
        assert_eq!(config.actor.as_deref(), Some("alice"));
    }

    #[test]
    fn world_flag_overrides_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "world = \"/tmp/demo.json\"").unwrap();
        let config =
            SandboxConfig::load(Some(file.path()), Some(PathBuf::from("/tmp/other.json"))).unwrap();
        assert_eq!(config.world_path, PathBuf::from("/tmp/other.json"));
    }
}
