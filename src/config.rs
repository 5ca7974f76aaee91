use crate::error::ProjectError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the per-project configuration file written by `42 init`.
pub const CONFIG_FILE: &str = ".42_config.toml";

/// Libraries merged into the project at `init` time.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub libft: bool,
    #[serde(default)]
    pub minilibx: bool,
}

impl ProjectConfig {
    pub fn has_libraries(&self) -> bool {
        self.libft || self.minilibx
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Err(ProjectError::NotInitialized(root.to_path_buf()).into());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {} - check for syntax errors", path.display()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(root.join(CONFIG_FILE), content)
            .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_code_for;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig {
            libft: true,
            minilibx: false,
        };
        config.save(dir.path()).unwrap();
        assert_eq!(ProjectConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert_eq!(exit_code_for(&err), 5);
    }

    #[test]
    fn test_missing_keys_default_to_false() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "libft = true\n").unwrap();
        let config = ProjectConfig::load(dir.path()).unwrap();
        assert!(config.libft);
        assert!(!config.minilibx);
        assert!(config.has_libraries());
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "libft = maybe\n").unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
