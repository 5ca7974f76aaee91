//! Tool-wide settings and the installed version record.
//!
//! Both live in the tool home directory (`$FORTYTWO_HOME`, or `~/.42`):
//!
//! - `config.toml` - which programs to run and where updates come from
//! - `version.toml` - version installed by the last `42 update`
//!
//! They are read once at startup and handed to the commands that need them.

use crate::ui;
use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "FORTYTWO_HOME";

const SETTINGS_FILE: &str = "config.toml";
const VERSION_FILE: &str = "version.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Check for a newer release before running a command
    pub check_for_updates: bool,
    /// GitHub `owner/name` the releases are published under
    pub release_repo: String,
    pub tools: ToolSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_for_updates: true,
            release_repo: "42-tools/42".to_string(),
            tools: ToolSettings::default(),
        }
    }
}

/// Programs the build and run phases shell out to.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ToolSettings {
    pub make: String,
    pub norminette: String,
    pub valgrind: String,
    /// Extra arguments placed between `valgrind` and the program
    pub valgrind_args: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            make: "make".to_string(),
            norminette: "norminette".to_string(),
            valgrind: "valgrind".to_string(),
            valgrind_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Reads `config.toml` from `home`, falling back to defaults when absent.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Locates the tool home directory.
pub fn home_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".42")
}

#[derive(Serialize, Deserialize, Debug)]
struct VersionRecord {
    version: String,
}

/// Installed and latest known versions of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub installed: Version,
    pub latest: Option<Version>,
}

impl ToolVersion {
    /// The newer of the version recorded by the last update and the version
    /// this binary was built as. An unreadable record is reported and
    /// ignored.
    pub fn load(home: &Path) -> Self {
        let built = built_version();
        let installed = match read_recorded_version(home) {
            Ok(Some(recorded)) => recorded.max(built),
            Ok(None) => built,
            Err(e) => {
                ui::warn(&format!("Ignoring version record: {:#}", e));
                built
            }
        };
        Self {
            installed,
            latest: None,
        }
    }

    pub fn with_latest(&self, latest: Version) -> Self {
        Self {
            installed: self.installed.clone(),
            latest: Some(latest),
        }
    }

    pub fn is_outdated(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|latest| *latest > self.installed)
    }
}

fn built_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

fn read_recorded_version(home: &Path) -> Result<Option<Version>> {
    let path = home.join(VERSION_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record: VersionRecord = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let version = Version::parse(record.version.trim_start_matches('v'))
        .with_context(|| format!("Invalid version in {}", path.display()))?;
    Ok(Some(version))
}

/// Records `version` as installed.
pub fn record_installed_version(home: &Path, version: &Version) -> Result<()> {
    fs::create_dir_all(home)
        .with_context(|| format!("Failed to create {}", home.display()))?;
    let record = VersionRecord {
        version: version.to_string(),
    };
    fs::write(home.join(VERSION_FILE), toml::to_string_pretty(&record)?)
        .context("Failed to record installed version")?;
    Ok(())
}
