//! Update check and self-update.
//!
//! Releases are read from the GitHub releases API of the configured
//! repository. A release ships one binary per platform, optionally with a
//! `<asset>.sha256` checksum next to it.

use crate::error::ProjectError;
use crate::settings::{self, Settings, ToolVersion};
use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use semver::Version;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::env;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = "42-tools-updater";
/// The pre-flight check must never hold up the command noticeably.
const CHECK_TIMEOUT: Duration = Duration::from_secs(3);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Deserialize, Debug)]
struct Release {
    tag_name: String,
    assets: Vec<Asset>,
}

#[derive(Deserialize, Debug, Clone)]
struct Asset {
    name: String,
    browser_download_url: String,
}

impl Release {
    fn version(&self) -> Result<Version> {
        parse_tag(&self.tag_name)
    }

    fn binary_asset(&self) -> Option<&Asset> {
        let target = get_target_name();
        self.assets
            .iter()
            .filter(|a| !a.name.ends_with(".sha256"))
            .find(|a| a.name.contains(target))
    }

    fn checksum_asset(&self, binary: &Asset) -> Option<&Asset> {
        let wanted = format!("{}.sha256", binary.name);
        self.assets.iter().find(|a| a.name == wanted)
    }
}

fn parse_tag(tag: &str) -> Result<Version> {
    Version::parse(tag.trim_start_matches('v'))
        .with_context(|| format!("Failed to parse release version '{}'", tag))
}

fn agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}

fn fetch_latest_release(settings: &Settings, timeout: Duration) -> Result<Release> {
    let url = format!(
        "https://api.github.com/repos/{}/releases/latest",
        settings.release_repo
    );
    ui::debug(&format!("Fetching {}", url));
    let mut resp = agent(timeout)
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| ProjectError::Network(format!("could not reach {}: {}", url, e)))?;
    let release: Release = resp
        .body_mut()
        .read_json()
        .map_err(|e| ProjectError::Network(format!("unexpected release data: {}", e)))?;
    Ok(release)
}

/// Warns when a newer release exists. Never fails: problems are only
/// reported in debug mode.
pub fn warn_if_outdated(settings: &Settings, version: &ToolVersion) {
    let newer = newer_release(settings, version, |settings| {
        fetch_latest_release(settings, CHECK_TIMEOUT).and_then(|r| r.version())
    });
    if let Some(latest) = newer {
        ui::warn(&format!(
            "A new version of 42 tools is available (v{} -> v{}). Run '42 update' to install it.",
            version.installed, latest
        ));
    }
}

/// The latest release version when it is newer than the installed one.
/// `fetch` is only called when update checks are enabled.
fn newer_release<F>(settings: &Settings, version: &ToolVersion, fetch: F) -> Option<Version>
where
    F: FnOnce(&Settings) -> Result<Version>,
{
    if !settings.check_for_updates {
        ui::debug("Update check disabled");
        return None;
    }
    match fetch(settings) {
        Ok(latest) => version
            .with_latest(latest.clone())
            .is_outdated()
            .then_some(latest),
        Err(e) => {
            ui::debug(&format!("Update check skipped: {:#}", e));
            None
        }
    }
}

pub fn check_and_upgrade(settings: &Settings, version: &ToolVersion, home: &Path) -> Result<()> {
    println!("{} Checking for updates...", "🔍".blue());

    let release = fetch_latest_release(settings, DOWNLOAD_TIMEOUT)?;
    let remote_ver = release.version()?;

    if !version.with_latest(remote_ver.clone()).is_outdated() {
        ui::success(&format!("42 tools are up to date (v{})", version.installed));
        return Ok(());
    }

    println!(
        "{} New version available: v{} -> v{}",
        "🚀".green(),
        version.installed,
        remote_ver
    );

    let asset = release
        .binary_asset()
        .cloned()
        .ok_or_else(|| {
            ProjectError::Network(format!(
                "release v{} has no binary for {}",
                remote_ver,
                get_target_name()
            ))
        })?;
    let checksum = match release.checksum_asset(&asset) {
        Some(sum) => Some(download_text(&sum.browser_download_url)?),
        None => {
            ui::warn("Release publishes no checksum, only basic verification is possible");
            None
        }
    };

    let current_exe = env::current_exe().context("Failed to locate the running executable")?;
    let install_dir = current_exe
        .parent()
        .context("Running executable has no parent directory")?;

    // Fetch to a temp file next to the executable so the final rename stays
    // on one filesystem and is atomic.
    let mut tmp = tempfile::Builder::new()
        .prefix(".42-update")
        .tempfile_in(install_dir)
        .with_context(|| format!("Failed to create a temporary file in {}", install_dir.display()))?;
    download_to(&asset.browser_download_url, tmp.as_file_mut())?;

    println!("Verifying...");
    verify_download(tmp.path(), checksum.as_deref())?;

    println!("Installing...");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o755))?;
    }
    tmp.persist(&current_exe)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", current_exe.display()))?;

    record_after_install(home, &remote_ver);
    ui::success(&format!("Successfully updated to v{}!", remote_ver));
    Ok(())
}

/// Runs once the executable is already replaced, so failing here must not
/// fail the update.
fn record_after_install(home: &Path, version: &Version) -> bool {
    match settings::record_installed_version(home, version) {
        Ok(()) => true,
        Err(e) => {
            ui::warn(&format!("Could not record the installed version: {:#}", e));
            false
        }
    }
}

fn download_text(url: &str) -> Result<String> {
    let mut resp = agent(DOWNLOAD_TIMEOUT)
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| ProjectError::Network(format!("could not download {}: {}", url, e)))?;
    resp.body_mut()
        .read_to_string()
        .map_err(|e| ProjectError::Network(format!("could not read {}: {}", url, e)).into())
}

fn download_to(url: &str, file: &mut fs::File) -> Result<()> {
    ui::debug(&format!("Downloading {}", url));
    let resp = agent(DOWNLOAD_TIMEOUT)
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| ProjectError::Network(format!("could not download {}: {}", url, e)))?;

    let total_size = resp
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let pb = indicatif::ProgressBar::new(total_size);
    if let Ok(style) = indicatif::ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut reader = resp.into_body().into_reader();
    let mut buffer = [0; 8192];
    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| ProjectError::Network(format!("download interrupted: {}", e)))?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])?;
        pb.inc(n as u64);
    }
    file.flush()?;
    pb.finish_with_message("Download complete");
    Ok(())
}

/// Rejects empty downloads and, when a checksum file was published, content
/// whose SHA-256 does not match it.
fn verify_download(path: &Path, checksum_file: Option<&str>) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        return Err(ProjectError::Network("downloaded file is empty".to_string()).into());
    }

    let Some(checksum_file) = checksum_file else {
        return Ok(());
    };
    // `sha256sum` format: "<hex>  <file name>"
    let expected = checksum_file.split_whitespace().next().unwrap_or_default();
    let actual = format!("{:x}", Sha256::digest(&bytes));
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(ProjectError::Network(format!(
            "SHA256 mismatch\n  Expected: {}\n  Actual:   {}",
            expected, actual
        ))
        .into());
    }
    ui::debug("Checksum verified");
    Ok(())
}

fn get_target_name() -> &'static str {
    if cfg!(target_os = "macos") {
        if cfg!(target_arch = "aarch64") {
            "macos-arm64"
        } else {
            "macos-intel"
        }
    } else {
        "linux"
    }
}
