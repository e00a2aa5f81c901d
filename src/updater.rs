//! Startup self-update.
//!
//! Best-effort and sequential: fetch the fixed update script, mirror three
//! repository directories through the GitHub contents API, then seed the user
//! settings with any default files the user does not have yet. No versioning
//! and no integrity checking; the caller logs a warning on failure and the
//! application runs with whatever it already has.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::paths::AppPaths;

pub const GITHUB_REPO: &str = "Rieversed/Insomnia.cc";
pub const GITHUB_BRANCH: &str = "main";
pub const UPDATE_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/Rieversed/Insomnia.cc/main/scripts/update_files.py";

/// One entry of a GitHub `contents` API response.
#[derive(Debug, Deserialize)]
struct RepoEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

pub fn run(paths: &AppPaths) -> Result<()> {
    let client = client()?;
    download_file(
        &client,
        UPDATE_SCRIPT_URL,
        &paths.scripts_dir().join("update_files.py"),
    )?;
    download_directory(&client, "assets", &paths.assets_dir())?;
    download_directory(&client, "DefaultSettings", &paths.default_settings_dir())?;
    download_directory(
        &client,
        "scripts/TempFilesDeleter",
        &paths.deleter_scripts_dir(),
    )?;
    copy_missing_defaults(paths)?;
    info!("update complete");
    Ok(())
}

fn client() -> Result<reqwest::blocking::Client> {
    // The contents API rejects requests without a User-Agent.
    reqwest::blocking::Client::builder()
        .user_agent(concat!("insomnia/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building HTTP client")
}

/// Mirror one repository directory into `local_dir`, recursing into
/// subdirectories. A single failed file download is logged and skipped.
fn download_directory(
    client: &reqwest::blocking::Client,
    remote_path: &str,
    local_dir: &Path,
) -> Result<()> {
    let url = format!(
        "https://api.github.com/repos/{GITHUB_REPO}/contents/{remote_path}?ref={GITHUB_BRANCH}"
    );
    let entries: Vec<RepoEntry> = client
        .get(&url)
        .send()
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("listing {remote_path}"))?
        .json()
        .with_context(|| format!("decoding listing of {remote_path}"))?;
    fs::create_dir_all(local_dir)?;
    for entry in entries {
        match entry.kind.as_str() {
            "file" => {
                let Some(file_url) = entry.download_url.as_deref() else {
                    continue;
                };
                if let Err(err) = download_file(client, file_url, &local_dir.join(&entry.name)) {
                    warn!("failed to download {}: {err:#}", entry.path);
                }
            }
            "dir" => download_directory(client, &entry.path, &local_dir.join(&entry.name))?,
            _ => {}
        }
    }
    Ok(())
}

fn download_file(client: &reqwest::blocking::Client, url: &str, local_path: &Path) -> Result<()> {
    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("fetching {url}"))?
        .bytes()
        .with_context(|| format!("reading {url}"))?;
    if let Some(parent) = local_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(local_path, &body)
        .with_context(|| format!("writing {}", local_path.display()))?;
    info!("downloaded {}", local_path.display());
    Ok(())
}

/// Seed the user settings directory with default files it is missing.
fn copy_missing_defaults(paths: &AppPaths) -> Result<()> {
    let entries =
        fs::read_dir(paths.default_settings_dir()).context("reading default settings")?;
    for entry in entries.flatten() {
        let user_copy = paths.user_settings_dir().join(entry.file_name());
        if !user_copy.exists() {
            fs::copy(entry.path(), &user_copy)
                .with_context(|| format!("seeding {}", user_copy.display()))?;
            info!("copied {} to user settings", entry.file_name().to_string_lossy());
        }
    }
    Ok(())
}
