//! Download the published directory workbook
//!
//! Uses the system `curl`, like any other one-shot download on the
//! operator's machine. No retries: a failed download is reported and the
//! previous local copy is left alone.

// During coverage builds, stubbed functions don't use all imports
#![cfg_attr(coverage, allow(unused_imports, dead_code))]

use crate::error::{IsbeError, IsbeResult};
use std::fs;
use std::path::Path;
use tracing::info;

/// Where ISBE publishes the directory of educational entities
pub const DEFAULT_SOURCE_URL: &str = "https://www.isbe.net/Documents/dir_ed_entities.xls";

/// Arguments for a curl download of `url` into `dest`
pub fn curl_args(url: &str, dest: &Path) -> Vec<String> {
    vec![
        "--location".to_string(),
        "--fail".to_string(),
        "--silent".to_string(),
        "--show-error".to_string(),
        "--output".to_string(),
        dest.display().to_string(),
        url.to_string(),
    ]
}

/// Download `url` to `dest`, creating the parent directory if needed.
///
/// The file is written next to `dest` first and renamed into place only
/// when curl succeeds.
///
/// # Coverage Exclusion
/// Makes HTTP requests - cannot unit test network calls
#[cfg(not(coverage))]
pub fn download(url: &str, dest: &Path) -> IsbeResult<u64> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let partial = dest.with_extension("part");

    info!(url, dest = %dest.display(), "downloading workbook");
    let output = std::process::Command::new("curl")
        .args(curl_args(url, &partial))
        .output()
        .map_err(|e| IsbeError::Fetch(format!("Failed to run curl: {}", e)))?;

    if !output.status.success() {
        let _ = fs::remove_file(&partial);
        return Err(IsbeError::Fetch(format!(
            "curl exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    fs::rename(&partial, dest)?;
    let size = fs::metadata(dest)?.len();
    info!(bytes = size, "download complete");
    Ok(size)
}

/// Stub for coverage builds
#[cfg(coverage)]
pub fn download(_url: &str, _dest: &Path) -> IsbeResult<u64> {
    Err(IsbeError::Fetch("downloads are disabled in coverage builds".to_string()))
}
