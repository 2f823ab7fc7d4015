//! TLD universe: a local list file, or IANA's published list

use std::path::Path;

use crate::error::{Result, SweepError};

/// IANA's plain-text list of every delegated TLD
pub const IANA_TLD_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

/// Where a TLD list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TldOrigin {
    File,
    Iana,
}

/// Split a TLD list into the universe: lowercased, first row (header) skipped,
/// blank lines dropped.
pub fn parse_tld_list(content: &str) -> Vec<String> {
    content
        .to_lowercase()
        .split('\n')
        .skip(1)
        .map(str::trim)
        .filter(|tld| !tld.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the list from `path` if it exists, otherwise download it from IANA.
///
/// With `save_download`, a downloaded list is written to `path` so later runs
/// (and reconciliation) see the same universe.
pub async fn load_tld_list(
    path: &Path,
    client: &reqwest::Client,
    save_download: bool,
) -> Result<(Vec<String>, TldOrigin)> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;
        tracing::debug!(path = %path.display(), "Loaded TLD list from file");
        let tlds = non_empty(parse_tld_list(&content), &path.display().to_string())?;
        return Ok((tlds, TldOrigin::File));
    }

    let content = download_tld_list(client).await?;
    let tlds = non_empty(parse_tld_list(&content), IANA_TLD_URL)?;
    if save_download {
        tokio::fs::write(path, &content).await.map_err(|e| {
            SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;
        tracing::info!(path = %path.display(), "Saved downloaded TLD list");
    }

    Ok((tlds, TldOrigin::Iana))
}

/// A list with nothing past its header row would sweep nothing and mark nothing unchecked
fn non_empty(tlds: Vec<String>, source: &str) -> Result<Vec<String>> {
    if tlds.is_empty() {
        return Err(SweepError::parse(format!("TLD list from {} has no entries after its header row", source)));
    }
    Ok(tlds)
}

async fn download_tld_list(client: &reqwest::Client) -> Result<String> {
    let response = client.get(IANA_TLD_URL).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(SweepError::network(
            format!("TLD list request failed with status {}", status),
            Some(IANA_TLD_URL.to_string()),
        ));
    }

    let text = response.text().await?;
    tracing::debug!(bytes = text.len(), "Downloaded TLD list from IANA");
    Ok(text)
}
