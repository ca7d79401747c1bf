use crate::config::Config;
use crate::error::ApiError;
use crate::upstream;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct GithubResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
    pub size: Option<u64>,
}

/// Web-UI blob URL → raw content URL. Pure string surgery, no upstream call.
pub fn rewrite_raw_url(url: &str) -> Result<String, ApiError> {
    if !url.contains("github.com") {
        return Err(ApiError::InvalidInput("not a github.com URL".to_string()));
    }

    Ok(url
        .replace("github.com", "raw.githubusercontent.com")
        .replace("/blob/", "/"))
}

pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_owned)
}

pub fn fetch(url: &str, config: &Config) -> Result<GithubResponse, ApiError> {
    let download_url = rewrite_raw_url(url)?;
    let filename = filename_from_url(&download_url)
        .ok_or_else(|| ApiError::InvalidInput("URL has no file path".to_string()))?;

    // Existence probe. A definite upstream 404 is worth reporting; anything
    // else (network trouble, odd status) just leaves size unknown.
    let size = match probe(&download_url, config.upstream.timeout_secs) {
        Ok(Probe::Found(size)) => size,
        Ok(Probe::Missing) => {
            return Err(ApiError::NotFound(format!(
                "{download_url} does not exist"
            )))
        }
        Err(err) => {
            log::debug!("github probe failed for {download_url}: {err}");
            None
        }
    };

    Ok(GithubResponse {
        success: true,
        filename,
        download_url,
        size,
    })
}

enum Probe {
    Found(Option<u64>),
    Missing,
}

fn probe(url: &str, timeout_secs: u64) -> Result<Probe, ApiError> {
    let client = upstream::client(Duration::from_secs(timeout_secs))?;
    let resp = client.head(url).send()?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(Probe::Missing);
    }
    if !resp.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "{url} returned {}",
            resp.status()
        )));
    }

    Ok(Probe::Found(resp.content_length()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_rewrite() {
        let url = "https://github.com/u/r/blob/main/f.txt";
        assert_eq!(
            rewrite_raw_url(url).unwrap(),
            "https://raw.githubusercontent.com/u/r/main/f.txt"
        );
    }

    #[test]
    fn test_rewrite_nested_path() {
        let url = "https://github.com/owner/repo/blob/v1.2/src/lib/mod.rs";
        assert_eq!(
            rewrite_raw_url(url).unwrap(),
            "https://raw.githubusercontent.com/owner/repo/v1.2/src/lib/mod.rs"
        );
    }

    #[test]
    fn test_non_github_rejected() {
        assert!(matches!(
            rewrite_raw_url("https://gitlab.com/u/r/blob/main/f.txt"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_filename_is_last_segment() {
        assert_eq!(
            filename_from_url("https://raw.githubusercontent.com/u/r/main/f.txt").as_deref(),
            Some("f.txt")
        );
        assert_eq!(
            filename_from_url("https://raw.githubusercontent.com/u/r/main/a/b/deep.rs").as_deref(),
            Some("deep.rs")
        );
    }
}
