use crate::config::Config;
use crate::error::ApiError;
use crate::upstream;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::time::Duration;

static FILE_ID_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("failed to compile drive path regex"));

static FILE_ID_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").expect("failed to compile drive param regex")
});

/// Cookie Google sets on the large-file interstitial page.
static CONFIRM_COOKIE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"download_warning[^=]*=([^;]+)").expect("failed to compile confirm regex")
});

#[derive(Debug, Clone, Serialize)]
pub struct GdriveResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
    pub file_id: String,
}

/// Shared-link and `open?id=` forms both appear in the wild.
pub fn extract_file_id(url: &str) -> Option<String> {
    FILE_ID_PATH
        .captures(url)
        .or_else(|| FILE_ID_PARAM.captures(url))
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
}

pub fn direct_download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}

pub fn fetch(url: &str, config: &Config) -> Result<GdriveResponse, ApiError> {
    let file_id = extract_file_id(url).ok_or_else(|| {
        ApiError::InvalidInput("no Google Drive file id found in URL".to_string())
    })?;

    let mut download_url = direct_download_url(&file_id);
    let mut filename = format!("gdrive_{file_id}");

    // Best-effort probe: Content-Disposition carries the real filename, and
    // large files answer with an interstitial whose cookie holds a
    // confirmation token. A failed probe leaves the canonical URL untouched.
    match probe(&download_url, config.upstream.timeout_secs) {
        Ok((probed_name, confirm_token)) => {
            if let Some(name) = probed_name {
                filename = name;
            }
            if let Some(token) = confirm_token {
                download_url = format!("{download_url}&confirm={token}");
            }
        }
        Err(err) => log::debug!("gdrive probe failed for {file_id}: {err}"),
    }

    Ok(GdriveResponse {
        success: true,
        filename,
        download_url,
        file_id,
    })
}

fn probe(
    download_url: &str,
    timeout_secs: u64,
) -> Result<(Option<String>, Option<String>), ApiError> {
    let client = upstream::client(Duration::from_secs(timeout_secs))?;
    let resp = client.get(download_url).send()?;

    let filename = resp
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_disposition);

    let confirm_token = resp
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            CONFIRM_COOKIE
                .captures(cookie)
                .and_then(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
        });

    Ok((filename, confirm_token))
}

fn parse_content_disposition(value: &str) -> Option<String> {
    let name = value.split("filename=").nth(1)?;
    let name = name.split(';').next().unwrap_or(name);
    let name = name.trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_id_from_share_link() {
        let url = "https://drive.google.com/file/d/ABC123/view?usp=sharing";
        assert_eq!(extract_file_id(url).as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_extract_file_id_from_id_param() {
        let url = "https://drive.google.com/open?id=1a2B_3c-4d";
        assert_eq!(extract_file_id(url).as_deref(), Some("1a2B_3c-4d"));
    }

    #[test]
    fn test_path_form_wins_over_param() {
        let url = "https://drive.google.com/file/d/PATHID/view?id=PARAMID";
        assert_eq!(extract_file_id(url).as_deref(), Some("PATHID"));
    }

    #[test]
    fn test_no_recognizable_id() {
        assert!(extract_file_id("https://drive.google.com/drive/my-drive").is_none());
        assert!(extract_file_id("https://example.com/watch?v=abc").is_none());
    }

    #[test]
    fn test_direct_download_url() {
        assert_eq!(
            direct_download_url("ABC123"),
            "https://drive.google.com/uc?export=download&id=ABC123"
        );
    }

    #[test]
    fn test_parse_content_disposition() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="report.pdf""#).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            parse_content_disposition("attachment; filename=plain.txt; size=12").as_deref(),
            Some("plain.txt")
        );
        assert!(parse_content_disposition("attachment").is_none());
    }

    #[test]
    fn test_confirm_cookie_regex() {
        let cookie = "download_warning_13058876669334088843_ABC123=t0kEn; Path=/; Domain=.google.com";
        let token = CONFIRM_COOKIE
            .captures(cookie)
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_owned()));
        assert_eq!(token.as_deref(), Some("t0kEn"));
    }
}
