use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{self, pick, pick_str};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct MediafireResponse {
    pub success: bool,
    pub filename: Option<String>,
    pub size: Option<String>,
    pub download_url: String,
}

pub fn fetch(url: &str, config: &Config) -> Result<MediafireResponse, ApiError> {
    let mut request_url = url::Url::parse(&config.upstream.mediafire_api).map_err(|err| {
        ApiError::Upstream(format!(
            "bad mediafire api URL {}: {err}",
            config.upstream.mediafire_api
        ))
    })?;
    request_url.query_pairs_mut().append_pair("url", url);

    let client = upstream::client(Duration::from_secs(config.upstream.timeout_secs))?;
    let payload = upstream::get_json(&client, request_url.as_str())?;
    normalize(&payload)
}

fn normalize(payload: &Value) -> Result<MediafireResponse, ApiError> {
    let download_url = pick_str(
        payload,
        &[
            "result.url",
            "data.url",
            "link",
            "result.link",
            "data.link",
            "download_url",
            "url",
        ],
    )
    .ok_or_else(|| ApiError::NotFound("no download link in upstream response".to_string()))?;

    let filename = pick_str(
        payload,
        &[
            "result.filename",
            "data.filename",
            "filename",
            "result.name",
            "data.name",
            "name",
        ],
    );

    // size arrives as "10.5MB" on some mirrors and as a byte count on others
    let size = pick(payload, &["result.size", "data.size", "size"]).and_then(|value| {
        value
            .as_str()
            .map(str::to_owned)
            .or_else(|| value.as_u64().map(|n| n.to_string()))
    });

    Ok(MediafireResponse {
        success: true,
        filename,
        size,
        download_url,
    })
}
