use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{self, pick_f64, pick_str};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct TwitterResponse {
    pub success: bool,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub formats: Vec<String>,
    pub download_url: String,
}

pub fn fetch(url: &str, config: &Config) -> Result<TwitterResponse, ApiError> {
    let api_url = rewrite_to_api(url, &config.upstream.twitter_api_host)?;
    let client = upstream::client(Duration::from_secs(config.upstream.timeout_secs))?;
    let payload = upstream::get_json(&client, &api_url)?;
    normalize(&payload)
}

/// vxtwitter-style APIs mirror the status path under their own host, so the
/// upstream request URL is the tweet URL with the host swapped.
pub fn rewrite_to_api(url: &str, api_host: &str) -> Result<String, ApiError> {
    let mut parsed = url::Url::parse(url)
        .map_err(|_| ApiError::InvalidInput("not a valid URL".to_string()))?;

    let host = parsed.host_str().unwrap_or_default();
    let is_tweet_host = host == "twitter.com"
        || host.ends_with(".twitter.com")
        || host == "x.com"
        || host.ends_with(".x.com");
    if !is_tweet_host {
        return Err(ApiError::InvalidInput("not a twitter/x URL".to_string()));
    }

    parsed
        .set_host(Some(api_host))
        .map_err(|err| ApiError::Upstream(format!("bad api host {api_host}: {err}")))?;

    Ok(parsed.to_string())
}

fn normalize(payload: &Value) -> Result<TwitterResponse, ApiError> {
    let media = payload.get("media_extended").and_then(Value::as_array);

    let mut formats = Vec::new();
    let mut thumbnail = None;
    let mut duration = None;

    if let Some(media) = media {
        for entry in media {
            if let Some(url) = pick_str(entry, &["url", "direct_url", "link"]) {
                formats.push(url);
            }
            if thumbnail.is_none() {
                thumbnail = pick_str(entry, &["thumbnail_url", "thumbnail"]);
            }
            if duration.is_none() {
                duration = pick_f64(entry, &["duration_millis"])
                    .map(|ms| ms / 1000.0)
                    .or_else(|| pick_f64(entry, &["duration"]));
            }
        }
    }

    // flat mirrors list plain media URLs instead
    if formats.is_empty() {
        if let Some(urls) = payload.get("mediaURLs").and_then(Value::as_array) {
            formats.extend(urls.iter().filter_map(|u| u.as_str().map(str::to_owned)));
        }
    }

    let download_url = formats
        .first()
        .cloned()
        .ok_or_else(|| ApiError::NotFound("no downloadable media on tweet".to_string()))?;

    Ok(TwitterResponse {
        success: true,
        title: pick_str(payload, &["text", "title", "description"]),
        thumbnail,
        duration,
        formats,
        download_url,
    })
}
