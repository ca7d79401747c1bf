use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{self, pick_str};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct TikTokResponse {
    pub success: bool,
    pub title: Option<String>,
    pub video_url: String,
    pub audio_url: Option<String>,
    pub thumbnail: Option<String>,
    pub author: Option<String>,
}

pub fn fetch(url: &str, config: &Config) -> Result<TikTokResponse, ApiError> {
    let client = upstream::client(Duration::from_secs(config.upstream.timeout_secs))?;
    resolve_with(&config.upstream.tiktok_apis, url, |request_url| {
        upstream::get_json(&client, request_url)
    })
}

/// Ordered fallback: providers are tried in sequence and the first one whose
/// response yields a video URL wins; the rest are never contacted. When every
/// provider fails, the caller gets one aggregate error naming each failure.
pub fn resolve_with<F>(providers: &[String], url: &str, fetch: F) -> Result<TikTokResponse, ApiError>
where
    F: Fn(&str) -> Result<Value, ApiError>,
{
    let mut failures = Vec::new();

    for provider in providers {
        let request_url = match provider_request_url(provider, url) {
            Ok(request_url) => request_url,
            Err(err) => {
                failures.push(format!("{provider}: {err}"));
                continue;
            }
        };

        match fetch(&request_url) {
            Ok(payload) => match normalize(&payload) {
                Some(resp) => return Ok(resp),
                None => {
                    log::warn!("tiktok provider {provider} returned no video URL");
                    failures.push(format!("{provider}: response had no video URL"));
                }
            },
            Err(err) => {
                log::warn!("tiktok provider {provider} failed: {err}");
                failures.push(format!("{provider}: {err}"));
            }
        }
    }

    Err(ApiError::Upstream(format!(
        "all tiktok providers failed: {}",
        failures.join("; ")
    )))
}

fn provider_request_url(base: &str, url: &str) -> Result<String, ApiError> {
    let mut request_url = url::Url::parse(base)
        .map_err(|err| ApiError::Upstream(format!("bad provider URL {base}: {err}")))?;
    request_url.query_pairs_mut().append_pair("url", url);
    Ok(request_url.to_string())
}

/// Success marker: a video URL must be extractable. Key chains cover the
/// shapes the known mirrors answer with.
fn normalize(payload: &Value) -> Option<TikTokResponse> {
    // tikwm-style mirrors signal failure with a nonzero code
    if payload
        .get("code")
        .and_then(Value::as_i64)
        .is_some_and(|code| code != 0)
    {
        return None;
    }

    let video_url = pick_str(
        payload,
        &[
            "data.play",
            "data.wmplay",
            "video.noWatermark",
            "video.watermark",
            "result.video",
        ],
    )?;

    Some(TikTokResponse {
        success: true,
        title: pick_str(payload, &["data.title", "title", "result.title"]),
        video_url,
        audio_url: pick_str(payload, &["data.music", "music.play_url", "result.music"]),
        thumbnail: pick_str(
            payload,
            &["data.cover", "data.origin_cover", "video.cover", "result.cover"],
        ),
        author: pick_str(
            payload,
            &[
                "data.author.nickname",
                "data.author.unique_id",
                "author.name",
                "result.author",
            ],
        ),
    })
}
