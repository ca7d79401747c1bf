use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{self, pick_str};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct FacebookFormat {
    pub quality: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacebookResponse {
    pub success: bool,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub formats: Vec<FacebookFormat>,
}

pub fn fetch(url: &str, config: &Config) -> Result<FacebookResponse, ApiError> {
    let mut request_url = url::Url::parse(&config.upstream.facebook_api).map_err(|err| {
        ApiError::Upstream(format!(
            "bad facebook api URL {}: {err}",
            config.upstream.facebook_api
        ))
    })?;
    request_url.query_pairs_mut().append_pair("url", url);

    let client = upstream::client(Duration::from_secs(config.upstream.timeout_secs))?;
    let payload = upstream::get_json(&client, request_url.as_str())?;
    normalize(&payload)
}

fn normalize(payload: &Value) -> Result<FacebookResponse, ApiError> {
    let mut formats = Vec::new();

    // hd first so callers that just take the head get the best rendition
    if let Some(url) = pick_str(payload, &["links.hd", "hd", "data.hd", "result.hd"]) {
        formats.push(FacebookFormat {
            quality: "hd".to_string(),
            url,
        });
    }
    if let Some(url) = pick_str(payload, &["links.sd", "sd", "data.sd", "result.sd"]) {
        formats.push(FacebookFormat {
            quality: "sd".to_string(),
            url,
        });
    }

    if formats.is_empty() {
        return Err(ApiError::NotFound(
            "no downloadable formats in upstream response".to_string(),
        ));
    }

    Ok(FacebookResponse {
        success: true,
        title: pick_str(payload, &["title", "data.title", "result.title"]),
        thumbnail: pick_str(payload, &["thumbnail", "data.thumbnail", "thumb", "result.thumbnail"]),
        formats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_links_shape() {
        let payload = json!({
            "title": "a reel",
            "thumbnail": "https://scontent.example/t.jpg",
            "links": {
                "hd": "https://video.example/hd.mp4",
                "sd": "https://video.example/sd.mp4"
            }
        });

        let resp = normalize(&payload).unwrap();
        assert_eq!(resp.formats.len(), 2);
        assert_eq!(resp.formats[0].quality, "hd");
        assert_eq!(resp.formats[0].url, "https://video.example/hd.mp4");
        assert_eq!(resp.formats[1].quality, "sd");
    }

    #[test]
    fn test_normalize_flat_sd_only() {
        let payload = json!({"sd": "https://video.example/only-sd.mp4"});

        let resp = normalize(&payload).unwrap();
        assert_eq!(resp.formats.len(), 1);
        assert_eq!(resp.formats[0].quality, "sd");
    }

    #[test]
    fn test_normalize_no_formats_is_not_found() {
        let payload = json!({"title": "private video"});
        assert!(matches!(normalize(&payload), Err(ApiError::NotFound(_))));
    }
}
