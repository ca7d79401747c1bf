use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{pick_f64, pick_str};
use crate::ytdlp;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub uploader: Option<String>,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub video_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchResult>,
}

pub fn run(query: &str, config: &Config) -> Result<SearchResponse, ApiError> {
    let hits = ytdlp::search(
        &config.ytdlp_bin,
        query,
        config.search_limit,
        config.ytdlp_timeout_secs,
    )?;

    let results: Vec<SearchResult> = hits.iter().filter_map(hit_to_result).collect();

    Ok(SearchResponse {
        success: true,
        query: query.to_string(),
        results,
    })
}

pub(crate) fn hit_to_result(hit: &Value) -> Option<SearchResult> {
    let video_id = pick_str(hit, &["id"])?;

    // flat-playlist hits carry a thumbnails array instead of a single URL;
    // the last entry is the largest
    let thumbnail = pick_str(hit, &["thumbnail"]).or_else(|| {
        hit.get("thumbnails")
            .and_then(Value::as_array)
            .and_then(|thumbs| thumbs.last())
            .and_then(|thumb| pick_str(thumb, &["url"]))
    });

    let url = pick_str(hit, &["url", "webpage_url"])
        .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={video_id}"));

    Some(SearchResult {
        title: pick_str(hit, &["title"])?,
        uploader: pick_str(hit, &["uploader", "channel"]),
        duration: pick_f64(hit, &["duration"]),
        thumbnail,
        video_id,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_mapping() {
        let hit = json!({
            "id": "dQw4w9WgXcQ",
            "title": "A Song",
            "channel": "The Channel",
            "duration": 212.0,
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "thumbnails": [
                {"url": "https://i.ytimg.com/vi/x/default.jpg"},
                {"url": "https://i.ytimg.com/vi/x/hq720.jpg"}
            ]
        });

        let result = hit_to_result(&hit).unwrap();
        assert_eq!(result.video_id, "dQw4w9WgXcQ");
        assert_eq!(result.title, "A Song");
        assert_eq!(result.uploader.as_deref(), Some("The Channel"));
        assert_eq!(result.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/x/hq720.jpg"));
        assert_eq!(result.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_hit_without_url_builds_watch_url() {
        let hit = json!({"id": "abc123xyz00", "title": "No URL"});
        let result = hit_to_result(&hit).unwrap();
        assert_eq!(result.url, "https://www.youtube.com/watch?v=abc123xyz00");
    }

    #[test]
    fn test_hit_without_id_is_skipped() {
        let hit = json!({"title": "malformed"});
        assert!(hit_to_result(&hit).is_none());
    }
}
