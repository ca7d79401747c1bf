use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::pick_str;
use crate::ytdlp;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct InstagramItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstagramResponse {
    pub success: bool,
    pub items: Vec<InstagramItem>,
    pub title: String,
}

pub fn fetch(url: &str, config: &Config) -> Result<InstagramResponse, ApiError> {
    let info = ytdlp::inspect(&config.ytdlp_bin, url, config.ytdlp_timeout_secs)?;
    build_response(&info)
}

pub(crate) fn build_response(info: &Value) -> Result<InstagramResponse, ApiError> {
    let title = pick_str(info, &["title", "description"]).unwrap_or_else(|| "Instagram media".to_string());

    // carousels come back as a playlist with `entries`, single posts come flat
    let entries: Vec<&Value> = match info.get("entries").and_then(Value::as_array) {
        Some(entries) => entries.iter().collect(),
        None => vec![info],
    };

    let items: Vec<InstagramItem> = entries.into_iter().filter_map(item_from_entry).collect();

    if items.is_empty() {
        return Err(ApiError::NotFound("no media found in post".to_string()));
    }

    Ok(InstagramResponse {
        success: true,
        items,
        title,
    })
}

fn item_from_entry(entry: &Value) -> Option<InstagramItem> {
    let formats = entry.get("formats").and_then(Value::as_array);

    let url = formats
        .map(Vec::as_slice)
        .and_then(ytdlp::best_video)
        .and_then(|best| pick_str(best, &["url"]))
        .or_else(|| pick_str(entry, &["url"]))?;

    let is_video = crate::upstream::pick_f64(entry, &["duration"]).is_some()
        || formats
            .map(Vec::as_slice)
            .and_then(ytdlp::best_video)
            .is_some();

    let kind = if is_video { "video" } else { "image" };

    Some(InstagramItem {
        kind: kind.to_string(),
        url,
        thumbnail: pick_str(entry, &["thumbnail"]),
        title: pick_str(entry, &["title"]),
    })
}
