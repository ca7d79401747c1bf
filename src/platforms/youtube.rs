use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{pick_f64, pick_str};
use crate::ytdlp;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct YoutubeResponse {
    pub success: bool,
    pub title: String,
    pub thumbnail: Option<String>,
    pub download_url: String,
    pub quality: String,
    pub format: String,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
}

pub fn fetch(
    url: &str,
    format_hint: Option<&str>,
    config: &Config,
) -> Result<YoutubeResponse, ApiError> {
    let info = ytdlp::inspect(&config.ytdlp_bin, url, config.ytdlp_timeout_secs)?;
    build_response(&info, format_hint)
}

pub(crate) fn build_response(
    info: &Value,
    format_hint: Option<&str>,
) -> Result<YoutubeResponse, ApiError> {
    let formats = info
        .get("formats")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let want_audio = matches!(format_hint, Some("mp3"));

    let (best, quality, format) = if want_audio {
        let best = ytdlp::best_audio(formats)
            .ok_or_else(|| ApiError::NotFound("no audio format available".to_string()))?;
        let abr = best
            .get("abr")
            .and_then(Value::as_f64)
            .map(|abr| abr.round() as u64)
            .unwrap_or(0);
        (best, format!("{abr}kbps"), "mp3".to_string())
    } else {
        let best = ytdlp::best_video(formats)
            .ok_or_else(|| ApiError::NotFound("no video format available".to_string()))?;
        let height = best.get("height").and_then(Value::as_u64).unwrap_or(0);
        (best, format!("{height}p"), "mp4".to_string())
    };

    let download_url = pick_str(best, &["url"])
        .ok_or_else(|| ApiError::NotFound("selected format has no URL".to_string()))?;

    Ok(YoutubeResponse {
        success: true,
        title: pick_str(info, &["title"]).unwrap_or_else(|| "Unknown".to_string()),
        thumbnail: pick_str(info, &["thumbnail"]),
        download_url,
        quality,
        format,
        duration: pick_f64(info, &["duration"]),
        uploader: pick_str(info, &["uploader", "channel"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "title": "Some Video",
            "thumbnail": "https://i.ytimg.com/vi/x/hq720.jpg",
            "duration": 213.0,
            "uploader": "Channel Name",
            "formats": [
                {"format_id": "140", "url": "https://cdn/m4a", "vcodec": "none", "acodec": "mp4a", "abr": 129.478},
                {"format_id": "18", "url": "https://cdn/360", "vcodec": "avc1", "acodec": "mp4a", "height": 360},
                {"format_id": "22", "url": "https://cdn/720", "vcodec": "avc1", "acodec": "mp4a", "height": 720}
            ]
        })
    }

    #[test]
    fn test_default_is_best_video() {
        let resp = build_response(&fixture(), None).unwrap();
        assert_eq!(resp.download_url, "https://cdn/720");
        assert_eq!(resp.quality, "720p");
        assert_eq!(resp.format, "mp4");
        assert_eq!(resp.title, "Some Video");
        assert_eq!(resp.uploader.as_deref(), Some("Channel Name"));
    }

    #[test]
    fn test_mp3_hint_picks_audio() {
        let resp = build_response(&fixture(), Some("mp3")).unwrap();
        assert_eq!(resp.download_url, "https://cdn/m4a");
        assert_eq!(resp.quality, "129kbps");
        assert_eq!(resp.format, "mp3");
    }

    #[test]
    fn test_mp4_hint_same_as_default() {
        let resp = build_response(&fixture(), Some("mp4")).unwrap();
        assert_eq!(resp.download_url, "https://cdn/720");
    }

    #[test]
    fn test_no_formats_is_not_found() {
        let info = json!({"title": "Empty", "formats": []});
        assert!(matches!(
            build_response(&info, None),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            build_response(&info, Some("mp3")),
            Err(ApiError::NotFound(_))
        ));
    }
}
