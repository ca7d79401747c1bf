use crate::error::ApiError;
use serde_json::Value;
use std::process::Command;

/// Dump full metadata for one media page URL as a single JSON document.
/// Playlist-style pages (e.g. multi-image posts) come back with an `entries`
/// array; single items come back flat.
pub fn inspect(bin: &str, url: &str, timeout_secs: u64) -> Result<Value, ApiError> {
    let output = Command::new(bin)
        .args([
            "--dump-single-json",
            "--no-warnings",
            "--socket-timeout",
            &timeout_secs.to_string(),
            url,
        ])
        .output()
        .map_err(|err| ApiError::Upstream(format!("failed to run {bin}: {err}")))?;

    if !output.status.success() {
        return Err(ApiError::Upstream(stderr_line(&output.stderr, bin)));
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|err| ApiError::Upstream(format!("{bin} produced malformed JSON: {err}")))
}

/// Run a `ytsearch<N>:` query. Flat playlist mode prints one JSON object per
/// line, one per hit.
pub fn search(bin: &str, query: &str, limit: usize, timeout_secs: u64) -> Result<Vec<Value>, ApiError> {
    let output = Command::new(bin)
        .args([
            "-j",
            "--flat-playlist",
            "--no-warnings",
            "--socket-timeout",
            &timeout_secs.to_string(),
            &format!("ytsearch{limit}:{query}"),
        ])
        .output()
        .map_err(|err| ApiError::Upstream(format!("failed to run {bin}: {err}")))?;

    if !output.status.success() {
        return Err(ApiError::Upstream(stderr_line(&output.stderr, bin)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let hits = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    Ok(hits)
}

fn stderr_line(stderr: &[u8], bin: &str) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.is_empty() {
        format!("{bin} exited with an error")
    } else {
        // last line carries the actual ERROR: message
        text.lines().last().unwrap_or(text).to_string()
    }
}

/// Best video rendition: max height among formats that actually carry video
/// and a direct URL.
pub fn best_video(formats: &[Value]) -> Option<&Value> {
    formats
        .iter()
        .filter(|f| has_url(f) && codec_present(f, "vcodec"))
        .max_by_key(|f| f.get("height").and_then(Value::as_u64).unwrap_or(0))
}

/// Best audio rendition: max average bitrate among audio-only formats.
pub fn best_audio(formats: &[Value]) -> Option<&Value> {
    formats
        .iter()
        .filter(|f| has_url(f) && codec_present(f, "acodec") && !codec_present(f, "vcodec"))
        .max_by_key(|f| {
            f.get("abr")
                .and_then(Value::as_f64)
                .map(|abr| abr.round() as u64)
                .unwrap_or(0)
        })
}

fn has_url(format: &Value) -> bool {
    format
        .get("url")
        .and_then(Value::as_str)
        .is_some_and(|url| !url.is_empty())
}

fn codec_present(format: &Value, key: &str) -> bool {
    match format.get(key).and_then(Value::as_str) {
        None => false,
        Some("none") | Some("") => false,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture_formats() -> Vec<Value> {
        vec![
            json!({"format_id": "sb0", "url": "https://cdn/storyboard", "vcodec": "none", "acodec": "none"}),
            json!({"format_id": "140", "url": "https://cdn/m4a", "vcodec": "none", "acodec": "mp4a.40.2", "abr": 129.5}),
            json!({"format_id": "251", "url": "https://cdn/opus", "vcodec": "none", "acodec": "opus", "abr": 160.0}),
            json!({"format_id": "18", "url": "https://cdn/360", "vcodec": "avc1", "acodec": "mp4a", "height": 360}),
            json!({"format_id": "22", "url": "https://cdn/720", "vcodec": "avc1", "acodec": "mp4a", "height": 720}),
            json!({"format_id": "313", "url": "https://cdn/2160-noaudio", "vcodec": "vp9", "acodec": "none", "height": 2160}),
        ]
    }

    #[test]
    fn test_best_video_is_max_height() {
        let formats = fixture_formats();
        let best = best_video(&formats).unwrap();
        assert_eq!(best["format_id"], "313");
        assert_eq!(best["height"], 2160);
    }

    #[test]
    fn test_best_audio_is_max_abr_audio_only() {
        let formats = fixture_formats();
        let best = best_audio(&formats).unwrap();
        assert_eq!(best["format_id"], "251");
    }

    #[test]
    fn test_muxed_formats_are_not_audio_candidates() {
        // format 22 has the highest "abr-ish" potential but carries video
        let formats = vec![
            json!({"format_id": "22", "url": "https://cdn/720", "vcodec": "avc1", "acodec": "mp4a", "abr": 192.0}),
            json!({"format_id": "140", "url": "https://cdn/m4a", "vcodec": "none", "acodec": "mp4a", "abr": 128.0}),
        ];
        assert_eq!(best_audio(&formats).unwrap()["format_id"], "140");
    }

    #[test]
    fn test_no_candidates() {
        let formats = vec![
            json!({"format_id": "sb0", "url": "https://cdn/sb", "vcodec": "none", "acodec": "none"}),
            json!({"format_id": "broken", "vcodec": "avc1", "acodec": "mp4a", "height": 1080}),
        ];
        assert!(best_video(&formats).is_none());
        assert!(best_audio(&formats).is_none());
    }
}
