use crate::config::Config;
use crate::error::ApiError;
use crate::upstream::{self, pick, pick_str};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Image CDN URLs as they appear in raw (often JSON-escaped) page text.
static PINIMG_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https:\\?/\\?/i\.pinimg\.com[^"'\s<>]+"#)
        .expect("failed to compile pinimg regex")
});

#[derive(Debug, Clone, Serialize)]
pub struct PinterestResponse {
    pub success: bool,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail: Option<String>,
    pub is_video: bool,
}

pub fn fetch(url: &str, config: &Config) -> Result<PinterestResponse, ApiError> {
    let client = upstream::client(Duration::from_secs(config.upstream.timeout_secs))?;
    let html = upstream::get_text(&client, url)?;
    extract_from_html(&html)
}

/// Structured payload first; the regex sweep only runs when the embedded JSON
/// is absent or yields nothing.
pub(crate) fn extract_from_html(html: &str) -> Result<PinterestResponse, ApiError> {
    if let Some(resp) = extract_structured(html) {
        return Ok(resp);
    }

    if let Some(image_url) = extract_fallback_image(html) {
        return Ok(PinterestResponse {
            success: true,
            title: None,
            thumbnail: Some(image_url.clone()),
            image_url: Some(image_url),
            video_url: None,
            is_video: false,
        });
    }

    Err(ApiError::NotFound(
        "could not extract media from pinterest page".to_string(),
    ))
}

fn extract_structured(html: &str) -> Option<PinterestResponse> {
    let document = scraper::Html::parse_document(html);

    let props_selector = scraper::Selector::parse("script#__PWS_INITIAL_PROPS__").unwrap();
    let state_selector = scraper::Selector::parse("script#initial-state").unwrap();

    let json_text: String = document
        .select(&props_selector)
        .next()
        .or_else(|| document.select(&state_selector).next())
        .map(|el| el.text().collect())?;

    let json: Value = serde_json::from_str(&json_text).ok()?;

    let pins = pick(
        &json,
        &["initialReduxState.pins", "props.initialReduxState.pins"],
    )?;
    let pin = pins.as_object()?.values().next()?;

    let title = pick_str(
        pin,
        &["title", "grid_title", "closeup_unified_description", "description"],
    );
    let image_url = pick_str(pin, &["images.orig.url"]);
    let video_url = widest_video(pin);

    if image_url.is_none() && video_url.is_none() {
        return None;
    }

    Some(PinterestResponse {
        success: true,
        title,
        thumbnail: image_url.clone(),
        is_video: video_url.is_some(),
        image_url,
        video_url,
    })
}

/// Video pins list renditions keyed by name (V_720P, ...); take the widest.
fn widest_video(pin: &Value) -> Option<String> {
    let video_list = pick(pin, &["videos.video_list"])?.as_object()?;

    video_list
        .values()
        .filter_map(|variant| {
            let width = variant.get("width").and_then(Value::as_u64)?;
            let url = variant.get("url").and_then(Value::as_str)?;
            Some((width, url))
        })
        .max_by_key(|(width, _)| *width)
        .map(|(_, url)| url.to_owned())
}

fn extract_fallback_image(html: &str) -> Option<String> {
    PINIMG_URL
        .find(html)
        .map(|m| m.as_str().replace("\\/", "/"))
}
