use crate::error::ApiError;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Blocking client shared by every REST/scrape handler. One fixed timeout,
/// no retries.
pub fn client(timeout: Duration) -> Result<reqwest::blocking::Client, ApiError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT_DEFAULT)
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// One GET, JSON body expected. Non-2xx and malformed payloads both surface
/// as `Upstream` so the handler can report the raw failure text.
pub fn get_json(client: &reqwest::blocking::Client, url: &str) -> Result<Value, ApiError> {
    log::debug!("GET {url}");
    let resp = client.get(url).send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!("{url} returned {status}")));
    }

    resp.json::<Value>()
        .map_err(|err| ApiError::Upstream(format!("{url} returned malformed JSON: {err}")))
}

pub fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, ApiError> {
    log::debug!("GET {url}");
    let resp = client.get(url).send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!("{url} returned {status}")));
    }

    Ok(resp.text()?)
}

/// Walk dotted key paths in order and return the first value present.
/// Mirrored upstream APIs drift between shapes like `result.url`, `data.url`
/// and `link`; handlers list the known spellings once instead of nesting
/// conditionals.
pub fn pick<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        path.split('.')
            .try_fold(root, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    })
}

/// `pick` for string leaves; empty strings count as absent.
pub fn pick_str(root: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        path.split('.')
            .try_fold(root, |value, key| value.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// `pick` for numeric leaves; numbers serialized as strings also count.
pub fn pick_f64(root: &Value, paths: &[&str]) -> Option<f64> {
    pick(root, paths).and_then(|value| {
        value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_first_path_wins() {
        let v = json!({"result": {"url": "a"}, "link": "b"});
        assert_eq!(pick_str(&v, &["result.url", "data.url", "link"]), Some("a".into()));
    }

    #[test]
    fn test_pick_same_value_whichever_key_is_populated() {
        // The normalization property: alternate keys carry the same logical value.
        let shapes = vec![
            json!({"result": {"url": "https://cdn.example/v.mp4"}}),
            json!({"data": {"url": "https://cdn.example/v.mp4"}}),
            json!({"link": "https://cdn.example/v.mp4"}),
        ];
        for shape in shapes {
            assert_eq!(
                pick_str(&shape, &["result.url", "data.url", "link"]).as_deref(),
                Some("https://cdn.example/v.mp4")
            );
        }
    }

    #[test]
    fn test_pick_skips_null_and_empty() {
        let v = json!({"result": {"url": null}, "data": {"url": ""}, "link": "x"});
        assert_eq!(pick_str(&v, &["result.url", "data.url", "link"]), Some("x".into()));
    }

    #[test]
    fn test_pick_none_when_all_absent() {
        let v = json!({"unrelated": true});
        assert_eq!(pick_str(&v, &["result.url", "data.url", "link"]), None);
        assert!(pick(&v, &["result.url"]).is_none());
    }

    #[test]
    fn test_pick_f64_accepts_string_numbers() {
        let v = json!({"size": "1024"});
        assert_eq!(pick_f64(&v, &["size"]), Some(1024.0));
        let v = json!({"duration": 12.5});
        assert_eq!(pick_f64(&v, &["duration"]), Some(12.5));
    }
}
