use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND: &str = "0.0.0.0";
/// Default timeout for upstream REST/page fetches.
const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// Socket timeout handed to yt-dlp.
const DEFAULT_YTDLP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_YTDLP_BIN: &str = "yt-dlp";
const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Third-party REST mirrors. These drift and die regularly, so they are all
/// swappable without a rebuild; the normalizers tolerate the known shapes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Ordered fallback chain for TikTok. The first provider that yields a
    /// video URL wins; later ones are never contacted.
    #[serde(default = "default_tiktok_apis")]
    pub tiktok_apis: Vec<String>,

    /// Host substituted into the tweet URL to get a JSON rendition of it.
    #[serde(default = "default_twitter_api_host")]
    pub twitter_api_host: String,

    #[serde(default = "default_mediafire_api")]
    pub mediafire_api: String,

    #[serde(default = "default_facebook_api")]
    pub facebook_api: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            tiktok_apis: default_tiktok_apis(),
            twitter_api_host: default_twitter_api_host(),
            mediafire_api: default_mediafire_api(),
            facebook_api: default_facebook_api(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_tiktok_apis() -> Vec<String> {
    vec![
        "https://www.tikwm.com/api/".to_string(),
        "https://api.tiklydown.eu.org/api/download".to_string(),
    ]
}

fn default_twitter_api_host() -> String {
    "api.vxtwitter.com".to_string()
}

fn default_mediafire_api() -> String {
    "https://mediafire-api.vercel.app/api/info".to_string()
}

fn default_facebook_api() -> String {
    "https://fdown-api.vercel.app/api/info".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind")]
    pub bind: String,

    /// yt-dlp executable. Override when it lives outside PATH.
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,

    #[serde(default = "default_ytdlp_timeout_secs")]
    pub ytdlp_timeout_secs: u64,

    /// Result count for the search endpoint.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            ytdlp_bin: default_ytdlp_bin(),
            ytdlp_timeout_secs: default_ytdlp_timeout_secs(),
            search_limit: default_search_limit(),
            upstream: UpstreamConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_ytdlp_bin() -> String {
    DEFAULT_YTDLP_BIN.to_string()
}

fn default_ytdlp_timeout_secs() -> u64 {
    DEFAULT_YTDLP_TIMEOUT_SECS
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Config {
    /// Load from a YAML file, writing the defaults out on first run.
    /// `PORT` in the environment wins over the file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut config: Self = if Path::new(path).exists() {
            let config_str = std::fs::read_to_string(path)?;
            serde_yml::from_str(&config_str)
                .map_err(|err| anyhow::anyhow!("config is malformed: {err}"))?
        } else {
            let config = Self::default();
            std::fs::write(path, serde_yml::to_string(&config)?)?;
            config
        };

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port number: {port}"))?;
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.upstream.tiktok_apis.is_empty() {
            anyhow::bail!("upstream.tiktok_apis must list at least one provider");
        }
        if self.upstream.timeout_secs == 0 {
            anyhow::bail!("upstream.timeout_secs must be greater than 0");
        }
        if self.search_limit == 0 {
            anyhow::bail!("search_limit must be greater than 0");
        }
        Ok(())
    }
}
