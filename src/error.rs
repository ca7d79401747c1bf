use axum::response::IntoResponse;
use serde_json::json;

/// Every failure a handler can produce. Handlers convert their own upstream
/// errors into one of these; nothing else crosses the HTTP boundary.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("URL required")]
    UrlRequired,

    #[error("Query required")]
    QueryRequired,

    /// Input failed a local pattern match (e.g. no recognizable Drive id).
    #[error("{0}")]
    InvalidInput(String),

    /// Upstream was reachable but no usable media was located.
    #[error("{0}")]
    NotFound(String),

    /// Network error, timeout, non-2xx or malformed payload from upstream.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ApiError::UrlRequired | ApiError::QueryRequired | ApiError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_)
            | ApiError::Reqwest(_)
            | ApiError::IO(_)
            | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Tell axum how to convert `ApiError` into a response. The body is always a
// single `{"error": ...}` object, never a partial success.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self:?}");
        }
        (status, json!({"error": self.to_string()}).to_string()).into_response()
    }
}
