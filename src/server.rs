use crate::{config::Config, error::ApiError, platforms};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

const ENDPOINTS: [&str; 10] = [
    "/api/youtube",
    "/api/instagram",
    "/api/pinterest",
    "/api/spotify",
    "/api/gdrive",
    "/api/github",
    "/api/twitter",
    "/api/tiktok",
    "/api/mediafire",
    "/api/facebook",
];

#[derive(Clone)]
struct SharedState {
    config: Config,
}

pub fn router(config: Config) -> Router {
    let shared_state = Arc::new(SharedState { config });

    Router::new()
        .route("/", get(home))
        .route("/api/youtube", get(youtube))
        .route("/api/instagram", get(instagram))
        .route("/api/pinterest", get(pinterest))
        .route("/api/spotify", get(spotify))
        .route("/api/gdrive", get(gdrive))
        .route("/api/github", get(github))
        .route("/api/twitter", get(twitter))
        .route("/api/tiktok", get(tiktok))
        .route("/api/mediafire", get(mediafire))
        .route("/api/facebook", get(facebook))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(config: Config) {
    let addr = format!("{}:{}", config.bind, config.port);
    let app = router(config);

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    log::info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

pub fn start_daemon(config: Config) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(config).await });
}

#[derive(Debug, Clone, Default, Deserialize)]
struct UrlParams {
    url: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Absent and empty both count as missing. No URL-format validation happens
/// here; the handlers do their own pattern checks.
fn required(param: Option<String>, missing: ApiError) -> Result<String, ApiError> {
    param
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(missing)
}

async fn home() -> Json<Value> {
    Json(json!({
        "status": "mediagrab API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ENDPOINTS,
    }))
}

async fn youtube(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::youtube::YoutubeResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || {
        platforms::youtube::fetch(&url, params.format.as_deref(), &state.config).map(Json)
    })
}

async fn instagram(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::instagram::InstagramResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::instagram::fetch(&url, &state.config).map(Json))
}

async fn pinterest(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::pinterest::PinterestResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::pinterest::fetch(&url, &state.config).map(Json))
}

// spotify-labeled for compatibility; the handler is a video search
async fn spotify(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<platforms::search::SearchResponse>, ApiError> {
    let query = required(params.q, ApiError::QueryRequired)?;
    tokio::task::block_in_place(move || platforms::search::run(&query, &state.config).map(Json))
}

async fn gdrive(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::gdrive::GdriveResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::gdrive::fetch(&url, &state.config).map(Json))
}

async fn github(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::github::GithubResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::github::fetch(&url, &state.config).map(Json))
}

async fn twitter(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::twitter::TwitterResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::twitter::fetch(&url, &state.config).map(Json))
}

async fn tiktok(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::tiktok::TikTokResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::tiktok::fetch(&url, &state.config).map(Json))
}

async fn mediafire(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::mediafire::MediafireResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::mediafire::fetch(&url, &state.config).map(Json))
}

async fn facebook(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<UrlParams>,
) -> Result<Json<platforms::facebook::FacebookResponse>, ApiError> {
    let url = required(params.url, ApiError::UrlRequired)?;
    tokio::task::block_in_place(move || platforms::facebook::fetch(&url, &state.config).map(Json))
}
