use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{header, Method, StatusCode},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use url::{Host, Url};

use crate::error::{Result, AppError};
use crate::api::models::{ExtractRequest, ExtractResponse};
use crate::api::response;
use crate::config::AllowedOrigin;
use crate::keypoints::derive_key_points;
use crate::scraper::extract_text;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origin);

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/extract", post(extract_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(origin: &AllowedOrigin) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match origin {
        AllowedOrigin::Any => layer.allow_origin(Any),
        AllowedOrigin::Exact(origin) => layer.allow_origin(origin.clone()),
    }
}

async fn root() -> &'static str {
    "Server is up"
}

async fn health() -> &'static str {
    "API is healthy"
}

async fn extract_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExtractResponse>)> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Err(AppError::InvalidInput(rejection.body_text())),
    };
    let Some(requested) = req.url else {
        return Err(AppError::InvalidInput("missing url".to_string()));
    };
    let url = validate_url(&requested)?;

    tracing::info!("Processing request for URL: {}", url);
    let start_time = std::time::Instant::now();

    // Set an overall timeout for the entire pipeline
    let result = tokio::time::timeout(
        state.config.request_timeout,
        process_extract_request(&state, &url, &requested),
    )
    .await;

    let elapsed = start_time.elapsed();
    tracing::info!("Request processing took: {:?}", elapsed);

    match result {
        Ok(Ok(response_data)) => {
            tracing::info!("Successfully processed URL: {}", url);
            Ok(response::success(response_data))
        }
        Ok(Err(err)) => Err(err),
        Err(_) => Err(AppError::Timeout(format!("{} after {:?}", url, elapsed))),
    }
}

async fn process_extract_request(state: &AppState, url: &Url, requested: &str) -> Result<ExtractResponse> {
    let fetch_start = std::time::Instant::now();
    let content = extract_text(url.as_str()).await?;
    tracing::info!(
        "Extracted {} chars in {:?}",
        content.chars().count(),
        fetch_start.elapsed()
    );

    let llm_start = std::time::Instant::now();
    let summary = state.summarizer.summarize(&content).await?;
    tracing::info!("Summarization call succeeded in {:?}", llm_start.elapsed());

    // Key points come from the page text, not the summary
    let key_points = derive_key_points(&content);
    tracing::debug!("Derived {} key points", key_points.len());

    Ok(ExtractResponse::new(
        derive_title(url),
        requested.to_string(),
        summary.text_or_placeholder(),
        key_points,
    ))
}

/// Accepts only absolute `http`/`https` URLs with a host. Leading
/// whitespace fails the prefix check.
pub fn validate_url(raw: &str) -> Result<Url> {
    if !raw.starts_with("http") {
        return Err(AppError::InvalidInput(format!("{:?} does not start with http", raw)));
    }

    let url = Url::parse(raw).map_err(|e| AppError::InvalidInput(format!("{:?}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(AppError::InvalidInput(format!("{:?} is not an http(s) URL with a host", raw)));
    }

    Ok(url)
}

/// Second label of the host name (`www.bbc.co.uk` -> `bbc`). Single-label
/// hosts and IP addresses come back whole.
pub fn derive_title(url: &Url) -> String {
    match url.host() {
        Some(Host::Domain(domain)) => domain
            .split('.')
            .nth(1)
            .filter(|label| !label.is_empty())
            .unwrap_or(domain)
            .to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    }
}
