// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers exposing the validation engine to UI and server callers.
//!
//! Responses carry error codes and plain-text messages only. Transport
//! security headers are left to the deployment.

use crate::config::Config;
use crate::error::ErrorCode;
use crate::metrics::Metrics;
use crate::token::{TokenStrength, DEFAULT_TOKEN_LENGTH};
use crate::upload::FileCandidate;
use crate::validator::{SubmissionValidator, ValidationResult};
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Longest token the HTTP surface will generate.
pub const MAX_TOKEN_LENGTH: usize = 256;

/// Shared application state.
pub struct AppState {
    pub validator: SubmissionValidator,
    pub metrics: Metrics,
    pub config: Config,
}

/// Error entry in a response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ErrorCode> for ErrorBody {
    fn from(code: &ErrorCode) -> Self {
        Self {
            code: *code,
            message: code.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// URL submission request.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub url: String,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// URL submission response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub accepted: bool,
    pub sanitized_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    pub errors: Vec<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
    pub checked_at: DateTime<Utc>,
}

/// Free-text validation request.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Upload metadata validation request.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub file: Option<FileCandidate>,
}

/// Generic validation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub accepted: bool,
    pub sanitized_value: String,
    pub errors: Vec<ErrorBody>,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(result: ValidationResult) -> Self {
        Self {
            accepted: result.accepted,
            errors: result.errors.iter().map(ErrorBody::from).collect(),
            sanitized_value: result.sanitized_value,
        }
    }
}

/// Token request query.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub length: Option<usize>,
}

/// Token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub strength: TokenStrength,
}

/// Embed URL request.
#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub reference: String,
}

/// Embed URL response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    pub embed_url: String,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/validate", post(validate))
        .route("/validate/text", post(validate_text))
        .route("/upload/validate", post(validate_upload))
        .route("/token", get(token))
        .route("/embed", post(embed));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "embed-guard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Validate a submitted video URL.
///
/// The rate-limit identifier is the peer address. The body `identifier` is
/// used only when `rate_limit.trust_client_identifier` is set.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(req): Json<SubmitRequest>,
) -> Response {
    let identifier = rate_limit_identifier(
        state.config.rate_limit.trust_client_identifier,
        req.identifier,
        connect_info,
    );

    debug!(identifier = %identifier, "Processing submission");

    let result = state
        .validator
        .validate_submission(&req.url, &identifier, Instant::now());
    state.metrics.observe_submission(result.accepted, &result.errors);

    let embed_url = match &result.reference {
        Some(reference) => match state.validator.build_embed_url(reference.as_str()) {
            Ok(url) => Some(url),
            Err(err) => {
                error!(error = %err, "Accepted reference failed embed construction");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        None => None,
    };

    let status = if result.accepted {
        StatusCode::OK
    } else if result.is_rate_limited() {
        StatusCode::TOO_MANY_REQUESTS
    } else {
        info!(identifier = %identifier, errors = ?result.errors, "Submission rejected");
        StatusCode::UNPROCESSABLE_ENTITY
    };

    // Round up so clients never retry early
    let retry_after_secs = result
        .retry_after
        .map(|d| d.as_secs() + u64::from(d.subsec_nanos() > 0));

    let body = Json(SubmitResponse {
        accepted: result.accepted,
        sanitized_value: result.sanitized_value,
        reference: result.reference.map(|r| r.to_string()),
        embed_url,
        errors: result.errors.iter().map(ErrorBody::from).collect(),
        retry_after_secs,
        checked_at: Utc::now(),
    });

    match retry_after_secs {
        Some(secs) => (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response(),
        None => (status, body).into_response(),
    }
}

/// Validate and neutralize free text.
pub async fn validate_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> (StatusCode, Json<ValidationResponse>) {
    let result = state.validator.validate_text(&req.text);
    state.metrics.observe_errors(&result.errors);
    (status_for(&result), Json(result.into()))
}

/// Validate upload metadata.
pub async fn validate_upload(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> (StatusCode, Json<ValidationResponse>) {
    let result = state.validator.validate_file_upload(req.file.as_ref());
    state.metrics.observe_upload(result.accepted, &result.errors);
    if !result.accepted {
        info!(errors = ?result.errors, "Upload rejected");
    }
    (status_for(&result), Json(result.into()))
}

/// Generate a random token.
pub async fn token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Response {
    let length = query.length.unwrap_or(DEFAULT_TOKEN_LENGTH);
    if length == 0 || length > MAX_TOKEN_LENGTH {
        return (
            StatusCode::BAD_REQUEST,
            format!("length must be between 1 and {MAX_TOKEN_LENGTH}"),
        )
            .into_response();
    }

    let token = state.validator.generate_token(length);
    state.metrics.observe_token(token.strength);
    Json(TokenResponse {
        token: token.value,
        strength: token.strength,
    })
    .into_response()
}

/// Build the embed URL for a reference.
pub async fn embed(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmbedRequest>,
) -> Response {
    match state.validator.build_embed_url(&req.reference) {
        Ok(embed_url) => Json(EmbedResponse { embed_url }).into_response(),
        Err(err) => {
            state.metrics.observe_errors(&[err.code()]);
            (StatusCode::BAD_REQUEST, Json(ErrorBody::from(&err.code()))).into_response()
        }
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn rate_limit_identifier(
    trust_client: bool,
    claimed: Option<String>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> String {
    claimed
        .filter(|id| trust_client && !id.trim().is_empty())
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "anonymous".to_string())
}

fn status_for(result: &ValidationResult) -> StatusCode {
    if result.accepted {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}
