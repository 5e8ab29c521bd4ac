//! HTTP API
//!
//! JSON endpoints over the sanitization engine:
//! - `POST /v1/scan` - canonical matches and per-severity stats
//! - `POST /v1/sanitize` - redacted text, report, and a residual check
//! - `POST /v1/validate` - residual matches only
//! - `GET /v1/patterns` - detector catalogue
//! - `GET /v1/audit`, `GET /v1/audit/{id}` - audit trail, when enabled

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use scrubline_observability::{ComponentStatus, Metrics, ReadinessChecker};
use scrubline_sanitizer::{
    CanonicalMatchSet, PatternInfo, RedactionMode, SanitizationResult, Sanitizer, Severity,
    SeverityStats, Validation,
};
use scrubline_storage::{AuditRecord, AuditStore, JsonFileSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use uuid::Uuid;

pub type SharedAuditStore = Arc<AuditStore<JsonFileSnapshot>>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Input too large: {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Request body too large: {0}")]
    BodyTooLarge(String),

    /// Extractor rejection carrying axum's own status
    #[error("Invalid request: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            ApiError::InputTooLarge { .. } | ApiError::BodyTooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "input_too_large")
            }
            ApiError::Rejected { status, .. } => (*status, "invalid_request_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "type": error_type,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::BodyTooLarge(rejection.body_text()),
            status => ApiError::Rejected {
                status,
                message: rejection.body_text(),
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Clone)]
pub struct AppState {
    pub sanitizer: Sanitizer,
    pub metrics: Arc<Metrics>,
    pub audit: Option<SharedAuditStore>,
    pub max_input_bytes: usize,
}

impl AppState {
    /// Unwrap a JSON body, counting oversized bodies as rejected input
    fn accept_json<T>(&self, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
        match payload {
            Ok(Json(request)) => Ok(request),
            Err(rejection) => {
                let error = ApiError::from(rejection);
                if matches!(error, ApiError::BodyTooLarge(_)) {
                    self.metrics.record_rejection("input_too_large");
                }
                Err(error)
            }
        }
    }

    fn check_size(&self, text: &str) -> Result<(), ApiError> {
        if text.len() > self.max_input_bytes {
            self.metrics.record_rejection("input_too_large");
            return Err(ApiError::InputTooLarge {
                size: text.len(),
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub matches: CanonicalMatchSet,
    pub stats: SeverityStats,
}

#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub text: String,
    #[serde(default)]
    pub redaction_mode: Option<RedactionMode>,
    #[serde(default)]
    pub mask_char: Option<char>,
    #[serde(default)]
    pub min_severity: Option<Severity>,
}

#[derive(Debug, Serialize)]
pub struct SanitizeResponse {
    #[serde(flatten)]
    pub result: SanitizationResult,
    pub stats: SeverityStats,
    pub validation: Validation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub text: String,
    #[serde(default)]
    pub min_severity: Option<Severity>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    // JSON escaping can grow a body up to six bytes per text byte
    let body_limit = state
        .max_input_bytes
        .saturating_mul(6)
        .saturating_add(4096);

    Router::new()
        .route("/v1/scan", post(scan))
        .route("/v1/sanitize", post(sanitize))
        .route("/v1/validate", post(validate))
        .route("/v1/patterns", get(patterns))
        .route("/v1/audit", get(list_audit))
        .route("/v1/audit/{id}", get(get_audit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run CPU-bound scanning off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Scan task failed: {}", e)))
}

async fn scan(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> ApiResult<ScanResponse> {
    let request = state.accept_json(payload)?;
    state.check_size(&request.text)?;

    let started = Instant::now();
    let sanitizer = state.sanitizer.clone();
    let matches = run_blocking(move || sanitizer.scan(&request.text)).await?;
    state
        .metrics
        .record_request("scan", &matches, started.elapsed().as_secs_f64());

    let stats = SeverityStats::from_matches(&matches);
    Ok(Json(ScanResponse { matches, stats }))
}

async fn sanitize(
    State(state): State<AppState>,
    payload: Result<Json<SanitizeRequest>, JsonRejection>,
) -> ApiResult<SanitizeResponse> {
    let request = state.accept_json(payload)?;
    state.check_size(&request.text)?;

    let mut config = state.sanitizer.config().clone();
    if let Some(mode) = request.redaction_mode {
        config.redaction_mode = mode;
    }
    if let Some(mask_char) = request.mask_char {
        if mask_char.is_control() {
            return Err(ApiError::InvalidRequest(
                "mask_char must be a printable character".to_string(),
            ));
        }
        config.mask_char = mask_char;
    }
    if let Some(min_severity) = request.min_severity {
        config.min_severity = min_severity;
    }

    let started = Instant::now();
    let sanitizer = state.sanitizer.clone();
    let (result, validation) = run_blocking(move || {
        let result = sanitizer.sanitize_with(&request.text, &config);
        let validation = sanitizer.validate_with(&result.sanitized_text, &config);
        (result, validation)
    })
    .await?;
    state
        .metrics
        .record_request("sanitize", &result.matches, started.elapsed().as_secs_f64());

    if !validation.ok {
        state.metrics.record_validation_failure();
        warn!(
            residual = validation.residual.len(),
            kinds = ?validation.residual.kinds(),
            "Sanitized output still contains detectable spans"
        );
    }

    let audit_id = match &state.audit {
        Some(store) => Some(store.record(AuditRecord::from_result(&result)).await),
        None => None,
    };

    let stats = result.stats();
    Ok(Json(SanitizeResponse {
        result,
        stats,
        validation,
        audit_id,
    }))
}

async fn validate(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> ApiResult<Validation> {
    let request = state.accept_json(payload)?;
    state.check_size(&request.text)?;

    let min_severity = request.min_severity.unwrap_or(Severity::Low);
    let started = Instant::now();
    let sanitizer = state.sanitizer.clone();
    let validation = run_blocking(move || {
        let config = sanitizer.config().clone().with_min_severity(min_severity);
        sanitizer.validate_with(&request.text, &config)
    })
    .await?;
    state.metrics.record_request(
        "validate",
        &validation.residual,
        started.elapsed().as_secs_f64(),
    );

    if !validation.ok {
        state.metrics.record_validation_failure();
        debug!(residual = validation.residual.len(), "Validation found residual matches");
    }

    Ok(Json(validation))
}

async fn patterns(State(state): State<AppState>) -> Json<Vec<PatternInfo>> {
    Json(state.sanitizer.registry().catalogue())
}

fn audit_store(state: &AppState) -> Result<&SharedAuditStore, ApiError> {
    state
        .audit
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Audit trail is disabled".to_string()))
}

async fn list_audit(State(state): State<AppState>) -> ApiResult<Vec<AuditRecord>> {
    let store = audit_store(&state)?;
    Ok(Json(store.list().await))
}

async fn get_audit(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<AuditRecord> {
    let Path(id) = id?;
    let store = audit_store(&state)?;
    store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Audit record {} not found", id)))
}

/// Readiness of the detector registry and the audit store
pub struct ServiceReadiness {
    pub sanitizer: Sanitizer,
    pub audit: Option<SharedAuditStore>,
}

impl ReadinessChecker for ServiceReadiness {
    fn components(&self) -> Vec<ComponentStatus> {
        let patterns = self.sanitizer.registry().len();
        let registry = if patterns == 0 {
            ComponentStatus::unhealthy("registry", "no detectors registered")
        } else {
            ComponentStatus::healthy("registry", Some(format!("{} patterns", patterns)))
        };

        let mut components = vec![registry];
        if let Some(store) = &self.audit {
            let detail = store.is_dirty().then(|| "pending flush".to_string());
            components.push(ComponentStatus::healthy("audit", detail));
        }
        components
    }
}
