pub mod alerts;
pub mod export;
pub mod filters;
pub mod stats;
pub mod trains;

use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use railplan_storage::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Error envelope
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    /// Error code, see `to_custom_error_code`
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
}

/// Response envelope shared by every JSON endpoint
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// 0 on success
    pub err_code: i32,
    /// `success` on success
    pub err_msg: String,
    pub trace_id: String,
    pub data: Option<T>,
}

pub fn success_response<T>(status: StatusCode, trace_id: &str, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            err_code: 0,
            err_msg: "success".to_string(),
            trace_id: trace_id.to_string(),
            data: Some(data),
        }),
    )
        .into_response()
}

fn to_custom_error_code(code: &str) -> i32 {
    match code {
        "bad_request" => 1001,
        "not_found" => 1004,
        "payload_too_large" => 1013,
        "email_not_configured" => 1201,
        "mail_error" => 1202,
        "storage_error" => 1501,
        "internal_error" => 1500,
        _ => 1999,
    }
}

pub fn error_response(status: StatusCode, trace_id: &str, code: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: to_custom_error_code(code),
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

/// JSON body extractor that reports rejections (bad syntax, missing fields,
/// wrong content type) through the error envelope as `bad_request`, keeping
/// axum's status code.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_default();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(error_response(
                rejection.status(),
                &trace_id,
                "bad_request",
                &rejection.body_text(),
            )),
        }
    }
}

/// Map a storage failure to 404 or 500.
pub fn storage_error_response(trace_id: &str, err: &StorageError) -> Response {
    if err.is_not_found() {
        return error_response(StatusCode::NOT_FOUND, trace_id, "not_found", &err.to_string());
    }
    tracing::error!(trace_id = %trace_id, error = %err, "Storage operation failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        trace_id,
        "storage_error",
        "Database error",
    )
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    version: String,
    uptime_secs: i64,
    /// `ok` or `error`
    storage_status: String,
    /// Whether an SMTP transport is configured
    mailer_configured: bool,
}

/// Service health and storage reachability.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let uptime = (Utc::now() - state.start_time).num_seconds();
    let storage_status = match state.store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            "error"
        }
    };
    success_response(
        StatusCode::OK,
        &trace_id,
        HealthResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: uptime,
            storage_status: storage_status.to_string(),
            mailer_configured: state.mailer.is_some(),
        },
    )
}

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .merge(trains::train_routes())
        .merge(export::export_routes())
        .merge(alerts::alert_routes())
        .merge(stats::stats_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(to_custom_error_code("bad_request"), 1001);
        assert_eq!(to_custom_error_code("not_found"), 1004);
        assert_eq!(to_custom_error_code("payload_too_large"), 1013);
        assert_eq!(to_custom_error_code("email_not_configured"), 1201);
        assert_eq!(to_custom_error_code("mail_error"), 1202);
        assert_eq!(to_custom_error_code("storage_error"), 1501);
        assert_eq!(to_custom_error_code("internal_error"), 1500);
        assert_eq!(to_custom_error_code("something_else"), 1999);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = StorageError::NotFound {
            entity: "train",
            id: "TRN-042".to_string(),
        };
        let resp = storage_error_response("abc", &err);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
