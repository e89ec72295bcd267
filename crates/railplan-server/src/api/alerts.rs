use crate::api::{error_response, storage_error_response, success_response, ApiJson};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use railplan_common::i18n::TRANSLATIONS;
use railplan_common::types::{AlertConfig, SaveAlertConfigRequest};
use railplan_notify::OutgoingMessage;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Serialize, ToSchema)]
struct TestAlertResponse {
    sent: bool,
    /// Recipient address
    to: String,
}

/// Current alert configuration, or the defaults if none was saved yet.
#[utoipa::path(
    get,
    path = "/api/alerts/config",
    tag = "Alerts",
    responses(
        (status = 200, description = "Alert configuration", body = AlertConfig)
    )
)]
async fn get_alert_config(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.store.get_alert_config().await {
        Ok(config) => success_response(StatusCode::OK, &trace_id, config.unwrap_or_default()),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Create or overwrite the single alert configuration.
#[utoipa::path(
    post,
    path = "/api/alerts/config",
    tag = "Alerts",
    request_body = SaveAlertConfigRequest,
    responses(
        (status = 200, description = "Configuration saved", body = AlertConfig),
        (status = 400, description = "delay_min out of range", body = crate::api::ApiError)
    )
)]
async fn save_alert_config(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SaveAlertConfigRequest>,
) -> impl IntoResponse {
    let delay_min = match i32::try_from(req.delay_min) {
        Ok(v) if v >= 0 => v,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &trace_id,
                "bad_request",
                &format!("delay_min out of range: {}", req.delay_min),
            )
        }
    };
    match state
        .store
        .save_alert_config(req.email.trim(), delay_min, &req.alert_types)
        .await
    {
        Ok(config) => {
            tracing::info!(
                delay_min,
                alert_types = %config.alert_types,
                "Alert configuration saved"
            );
            tracing::debug!(email = %config.email, "Alert recipient updated");
            success_response(StatusCode::OK, &trace_id, config)
        }
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Send a test email to the configured address.
#[utoipa::path(
    post,
    path = "/api/alerts/test",
    tag = "Alerts",
    responses(
        (status = 200, description = "Test email sent", body = TestAlertResponse),
        (status = 400, description = "No email configured", body = crate::api::ApiError),
        (status = 500, description = "SMTP failure, message carries the transport error", body = crate::api::ApiError)
    )
)]
async fn test_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let config = match state.store.get_alert_config().await {
        Ok(config) => config,
        Err(e) => return storage_error_response(&trace_id, &e),
    };
    let Some(email) = config.map(|c| c.email).filter(|e| !e.trim().is_empty()) else {
        let msg = TRANSLATIONS.get(state.locale(), "api.email_not_configured", "No email configured");
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "email_not_configured", msg);
    };

    let Some(mailer) = state.mailer.as_ref() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &trace_id,
            "mail_error",
            "Email transport is not configured",
        );
    };

    let message = OutgoingMessage::test_alert(state.locale());
    match mailer.send(&email, &message).await {
        Ok(()) => success_response(
            StatusCode::OK,
            &trace_id,
            TestAlertResponse {
                sent: true,
                to: email,
            },
        ),
        Err(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, "Test alert failed");
            tracing::debug!(trace_id = %trace_id, to = %email, "Failed test alert recipient");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "mail_error",
                &e.to_string(),
            )
        }
    }
}

pub fn alert_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_alert_config, save_alert_config))
        .routes(routes!(test_alert))
}
