use crate::api::filters::TrainQueryParams;
use crate::api::{error_response, storage_error_response};
use crate::export::{export_filename, trains_to_csv};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Download the filtered train list as a `;`-separated CSV file.
#[utoipa::path(
    get,
    path = "/api/export/csv",
    tag = "Export",
    params(TrainQueryParams),
    responses(
        (status = 200, description = "CSV attachment (UTF-8 with BOM)", content_type = "text/csv"),
        (status = 400, description = "Invalid filter value", body = crate::api::ApiError)
    )
)]
async fn export_csv(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<TrainQueryParams>,
) -> Response {
    let filter = match params.to_filter() {
        Ok(f) => f,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg),
    };
    let trains = match state.store.list_trains(&filter).await {
        Ok(trains) => trains,
        Err(e) => return storage_error_response(&trace_id, &e),
    };
    let body = match trains_to_csv(&trains, state.locale()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, "CSV export failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "internal_error",
                "CSV export failed",
            );
        }
    };

    let filename = export_filename(Local::now().naive_local());
    tracing::info!(rows = trains.len(), filename = %filename, "Trains exported");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub fn export_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(export_csv))
}
