use crate::api::{storage_error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use railplan_storage::TrainSummary;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Counters over every train, regardless of filters
#[derive(Serialize, ToSchema)]
struct StatsResponse {
    #[schema(example = 5)]
    total: u64,
    #[schema(example = 2)]
    en_route: u64,
    #[schema(example = 2)]
    scheduled: u64,
    #[schema(example = 0)]
    arrived: u64,
    #[schema(example = 1)]
    alert: u64,
    /// Sum of all tonnages (t)
    #[schema(example = 9500)]
    tonnage_total: i64,
}

impl From<TrainSummary> for StatsResponse {
    fn from(s: TrainSummary) -> Self {
        Self {
            total: s.total,
            en_route: s.en_route,
            scheduled: s.scheduled,
            arrived: s.arrived,
            alert: s.alert,
            tonnage_total: s.tonnage_total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Train counters", body = StatsResponse)
    )
)]
async fn stats(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.store.train_summary().await {
        Ok(summary) => success_response(StatusCode::OK, &trace_id, StatsResponse::from(summary)),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn stats_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(stats))
}
