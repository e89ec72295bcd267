use crate::api::filters::TrainQueryParams;
use crate::api::{error_response, storage_error_response, success_response, ApiJson};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use railplan_common::i18n::TRANSLATIONS;
use railplan_common::types::{
    validate_train, CreateTrainRequest, Train, TrainStatus, UpdateTrainRequest,
};
use railplan_storage::{NewTrain, TrainLookup};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Identifiers of a deleted train
#[derive(Serialize, ToSchema)]
struct DeletedTrain {
    id: i64,
    train_id: String,
}

/// List trains, optionally filtered, ordered by departure.
#[utoipa::path(
    get,
    path = "/api/trains",
    tag = "Trains",
    params(TrainQueryParams),
    responses(
        (status = 200, description = "Trains ordered by departure", body = Vec<Train>),
        (status = 400, description = "Invalid filter value", body = crate::api::ApiError)
    )
)]
async fn list_trains(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<TrainQueryParams>,
) -> impl IntoResponse {
    let filter = match params.to_filter() {
        Ok(f) => f,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg),
    };
    match state.store.list_trains(&filter).await {
        Ok(trains) => success_response(StatusCode::OK, &trace_id, trains),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Create a train; the `TRN-NNN` identifier is assigned by the server.
#[utoipa::path(
    post,
    path = "/api/trains",
    tag = "Trains",
    request_body = CreateTrainRequest,
    responses(
        (status = 201, description = "Train created", body = Train),
        (status = 400, description = "Inconsistent tonnage or dates", body = crate::api::ApiError),
        (status = 422, description = "Missing or malformed field")
    )
)]
async fn create_train(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTrainRequest>,
) -> impl IntoResponse {
    if let Err(msg) = validate_train(req.tonnage, &req.depart, &req.arrivee) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg);
    }

    let client = match req.client {
        Some(client) if !client.trim().is_empty() => client,
        _ => TRANSLATIONS
            .get(state.locale(), "train.unknown_client", "Unknown client")
            .to_string(),
    };
    let new = NewTrain {
        rail: req.rail,
        cargo: req.cargo,
        tonnage: req.tonnage,
        client,
        depart: req.depart,
        arrivee: req.arrivee,
        status: req.status.unwrap_or(TrainStatus::Scheduled),
        notes: req.notes.unwrap_or_default(),
    };

    match state.store.insert_train(&new).await {
        Ok(train) => {
            tracing::info!(train_id = %train.train_id, rail = %train.rail, "Train created");
            success_response(StatusCode::CREATED, &trace_id, train)
        }
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Update the fields present in the body; the identifier never changes.
#[utoipa::path(
    put,
    path = "/api/trains/{id}",
    tag = "Trains",
    params(("id" = String, Path, description = "Row id or TRN-NNN code")),
    request_body = UpdateTrainRequest,
    responses(
        (status = 200, description = "Train updated", body = Train),
        (status = 400, description = "Inconsistent tonnage or dates", body = crate::api::ApiError),
        (status = 404, description = "Train not found", body = crate::api::ApiError)
    )
)]
async fn update_train(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTrainRequest>,
) -> impl IntoResponse {
    let lookup = TrainLookup::parse(&id);
    let current = match state.store.get_train(&lookup).await {
        Ok(Some(train)) => train,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                &trace_id,
                "not_found",
                &format!("Train {lookup} not found"),
            )
        }
        Err(e) => return storage_error_response(&trace_id, &e),
    };

    let tonnage = req.tonnage.unwrap_or(current.tonnage);
    let depart = req.depart.unwrap_or(current.depart);
    let arrivee = req.arrivee.unwrap_or(current.arrivee);
    if let Err(msg) = validate_train(tonnage, &depart, &arrivee) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg);
    }

    match state.store.update_train(&lookup, &req).await {
        Ok(train) => {
            tracing::info!(train_id = %train.train_id, "Train updated");
            success_response(StatusCode::OK, &trace_id, train)
        }
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Delete a train.
#[utoipa::path(
    delete,
    path = "/api/trains/{id}",
    tag = "Trains",
    params(("id" = String, Path, description = "Row id or TRN-NNN code")),
    responses(
        (status = 200, description = "Train deleted", body = DeletedTrain),
        (status = 404, description = "Train not found", body = crate::api::ApiError)
    )
)]
async fn delete_train(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let lookup = TrainLookup::parse(&id);
    match state.store.delete_train(&lookup).await {
        Ok(train) => {
            tracing::info!(train_id = %train.train_id, "Train deleted");
            success_response(
                StatusCode::OK,
                &trace_id,
                DeletedTrain {
                    id: train.id,
                    train_id: train.train_id,
                },
            )
        }
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn train_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_trains, create_train))
        .routes(routes!(update_train, delete_train))
}
