use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RailPlan API",
        description = "Freight train movements on a three-rail yard",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Trains", description = "Train movements"),
        (name = "Export", description = "CSV export"),
        (name = "Alerts", description = "Alert configuration and test email"),
        (name = "Stats", description = "Aggregate counters")
    )
)]
struct ApiDoc;

const INDEX_HTML: &str = include_str!("../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_http_app(state: AppState) -> Router {
    let (api_router, api_spec) = api::api_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(api_spec);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .merge(api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", merged_spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}

