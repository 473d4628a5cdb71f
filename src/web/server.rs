use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::WebConfig;
use crate::trajectory::TrajectoryPoint;

use super::api::points as point_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;
use super::store::PointStore;

pub fn router(config: &WebConfig, points: Vec<TrajectoryPoint>) -> Router {
    let state = AppState {
        store: Arc::new(PointStore::new(points)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/api/points", get(point_handlers::list_points))
        .route("/api/points/{index}", get(point_handlers::get_point))
        .route("/api/paths", get(point_handlers::list_paths))
        .route("/api/summary", get(point_handlers::summary))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = &config.static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: WebConfig, points: Vec<TrajectoryPoint>) -> std::io::Result<()> {
    log::info!("Serving {} point(s)", points.len());
    let app = router(&config, points);

    log::info!("Starting server on {}", config.bind);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await
}
