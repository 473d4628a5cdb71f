use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::trajectory::TrajectoryPoint;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;
use crate::web::store::{DatasetSummary, PointDetail, TrackPath};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PointsQuery {
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub with_weather: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/points",
    tag = "points",
    params(
        ("source_file" = Option<String>, Query, description = "Only points from this snapshot file"),
        ("with_weather" = Option<bool>, Query, description = "Only points with (true) or without (false) weather")
    ),
    responses(
        (status = 200, description = "Trajectory points in reconstruction order", body = Vec<TrajectoryPoint>)
    )
)]
pub async fn list_points(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> Json<Vec<TrajectoryPoint>> {
    Json(
        state
            .store
            .filter(query.source_file.as_deref(), query.with_weather),
    )
}

#[utoipa::path(
    get,
    path = "/api/points/{index}",
    tag = "points",
    params(
        ("index" = usize, Path, description = "Position of the point in the document")
    ),
    responses(
        (status = 200, description = "Point with heading/wind comparison", body = PointDetail),
        (status = 404, description = "No point at this index", body = ErrorResponse)
    )
)]
pub async fn get_point(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Json<PointDetail>> {
    state
        .store
        .detail(index)
        .map(Json)
        .ok_or(ApiError::NotFound("point_not_found"))
}

#[utoipa::path(
    get,
    path = "/api/paths",
    tag = "points",
    responses(
        (status = 200, description = "One polyline per snapshot file", body = Vec<TrackPath>)
    )
)]
pub async fn list_paths(State(state): State<AppState>) -> Json<Vec<TrackPath>> {
    Json(state.store.paths())
}

#[utoipa::path(
    get,
    path = "/api/summary",
    tag = "points",
    responses(
        (status = 200, description = "Dataset counts", body = DatasetSummary)
    )
)]
pub async fn summary(State(state): State<AppState>) -> Json<DatasetSummary> {
    Json(state.store.summary())
}
