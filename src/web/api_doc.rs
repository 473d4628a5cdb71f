use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::store::{DatasetSummary, LatLon, PointDetail, TrackPath};
use crate::trajectory::TrajectoryPoint;
use crate::weather::WeatherSummary;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::points::list_points,
        super::api::points::get_point,
        super::api::points::list_paths,
        super::api::points::summary,
    ),
    components(
        schemas(
            TrajectoryPoint,
            WeatherSummary,
            PointDetail,
            TrackPath,
            LatLon,
            DatasetSummary,
            ErrorResponse,
        )
    ),
    info(
        title = "Balloon Track API",
        description = "Reconstructed balloon trajectories with aligned weather",
        version = "0.1.0"
    ),
    tags(
        (name = "points", description = "Trajectory points and paths")
    )
)]
pub struct ApiDoc;
