use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    TourGuideError,
    app::TourGuide,
    assistant::AssistantResponse,
    models::{Coordinates, Poi},
    poi::NearbyPoi,
};

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FavoriteStatus {
    pub id: String,
    pub favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub command: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn status_for(err: &TourGuideError) -> StatusCode {
    match err {
        TourGuideError::NotFound { .. } => StatusCode::NOT_FOUND,
        TourGuideError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => {
            warn!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn router(guide: TourGuide) -> Router {
    Router::new()
        .route("/pois", get(get_pois))
        .route("/pois/nearby", get(get_nearby))
        .route("/pois/{id}", get(get_poi))
        .route("/favorites", get(get_favorites))
        .route("/favorites", delete(clear_favorites))
        .route("/favorites/{id}", get(get_favorite_status))
        .route("/favorites/{id}/toggle", post(toggle_favorite))
        .route("/assistant", post(ask_assistant))
        .with_state(guide)
}

async fn get_pois(State(guide): State<TourGuide>) -> Json<Vec<Poi>> {
    Json(guide.catalog.get_all().to_vec())
}

async fn get_poi(
    State(guide): State<TourGuide>,
    Path(id): Path<String>,
) -> Result<Json<Poi>, StatusCode> {
    let poi = guide.catalog.get_by_id(&id).map_err(|e| status_for(&e))?;
    Ok(Json(poi.clone()))
}

async fn get_nearby(
    State(guide): State<TourGuide>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<NearbyPoi>>, StatusCode> {
    let center = Coordinates::validated(params.lat, params.lon).map_err(|e| status_for(&e))?;
    let radius = params.radius.unwrap_or(guide.default_radius_km);
    let nearby = guide
        .proximity
        .nearby(&center, radius)
        .map_err(|e| status_for(&e))?;
    Ok(Json(nearby))
}

async fn get_favorites(State(guide): State<TourGuide>) -> Json<Vec<Poi>> {
    Json(guide.favorites.list_favorites().await)
}

async fn get_favorite_status(
    State(guide): State<TourGuide>,
    Path(id): Path<String>,
) -> Json<FavoriteStatus> {
    let favorite = guide.favorites.is_favorite(&id).await;
    Json(FavoriteStatus { id, favorite })
}

async fn toggle_favorite(
    State(guide): State<TourGuide>,
    Path(id): Path<String>,
) -> Result<Json<FavoriteStatus>, StatusCode> {
    guide.catalog.get_by_id(&id).map_err(|e| status_for(&e))?;
    let favorite = guide
        .favorites
        .toggle_favorite(&id)
        .await
        .map_err(|e| status_for(&e))?;
    Ok(Json(FavoriteStatus { id, favorite }))
}

async fn clear_favorites(State(guide): State<TourGuide>) -> Result<StatusCode, StatusCode> {
    guide.favorites.clear().await.map_err(|e| status_for(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn ask_assistant(
    State(guide): State<TourGuide>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>, StatusCode> {
    let response = match (request.latitude, request.longitude) {
        (Some(lat), Some(lon)) => {
            let position = Coordinates::validated(lat, lon).map_err(|e| status_for(&e))?;
            guide.assistant.process_at(&request.command, position).await
        }
        (None, None) => guide.assistant.process(&request.command).await,
        _ => return Err(StatusCode::BAD_REQUEST),
    };
    Ok(Json(response))
}
