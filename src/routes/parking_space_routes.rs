use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::parking_space_controller::ParkingSpaceController;
use crate::dto::entity_dto::{CreateSpaceRequest, UpdateSpaceRequest};
use crate::dto::ApiResponse;
use crate::models::parking_space::{ParkingSpace, SpaceFilter, SpaceType};
use crate::services::ReconcileReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_parking_space_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_spaces).post(create_space))
        .route("/available", get(list_available_spaces))
        .route("/zones", get(list_zones))
        .route("/types", get(list_space_types))
        .route("/reconcile", post(reconcile_spaces))
        .route("/:id", get(get_space).put(update_space).delete(delete_space))
        .route("/:id/recompute", post(recompute_space))
}

async fn list_spaces(
    State(state): State<AppState>,
    Query(filter): Query<SpaceFilter>,
) -> Result<Json<Vec<ParkingSpace>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.list(filter).await?))
}

async fn create_space(
    State(state): State<AppState>,
    Json(request): Json<CreateSpaceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ParkingSpace>>), AppError> {
    let controller = ParkingSpaceController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_available_spaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParkingSpace>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.list_available().await?))
}

async fn list_zones(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.list_zones().await?))
}

async fn list_space_types(State(state): State<AppState>) -> Result<Json<Vec<SpaceType>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.list_types().await?))
}

async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ParkingSpace>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSpaceRequest>,
) -> Result<Json<ApiResponse<ParkingSpace>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let controller = ParkingSpaceController::new(&state);
    controller.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn recompute_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ParkingSpace>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.recompute(id).await?))
}

async fn reconcile_spaces(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReconcileReport>>, AppError> {
    let controller = ParkingSpaceController::new(&state);
    Ok(Json(controller.reconcile().await?))
}
