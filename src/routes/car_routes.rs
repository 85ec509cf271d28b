use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::car_controller::CarController;
use crate::dto::entity_dto::{CreateCarRequest, UpdateCarRequest};
use crate::dto::ApiResponse;
use crate::models::car::{Car, CarFilter};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/:id", get(get_car).put(update_car).delete(delete_car))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(filter): Query<CarFilter>,
) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(&state);
    Ok(Json(controller.list(filter).await?))
}

async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Car>>), AppError> {
    let controller = CarController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Car>, AppError> {
    let controller = CarController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let controller = CarController::new(&state);
    controller.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
