use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::client_controller::ClientController;
use crate::dto::entity_dto::{CreateClientRequest, UpdateClientRequest};
use crate::dto::ApiResponse;
use crate::models::client::{Client, ClientFilter};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
}

async fn list_clients(
    State(state): State<AppState>,
    Query(filter): Query<ClientFilter>,
) -> Result<Json<Vec<Client>>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.list(filter).await?))
}

async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>), AppError> {
    let controller = ClientController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let controller = ClientController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let controller = ClientController::new(&state);
    controller.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
