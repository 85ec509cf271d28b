use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::assignment_dto::{AssignmentRequest, AssignmentResponse, RevokeRequest};
use crate::dto::ApiResponse;
use crate::models::parking_assignment::AssignmentFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

pub fn create_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_assignments).post(create_assignment))
        .route("/active", get(list_active_assignments))
        .route("/by-client/:client_id", get(list_client_assignments))
        .route(
            "/:id",
            get(get_assignment).put(update_assignment).delete(delete_assignment),
        )
        .route("/:id/revoke", post(revoke_assignment))
}

async fn search_assignments(
    State(state): State<AppState>,
    Query(filter): Query<AssignmentFilter>,
) -> Result<(HeaderMap, Json<Vec<AssignmentResponse>>), AppError> {
    let controller = AssignmentController::new(&state);
    let (assignments, total) = controller.search(filter).await?;

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(TOTAL_COUNT_HEADER), HeaderValue::from(total));
    Ok((headers, Json(assignments)))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentResponse>>), AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_active_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.list_active().await?))
}

async fn list_client_assignments(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.list_by_client(client_id).await?))
}

async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let controller = AssignmentController::new(&state);
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// El cuerpo es opcional: POST sin body revoca sin motivo
async fn revoke_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<RevokeRequest>>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let request = body.map(|Json(request)| request).unwrap_or_default();
    Ok(Json(controller.revoke(id, request).await?))
}
