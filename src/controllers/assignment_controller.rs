use validator::Validate;

use crate::dto::assignment_dto::{AssignmentRequest, AssignmentResponse, RevokeRequest};
use crate::dto::ApiResponse;
use crate::models::parking_assignment::{AssignmentDraft, AssignmentFilter};
use crate::services::{AllocationEngine, Proposal};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct AssignmentController {
    engine: AllocationEngine,
}

impl AssignmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            engine: state.engine.clone(),
        }
    }

    pub async fn create(
        &self,
        request: AssignmentRequest,
    ) -> Result<ApiResponse<AssignmentResponse>, AppError> {
        request.validate()?;

        let assignment = self
            .engine
            .propose(AssignmentDraft::from(request), Proposal::Create)
            .await?;

        Ok(ApiResponse::success_with_message(
            assignment.into(),
            "Asignación creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        request: AssignmentRequest,
    ) -> Result<ApiResponse<AssignmentResponse>, AppError> {
        request.validate()?;

        let assignment = self
            .engine
            .propose(AssignmentDraft::from(request), Proposal::Update { id })
            .await?;

        Ok(ApiResponse::success_with_message(
            assignment.into(),
            "Asignación actualizada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<AssignmentResponse, AppError> {
        Ok(self.engine.get(id).await?.into())
    }

    pub async fn search(
        &self,
        filter: AssignmentFilter,
    ) -> Result<(Vec<AssignmentResponse>, i64), AppError> {
        let (assignments, total) = self.engine.search(&filter).await?;
        Ok((assignments.into_iter().map(Into::into).collect(), total))
    }

    pub async fn list_active(&self) -> Result<Vec<AssignmentResponse>, AppError> {
        let assignments = self.engine.list_active().await?;
        Ok(assignments.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_client(&self, client_id: i64) -> Result<Vec<AssignmentResponse>, AppError> {
        let assignments = self.engine.list_by_client(client_id).await?;
        Ok(assignments.into_iter().map(Into::into).collect())
    }

    pub async fn revoke(
        &self,
        id: i64,
        request: RevokeRequest,
    ) -> Result<ApiResponse<AssignmentResponse>, AppError> {
        request.validate()?;

        let assignment = self.engine.revoke(id, request.reason.as_deref()).await?;
        Ok(ApiResponse::success_with_message(
            assignment.into(),
            "Asignación revocada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.engine.delete(id).await?;
        Ok(())
    }
}
