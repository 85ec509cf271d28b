use std::sync::Arc;
use validator::Validate;

use crate::dto::entity_dto::{CreateSpaceRequest, UpdateSpaceRequest};
use crate::dto::ApiResponse;
use crate::models::parking_space::{ParkingSpace, SpaceFilter, SpaceType};
use crate::repositories::{DeactivateOutcome, EntityRepository};
use crate::services::{AvailabilityProjector, ReconcileReport};
use crate::state::AppState;
use crate::utils::errors::{entity_in_use_error, not_found_error, AppError};

pub struct ParkingSpaceController {
    entities: Arc<dyn EntityRepository>,
    projector: AvailabilityProjector,
}

impl ParkingSpaceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            entities: state.entities.clone(),
            projector: state.engine.projector().clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateSpaceRequest,
    ) -> Result<ApiResponse<ParkingSpace>, AppError> {
        request.validate()?;

        let space = self.entities.create_space(request.into()).await?;
        tracing::info!("🅿️ Espacio {} creado ({})", space.id, space.display_name());

        Ok(ApiResponse::success_with_message(
            space,
            "Espacio creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ParkingSpace, AppError> {
        self.entities
            .find_space(id)
            .await?
            .ok_or_else(|| not_found_error("ParkingSpace", id))
    }

    pub async fn list(&self, filter: SpaceFilter) -> Result<Vec<ParkingSpace>, AppError> {
        self.entities.list_spaces(&filter).await
    }

    pub async fn list_available(&self) -> Result<Vec<ParkingSpace>, AppError> {
        self.entities.list_available_spaces().await
    }

    pub async fn list_zones(&self) -> Result<Vec<String>, AppError> {
        self.entities.list_zones().await
    }

    pub async fn list_types(&self) -> Result<Vec<SpaceType>, AppError> {
        self.entities.list_space_types().await
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateSpaceRequest,
    ) -> Result<ApiResponse<ParkingSpace>, AppError> {
        request.validate()?;

        let space = self
            .entities
            .update_space(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("ParkingSpace", id))?;

        Ok(ApiResponse::success_with_message(
            space,
            "Espacio actualizado exitosamente".to_string(),
        ))
    }

    pub async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        match self.entities.deactivate_space(id).await? {
            DeactivateOutcome::Deactivated => {
                tracing::info!("🗑️ Espacio {} dado de baja", id);
                Ok(())
            }
            DeactivateOutcome::NotFound => Err(not_found_error("ParkingSpace", id)),
            DeactivateOutcome::InUse => Err(entity_in_use_error("parking space", id)),
        }
    }

    /// Recalcula la disponibilidad de un espacio y devuelve su estado final
    pub async fn recompute(&self, id: i64) -> Result<ApiResponse<ParkingSpace>, AppError> {
        let space = self.get_by_id(id).await?;
        let changed = self.projector.recompute(space.id).await?;
        let space = self.get_by_id(id).await?;

        let message = if changed {
            "Disponibilidad corregida"
        } else {
            "Disponibilidad sin cambios"
        };
        Ok(ApiResponse::success_with_message(space, message.to_string()))
    }

    pub async fn reconcile(&self) -> Result<ApiResponse<ReconcileReport>, AppError> {
        let report = self.projector.reconcile_all().await?;
        Ok(ApiResponse::success(report))
    }
}
