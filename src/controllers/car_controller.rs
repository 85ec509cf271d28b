use std::sync::Arc;
use validator::Validate;

use crate::dto::entity_dto::{CreateCarRequest, UpdateCarRequest};
use crate::dto::ApiResponse;
use crate::models::car::{Car, CarFilter};
use crate::repositories::{DeactivateOutcome, EntityRepository};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, entity_in_use_error, not_found_error, AppError};

pub struct CarController {
    entities: Arc<dyn EntityRepository>,
}

impl CarController {
    pub fn new(state: &AppState) -> Self {
        Self {
            entities: state.entities.clone(),
        }
    }

    pub async fn create(&self, request: CreateCarRequest) -> Result<ApiResponse<Car>, AppError> {
        let request = request.normalized();
        request.validate()?;

        // El propietario debe existir (aunque esté dado de baja)
        if !self.entities.client_exists(request.client_id).await? {
            return Err(AppError::ReferenceNotFound(format!(
                "Client '{}' does not exist",
                request.client_id
            )));
        }

        let car = self.entities.create_car(request.into()).await?;
        tracing::info!("🚗 Coche {} registrado: {}", car.id, car.display_name());

        Ok(ApiResponse::success_with_message(
            car,
            "Coche registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Car, AppError> {
        self.entities
            .find_car(id)
            .await?
            .ok_or_else(|| not_found_error("Car", id))
    }

    pub async fn list(&self, filter: CarFilter) -> Result<Vec<Car>, AppError> {
        self.entities.list_cars(&filter).await
    }

    pub async fn update(&self, id: i64, request: UpdateCarRequest) -> Result<ApiResponse<Car>, AppError> {
        let request = request.normalized();
        request.validate()?;

        let current = self.get_by_id(id).await?;
        if let Some(client_id) = request.client_id {
            if client_id != current.client_id {
                return Err(bad_request_error("A car cannot be transferred to another client"));
            }
        }

        let car = self
            .entities
            .update_car(id, request.into_changes())
            .await?
            .ok_or_else(|| not_found_error("Car", id))?;

        Ok(ApiResponse::success_with_message(
            car,
            "Coche actualizado exitosamente".to_string(),
        ))
    }

    pub async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        match self.entities.deactivate_car(id).await? {
            DeactivateOutcome::Deactivated => {
                tracing::info!("🗑️ Coche {} dado de baja", id);
                Ok(())
            }
            DeactivateOutcome::NotFound => Err(not_found_error("Car", id)),
            DeactivateOutcome::InUse => Err(entity_in_use_error("car", id)),
        }
    }
}
