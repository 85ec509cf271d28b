use std::sync::Arc;
use validator::Validate;

use crate::dto::entity_dto::{CreateClientRequest, UpdateClientRequest};
use crate::dto::ApiResponse;
use crate::models::client::{Client, ClientFilter};
use crate::repositories::{DeactivateOutcome, EntityRepository};
use crate::state::AppState;
use crate::utils::errors::{entity_in_use_error, not_found_error, AppError};

pub struct ClientController {
    entities: Arc<dyn EntityRepository>,
}

impl ClientController {
    pub fn new(state: &AppState) -> Self {
        Self {
            entities: state.entities.clone(),
        }
    }

    pub async fn create(&self, request: CreateClientRequest) -> Result<ApiResponse<Client>, AppError> {
        request.validate()?;

        let client = self.entities.create_client(request.into()).await?;
        tracing::info!("👤 Cliente {} registrado: {}", client.id, client.full_name());

        Ok(ApiResponse::success_with_message(
            client,
            "Cliente registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Client, AppError> {
        self.entities
            .find_client(id)
            .await?
            .ok_or_else(|| not_found_error("Client", id))
    }

    pub async fn list(&self, filter: ClientFilter) -> Result<Vec<Client>, AppError> {
        self.entities.list_clients(&filter).await
    }

    pub async fn update(&self, id: i64, request: UpdateClientRequest) -> Result<ApiResponse<Client>, AppError> {
        request.validate()?;

        let client = self
            .entities
            .update_client(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Client", id))?;

        Ok(ApiResponse::success_with_message(
            client,
            "Cliente actualizado exitosamente".to_string(),
        ))
    }

    pub async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        match self.entities.deactivate_client(id).await? {
            DeactivateOutcome::Deactivated => {
                tracing::info!("🗑️ Cliente {} dado de baja", id);
                Ok(())
            }
            DeactivateOutcome::NotFound => Err(not_found_error("Client", id)),
            DeactivateOutcome::InUse => Err(entity_in_use_error("client", id)),
        }
    }
}
