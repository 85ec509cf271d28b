//! Motor de asignación de espacios
//!
//! Valida las relaciones entre entidades, detecta conflictos de espacio,
//! ejecuta las transiciones de estado y dispara la proyección de
//! disponibilidad después de cada escritura.
//!
//! La comprobación de conflicto de este módulo solo sirve para devolver un
//! error claro. La garantía real es la restricción de unicidad del
//! almacenamiento, que se traduce en `AppError::StorageConflict`.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::parking_assignment::{
    revocation_note, AssignmentDraft, AssignmentFilter, NewAssignment, ParkingAssignment,
};
use crate::repositories::{AssignmentRepository, EntityRepository};
use crate::services::availability_projector::AvailabilityProjector;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Tipo de propuesta: alta o modificación del registro `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    Create,
    Update { id: i64 },
}

impl Proposal {
    fn excluded_id(&self) -> Option<i64> {
        match self {
            Proposal::Create => None,
            Proposal::Update { id } => Some(*id),
        }
    }
}

#[derive(Clone)]
pub struct AllocationEngine {
    assignments: Arc<dyn AssignmentRepository>,
    entities: Arc<dyn EntityRepository>,
    projector: AvailabilityProjector,
}

impl AllocationEngine {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, entities: Arc<dyn EntityRepository>) -> Self {
        let projector = AvailabilityProjector::new(assignments.clone(), entities.clone());
        Self {
            assignments,
            entities,
            projector,
        }
    }

    pub fn projector(&self) -> &AvailabilityProjector {
        &self.projector
    }

    /// Acepta una asignación nueva o modificada, o la rechaza con un motivo concreto.
    ///
    /// Orden de comprobaciones:
    /// 1. cliente, coche y espacio existen (`ReferenceNotFound`)
    /// 2. el coche pertenece al cliente (`OwnershipMismatch`)
    /// 3. ninguna otra asignación ocupa el espacio (`SpaceConflict`)
    /// 4. en modificaciones, el id del cuerpo coincide con el de la ruta (`IdentifierMismatch`);
    ///    un cuerpo sin id no coincide
    pub async fn propose(&self, draft: AssignmentDraft, proposal: Proposal) -> AppResult<ParkingAssignment> {
        let owner = self.ensure_references_exist(&draft).await?;

        if owner != draft.client_id {
            return Err(AppError::OwnershipMismatch(format!(
                "The selected car {} does not belong to client {}",
                draft.car_id, draft.client_id
            )));
        }

        // Las fechas no participan: dos asignaciones activas con ventanas disjuntas también chocan
        if draft.holds_space() {
            if let Some(holder_id) = self
                .assignments
                .find_space_holder(draft.parking_space_id, proposal.excluded_id())
                .await?
            {
                return Err(AppError::SpaceConflict {
                    space_id: draft.parking_space_id,
                    holder_id,
                });
            }
        }

        match proposal {
            Proposal::Create => self.create(draft).await,
            Proposal::Update { id } => self.update(id, draft).await,
        }
    }

    /// Cancela la asignación y agrega "Revoked: <motivo>" a las notas
    pub async fn revoke(&self, id: i64, reason: Option<&str>) -> AppResult<ParkingAssignment> {
        let revoked = self.cancel(id, revocation_note(reason)).await?;
        info!("🛑 Asignación {} revocada (espacio {})", id, revoked.parking_space_id);
        Ok(revoked)
    }

    /// Baja lógica: mismo efecto que revocar sin motivo
    pub async fn delete(&self, id: i64) -> AppResult<ParkingAssignment> {
        let deleted = self.cancel(id, None).await?;
        info!("🗑️ Asignación {} dada de baja (espacio {})", id, deleted.parking_space_id);
        Ok(deleted)
    }

    pub async fn get(&self, id: i64) -> AppResult<ParkingAssignment> {
        self.assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("ParkingAssignment", id))
    }

    pub async fn list_active(&self) -> AppResult<Vec<ParkingAssignment>> {
        self.assignments.list_active().await
    }

    pub async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<ParkingAssignment>> {
        self.assignments.list_by_client(client_id).await
    }

    pub async fn search(&self, filter: &AssignmentFilter) -> AppResult<(Vec<ParkingAssignment>, i64)> {
        self.assignments.search(filter).await
    }

    /// Devuelve el propietario del coche si las tres referencias existen
    async fn ensure_references_exist(&self, draft: &AssignmentDraft) -> AppResult<i64> {
        let (client_exists, car_owner, space_exists) = futures::try_join!(
            self.entities.client_exists(draft.client_id),
            self.entities.car_owner(draft.car_id),
            self.entities.space_exists(draft.parking_space_id),
        )?;

        match car_owner {
            Some(owner) if client_exists && space_exists => Ok(owner),
            _ => Err(AppError::ReferenceNotFound(format!(
                "Client {}, car {}, or parking space {} does not exist",
                draft.client_id, draft.car_id, draft.parking_space_id
            ))),
        }
    }

    async fn create(&self, draft: AssignmentDraft) -> AppResult<ParkingAssignment> {
        let created = self
            .assignments
            .insert(NewAssignment::from_draft(draft, Utc::now()))
            .await
            .map_err(|e| log_storage_conflict(e, "create"))?;

        info!(
            "✅ Asignación {} creada: cliente {} / coche {} / espacio {} ({})",
            created.id, created.client_id, created.car_id, created.parking_space_id, created.status
        );
        self.project(created.parking_space_id).await?;
        Ok(created)
    }

    async fn update(&self, id: i64, draft: AssignmentDraft) -> AppResult<ParkingAssignment> {
        // Un cuerpo sin id nunca coincide con el registro: se trata como id 0
        let body_id = draft.id.unwrap_or(0);
        if body_id != id {
            return Err(AppError::IdentifierMismatch { path_id: id, body_id });
        }

        let existing = self.get(id).await?;
        let previous_space = existing.parking_space_id;

        let updated = ParkingAssignment {
            id,
            client_id: draft.client_id,
            car_id: draft.car_id,
            parking_space_id: draft.parking_space_id,
            assigned_date: draft.assigned_date.unwrap_or(existing.assigned_date),
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            notes: draft.notes,
            is_active: draft.is_active,
            created_date: existing.created_date,
            modified_date: Some(Utc::now()),
        };
        let updated = self
            .assignments
            .replace(&updated)
            .await
            .map_err(|e| log_storage_conflict(e, "update"))?;

        info!(
            "✏️ Asignación {} actualizada: espacio {} ({}, activa: {})",
            updated.id, updated.parking_space_id, updated.status, updated.is_active
        );

        let current = self.project(updated.parking_space_id).await;
        if previous_space != updated.parking_space_id {
            self.project(previous_space).await?;
        }
        current?;
        Ok(updated)
    }

    async fn cancel(&self, id: i64, note: Option<String>) -> AppResult<ParkingAssignment> {
        let cancelled = self
            .assignments
            .cancel(id, note, Utc::now())
            .await?
            .ok_or_else(|| not_found_error("ParkingAssignment", id))?;

        self.project(cancelled.parking_space_id).await?;
        Ok(cancelled)
    }

    /// Ejecuta el proyector; un fallo aquí deja la caché desfasada hasta el próximo recálculo
    async fn project(&self, space_id: i64) -> AppResult<()> {
        self.projector.recompute(space_id).await.map(|_| ()).map_err(|e| {
            error!(
                "❌ Proyección de disponibilidad fallida para el espacio {}: {}",
                space_id, e
            );
            AppError::ProjectionFailed {
                space_id,
                message: e.to_string(),
            }
        })
    }
}

fn log_storage_conflict(error: AppError, operation: &str) -> AppError {
    if let AppError::StorageConflict(msg) = &error {
        warn!("🔁 Restricción de almacenamiento rechazó {}: {}", operation, msg);
    }
    error
}
