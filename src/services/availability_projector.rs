//! Proyector de disponibilidad
//!
//! `ParkingSpace.is_available` es una caché derivada del conjunto de
//! asignaciones. Este servicio es el único que la escribe.

use std::sync::Arc;
use tracing::{debug, info};

use crate::repositories::{AssignmentRepository, EntityRepository};
use crate::utils::errors::AppResult;

/// Resumen de una reconciliación completa
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ReconcileReport {
    pub spaces_checked: usize,
    pub spaces_changed: usize,
}

#[derive(Clone)]
pub struct AvailabilityProjector {
    assignments: Arc<dyn AssignmentRepository>,
    entities: Arc<dyn EntityRepository>,
}

impl AvailabilityProjector {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, entities: Arc<dyn EntityRepository>) -> Self {
        Self { assignments, entities }
    }

    /// Recalcula la disponibilidad de un espacio. Idempotente; devuelve si cambió.
    pub async fn recompute(&self, space_id: i64) -> AppResult<bool> {
        let held = self.assignments.space_is_held(space_id).await?;
        let changed = self.entities.set_space_availability(space_id, !held).await?;

        if changed {
            info!("🅿️ Espacio {} ahora {}", space_id, if held { "ocupado" } else { "disponible" });
        } else {
            debug!("🅿️ Espacio {} sin cambios (ocupado: {})", space_id, held);
        }
        Ok(changed)
    }

    /// Recalcula todos los espacios; repara la deriva tras un fallo del proyector
    pub async fn reconcile_all(&self) -> AppResult<ReconcileReport> {
        let space_ids = self.entities.list_space_ids().await?;
        let mut spaces_changed = 0;
        for space_id in &space_ids {
            if self.recompute(*space_id).await? {
                spaces_changed += 1;
            }
        }

        let report = ReconcileReport {
            spaces_checked: space_ids.len(),
            spaces_changed,
        };
        info!(
            "🔄 Reconciliación completada: {} espacios revisados, {} corregidos",
            report.spaces_checked, report.spaces_changed
        );
        Ok(report)
    }
}
