//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    AssignmentRepository, EntityRepository, InMemoryRepository, PgAssignmentRepository,
    PgEntityRepository,
};
use crate::services::AllocationEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub engine: AllocationEngine,
    pub entities: Arc<dyn EntityRepository>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        assignments: Arc<dyn AssignmentRepository>,
        entities: Arc<dyn EntityRepository>,
    ) -> Self {
        Self {
            config,
            engine: AllocationEngine::new(assignments, entities.clone()),
            entities,
        }
    }

    /// Estado respaldado por PostgreSQL
    pub fn postgres(config: EnvironmentConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgAssignmentRepository::new(pool.clone())),
            Arc::new(PgEntityRepository::new(pool)),
        )
    }

    /// Estado respaldado por el almacén en memoria; comparte el mismo almacén entre ambos repositorios
    pub fn in_memory(config: EnvironmentConfig, store: InMemoryRepository) -> Self {
        Self::new(config, Arc::new(store.clone()), Arc::new(store))
    }
}
