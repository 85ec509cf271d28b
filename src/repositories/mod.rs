//! Repositorios
//!
//! Contratos de almacenamiento que consume el motor de asignación. Cada
//! contrato tiene una implementación PostgreSQL y otra en memoria; ambas
//! hacen cumplir "una sola asignación activa por espacio" al confirmar.

pub mod assignment_repository;
pub mod entity_repository;
pub mod memory_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    car::{Car, CarChanges, CarFilter, NewCar},
    client::{Client, ClientChanges, ClientFilter, NewClient},
    parking_assignment::{AssignmentFilter, NewAssignment, ParkingAssignment},
    parking_space::{NewParkingSpace, ParkingSpace, SpaceChanges, SpaceFilter, SpaceType},
};
use crate::utils::errors::AppResult;

pub use assignment_repository::PgAssignmentRepository;
pub use entity_repository::PgEntityRepository;
pub use memory_repository::InMemoryRepository;

/// Resultado de una baja lógica protegida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivateOutcome {
    Deactivated,
    NotFound,
    /// La entidad es destino de una asignación que ocupa su espacio
    InUse,
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Inserta una asignación. Falla con `StorageConflict` si rompe el índice único parcial.
    async fn insert(&self, assignment: NewAssignment) -> AppResult<ParkingAssignment>;

    /// Reemplaza todos los campos mutables. `NotFound` si el id no existe.
    async fn replace(&self, assignment: &ParkingAssignment) -> AppResult<ParkingAssignment>;

    /// Cancela y da de baja en una sola escritura; agrega `note` a las notas.
    async fn cancel(
        &self,
        id: i64,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ParkingAssignment>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingAssignment>>;

    /// Id de la asignación que ocupa el espacio, ignorando `exclude`
    async fn find_space_holder(&self, space_id: i64, exclude: Option<i64>) -> AppResult<Option<i64>>;

    async fn space_is_held(&self, space_id: i64) -> AppResult<bool> {
        Ok(self.find_space_holder(space_id, None).await?.is_some())
    }

    /// Asignaciones que ocupan espacio, por zona y número de espacio
    async fn list_active(&self) -> AppResult<Vec<ParkingAssignment>>;

    /// Todas las asignaciones de un cliente, más recientes primero
    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<ParkingAssignment>>;

    /// Búsqueda paginada; devuelve la página y el total sin paginar
    async fn search(&self, filter: &AssignmentFilter) -> AppResult<(Vec<ParkingAssignment>, i64)>;
}

#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn client_exists(&self, id: i64) -> AppResult<bool>;

    /// Propietario del coche, o `None` si el coche no existe
    async fn car_owner(&self, car_id: i64) -> AppResult<Option<i64>>;

    async fn space_exists(&self, id: i64) -> AppResult<bool>;

    /// Escribe la proyección de disponibilidad; devuelve si cambió
    async fn set_space_availability(&self, space_id: i64, available: bool) -> AppResult<bool>;

    async fn list_space_ids(&self) -> AppResult<Vec<i64>>;

    // Clientes
    async fn create_client(&self, client: NewClient) -> AppResult<Client>;
    async fn find_client(&self, id: i64) -> AppResult<Option<Client>>;
    async fn list_clients(&self, filter: &ClientFilter) -> AppResult<Vec<Client>>;
    async fn update_client(&self, id: i64, changes: ClientChanges) -> AppResult<Option<Client>>;
    async fn deactivate_client(&self, id: i64) -> AppResult<DeactivateOutcome>;

    // Coches
    async fn create_car(&self, car: NewCar) -> AppResult<Car>;
    async fn find_car(&self, id: i64) -> AppResult<Option<Car>>;
    async fn list_cars(&self, filter: &CarFilter) -> AppResult<Vec<Car>>;
    async fn update_car(&self, id: i64, changes: CarChanges) -> AppResult<Option<Car>>;
    async fn deactivate_car(&self, id: i64) -> AppResult<DeactivateOutcome>;

    // Espacios
    async fn create_space(&self, space: NewParkingSpace) -> AppResult<ParkingSpace>;
    async fn find_space(&self, id: i64) -> AppResult<Option<ParkingSpace>>;
    async fn list_spaces(&self, filter: &SpaceFilter) -> AppResult<Vec<ParkingSpace>>;
    async fn list_available_spaces(&self) -> AppResult<Vec<ParkingSpace>>;

    /// Zonas distintas de los espacios activos, en orden alfabético
    async fn list_zones(&self) -> AppResult<Vec<String>>;

    /// Tipos distintos de los espacios activos
    async fn list_space_types(&self) -> AppResult<Vec<SpaceType>>;
    async fn update_space(&self, id: i64, changes: SpaceChanges) -> AppResult<Option<ParkingSpace>>;
    async fn deactivate_space(&self, id: i64) -> AppResult<DeactivateOutcome>;
}
