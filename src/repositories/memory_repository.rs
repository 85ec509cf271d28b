//! Almacenamiento en memoria
//!
//! Implementa ambos contratos sobre un único `RwLock`, de modo que cada
//! escritura es una transacción serializada. Las restricciones de unicidad
//! del esquema PostgreSQL se evalúan aquí al confirmar, incluido el índice
//! parcial de "una asignación activa por espacio".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{
    car::{Car, CarChanges, CarFilter, NewCar},
    client::{Client, ClientChanges, ClientFilter, NewClient},
    parking_assignment::{append_note, AssignmentFilter, AssignmentStatus, NewAssignment, ParkingAssignment},
    parking_space::{NewParkingSpace, ParkingSpace, SpaceChanges, SpaceFilter, SpaceType},
};
use crate::repositories::{AssignmentRepository, DeactivateOutcome, EntityRepository};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{contains_ignore_case, normalize_pagination, search_term};

#[derive(Debug, Default)]
struct MemoryState {
    client_seq: i64,
    car_seq: i64,
    space_seq: i64,
    assignment_seq: i64,
    clients: BTreeMap<i64, Client>,
    cars: BTreeMap<i64, Car>,
    spaces: BTreeMap<i64, ParkingSpace>,
    assignments: BTreeMap<i64, ParkingAssignment>,
}

impl MemoryState {
    fn holder_of(&self, space_id: i64, exclude: Option<i64>) -> Option<i64> {
        self.assignments
            .values()
            .find(|a| a.parking_space_id == space_id && a.holds_space() && Some(a.id) != exclude)
            .map(|a| a.id)
    }

    /// Equivalente al índice único parcial de PostgreSQL
    fn enforce_single_holder(&self, candidate: &ParkingAssignment) -> AppResult<()> {
        if !candidate.holds_space() {
            return Ok(());
        }
        match self.holder_of(candidate.parking_space_id, Some(candidate.id)) {
            Some(holder) => Err(AppError::StorageConflict(format!(
                "Parking space {} became occupied by assignment {} before commit",
                candidate.parking_space_id, holder
            ))),
            None => Ok(()),
        }
    }

    /// Equivalente a las claves foráneas de parking_assignments
    fn enforce_references(&self, candidate: &ParkingAssignment) -> AppResult<()> {
        if !self.clients.contains_key(&candidate.client_id)
            || !self.cars.contains_key(&candidate.car_id)
            || !self.spaces.contains_key(&candidate.parking_space_id)
        {
            return Err(AppError::ReferenceNotFound(
                "Client, car, or parking space does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn enforce_unique_client(
        &self,
        document_number: Option<&str>,
        email: Option<&str>,
        exclude: Option<i64>,
    ) -> AppResult<()> {
        for existing in self.clients.values().filter(|c| Some(c.id) != exclude) {
            if let Some(number) = document_number.filter(|n| *n == existing.document_number) {
                return Err(conflict_error("Client", "document_number", number));
            }
            if let Some(email) = email.filter(|e| *e == existing.email) {
                return Err(conflict_error("Client", "email", email));
            }
        }
        Ok(())
    }

    /// Texto libre de la búsqueda de asignaciones: cliente, matrícula o número de espacio
    fn assignment_matches_search(&self, assignment: &ParkingAssignment, term: &str) -> bool {
        let client = self.clients.get(&assignment.client_id).map_or(false, |client| {
            contains_ignore_case(&client.first_name, term) || contains_ignore_case(&client.last_name, term)
        });
        let car = self
            .cars
            .get(&assignment.car_id)
            .map_or(false, |car| contains_ignore_case(&car.license_plate, term));
        let space = self
            .spaces
            .get(&assignment.parking_space_id)
            .map_or(false, |space| contains_ignore_case(&space.space_number, term));
        client || car || space
    }

    fn enforce_unique_plate(&self, plate: &str, exclude: Option<i64>) -> AppResult<()> {
        if self
            .cars
            .values()
            .any(|car| car.license_plate == plate && Some(car.id) != exclude)
        {
            return Err(conflict_error("Car", "license_plate", plate));
        }
        Ok(())
    }

    fn enforce_unique_space_number(&self, number: &str, exclude: Option<i64>) -> AppResult<()> {
        if self
            .spaces
            .values()
            .any(|space| space.space_number == number && Some(space.id) != exclude)
        {
            return Err(conflict_error("ParkingSpace", "space_number", number));
        }
        Ok(())
    }

    fn space_order(&self, assignment: &ParkingAssignment) -> (Option<String>, String) {
        self.spaces
            .get(&assignment.parking_space_id)
            .map(|space| (space.zone.clone(), space.space_number.clone()))
            .unwrap_or_default()
    }
}

/// Repositorio en memoria compartido (los clones comparten el mismo estado)
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cantidad de asignaciones que ocupan un espacio; útil para auditorías
    pub async fn holder_count(&self, space_id: i64) -> usize {
        let state = self.state.read().await;
        state
            .assignments
            .values()
            .filter(|a| a.parking_space_id == space_id && a.holds_space())
            .count()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryRepository {
    async fn insert(&self, assignment: NewAssignment) -> AppResult<ParkingAssignment> {
        let mut state = self.state.write().await;
        let candidate = assignment.into_assignment(state.assignment_seq + 1);
        state.enforce_references(&candidate)?;
        state.enforce_single_holder(&candidate)?;

        state.assignment_seq = candidate.id;
        state.assignments.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    async fn replace(&self, assignment: &ParkingAssignment) -> AppResult<ParkingAssignment> {
        let mut state = self.state.write().await;
        if !state.assignments.contains_key(&assignment.id) {
            return Err(not_found_error("ParkingAssignment", assignment.id));
        }
        state.enforce_references(assignment)?;
        state.enforce_single_holder(assignment)?;

        state.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment.clone())
    }

    async fn cancel(
        &self,
        id: i64,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ParkingAssignment>> {
        let mut state = self.state.write().await;
        let Some(assignment) = state.assignments.get_mut(&id) else {
            return Ok(None);
        };

        assignment.status = AssignmentStatus::Cancelled;
        assignment.is_active = false;
        assignment.modified_date = Some(at);
        if let Some(note) = note {
            assignment.notes = Some(append_note(assignment.notes.as_deref(), &note));
        }
        Ok(Some(assignment.clone()))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingAssignment>> {
        Ok(self.state.read().await.assignments.get(&id).cloned())
    }

    async fn find_space_holder(&self, space_id: i64, exclude: Option<i64>) -> AppResult<Option<i64>> {
        Ok(self.state.read().await.holder_of(space_id, exclude))
    }

    async fn list_active(&self) -> AppResult<Vec<ParkingAssignment>> {
        let state = self.state.read().await;
        let mut active: Vec<ParkingAssignment> = state
            .assignments
            .values()
            .filter(|a| a.holds_space())
            .cloned()
            .collect();
        active.sort_by_key(|a| state.space_order(a));
        Ok(active)
    }

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<ParkingAssignment>> {
        let state = self.state.read().await;
        let mut assignments: Vec<ParkingAssignment> = state
            .assignments
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| b.assigned_date.cmp(&a.assigned_date).then(b.id.cmp(&a.id)));
        Ok(assignments)
    }

    async fn search(&self, filter: &AssignmentFilter) -> AppResult<(Vec<ParkingAssignment>, i64)> {
        let (page, page_size) = normalize_pagination(filter.page, filter.page_size);
        let state = self.state.read().await;

        let term = search_term(filter.search.as_deref());
        let mut matching: Vec<&ParkingAssignment> = state
            .assignments
            .values()
            .filter(|a| filter.matches(a))
            .filter(|a| term.map_or(true, |term| state.assignment_matches_search(a, term)))
            .collect();
        matching.sort_by(|a, b| b.assigned_date.cmp(&a.assigned_date).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let page_items = matching
            .into_iter()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((page_items, total))
    }
}

#[async_trait]
impl EntityRepository for InMemoryRepository {
    async fn client_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.read().await.clients.contains_key(&id))
    }

    async fn car_owner(&self, car_id: i64) -> AppResult<Option<i64>> {
        Ok(self.state.read().await.cars.get(&car_id).map(|car| car.client_id))
    }

    async fn space_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.read().await.spaces.contains_key(&id))
    }

    async fn set_space_availability(&self, space_id: i64, available: bool) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.spaces.get_mut(&space_id) {
            Some(space) if space.is_available != available => {
                space.is_available = available;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_space_ids(&self) -> AppResult<Vec<i64>> {
        Ok(self.state.read().await.spaces.keys().copied().collect())
    }

    async fn create_client(&self, client: NewClient) -> AppResult<Client> {
        let mut state = self.state.write().await;
        state.enforce_unique_client(Some(&client.document_number), Some(&client.email), None)?;

        state.client_seq += 1;
        let created = client.into_client(state.client_seq, Utc::now());
        state.clients.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_client(&self, id: i64) -> AppResult<Option<Client>> {
        Ok(self.state.read().await.clients.get(&id).cloned())
    }

    async fn list_clients(&self, filter: &ClientFilter) -> AppResult<Vec<Client>> {
        let state = self.state.read().await;
        let mut clients: Vec<Client> = state
            .clients
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        clients.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(clients)
    }

    async fn update_client(&self, id: i64, changes: ClientChanges) -> AppResult<Option<Client>> {
        let mut state = self.state.write().await;
        state.enforce_unique_client(changes.document_number.as_deref(), changes.email.as_deref(), Some(id))?;
        Ok(state.clients.get_mut(&id).map(|client| {
            changes.apply(client);
            client.clone()
        }))
    }

    async fn deactivate_client(&self, id: i64) -> AppResult<DeactivateOutcome> {
        let mut state = self.state.write().await;
        if state.assignments.values().any(|a| a.client_id == id && a.holds_space()) {
            return Ok(DeactivateOutcome::InUse);
        }
        match state.clients.get_mut(&id) {
            Some(client) => {
                client.is_active = false;
                Ok(DeactivateOutcome::Deactivated)
            }
            None => Ok(DeactivateOutcome::NotFound),
        }
    }

    async fn create_car(&self, car: NewCar) -> AppResult<Car> {
        let mut state = self.state.write().await;
        if !state.clients.contains_key(&car.client_id) {
            return Err(AppError::ReferenceNotFound(format!(
                "Client '{}' does not exist",
                car.client_id
            )));
        }
        state.enforce_unique_plate(&car.license_plate, None)?;

        state.car_seq += 1;
        let created = car.into_car(state.car_seq, Utc::now());
        state.cars.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_car(&self, id: i64) -> AppResult<Option<Car>> {
        Ok(self.state.read().await.cars.get(&id).cloned())
    }

    async fn list_cars(&self, filter: &CarFilter) -> AppResult<Vec<Car>> {
        let state = self.state.read().await;
        let mut cars: Vec<Car> = state
            .cars
            .values()
            .filter(|car| filter.matches(car))
            .cloned()
            .collect();
        cars.sort_by(|a, b| a.license_plate.cmp(&b.license_plate));
        Ok(cars)
    }

    async fn update_car(&self, id: i64, changes: CarChanges) -> AppResult<Option<Car>> {
        let mut state = self.state.write().await;
        if let Some(plate) = &changes.license_plate {
            state.enforce_unique_plate(plate, Some(id))?;
        }
        Ok(state.cars.get_mut(&id).map(|car| {
            changes.apply(car);
            car.clone()
        }))
    }

    async fn deactivate_car(&self, id: i64) -> AppResult<DeactivateOutcome> {
        let mut state = self.state.write().await;
        if state.assignments.values().any(|a| a.car_id == id && a.holds_space()) {
            return Ok(DeactivateOutcome::InUse);
        }
        match state.cars.get_mut(&id) {
            Some(car) => {
                car.is_active = false;
                Ok(DeactivateOutcome::Deactivated)
            }
            None => Ok(DeactivateOutcome::NotFound),
        }
    }

    async fn create_space(&self, space: NewParkingSpace) -> AppResult<ParkingSpace> {
        let mut state = self.state.write().await;
        state.enforce_unique_space_number(&space.space_number, None)?;

        state.space_seq += 1;
        let created = space.into_space(state.space_seq, Utc::now());
        state.spaces.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_space(&self, id: i64) -> AppResult<Option<ParkingSpace>> {
        Ok(self.state.read().await.spaces.get(&id).cloned())
    }

    async fn list_spaces(&self, filter: &SpaceFilter) -> AppResult<Vec<ParkingSpace>> {
        let state = self.state.read().await;
        let mut spaces: Vec<ParkingSpace> = state
            .spaces
            .values()
            .filter(|space| filter.matches(space))
            .cloned()
            .collect();
        spaces.sort_by(|a, b| a.layout_order(b));
        Ok(spaces)
    }

    async fn list_available_spaces(&self) -> AppResult<Vec<ParkingSpace>> {
        let state = self.state.read().await;
        let mut spaces: Vec<ParkingSpace> = state
            .spaces
            .values()
            .filter(|space| space.is_available && space.is_active)
            .cloned()
            .collect();
        spaces.sort_by(|a, b| a.layout_order(b));
        Ok(spaces)
    }

    async fn list_zones(&self) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let mut zones: Vec<String> = state
            .spaces
            .values()
            .filter(|space| space.is_active)
            .filter_map(|space| space.zone.clone())
            .filter(|zone| !zone.is_empty())
            .collect();
        zones.sort();
        zones.dedup();
        Ok(zones)
    }

    async fn list_space_types(&self) -> AppResult<Vec<SpaceType>> {
        let state = self.state.read().await;
        let mut types: Vec<SpaceType> = state
            .spaces
            .values()
            .filter(|space| space.is_active)
            .map(|space| space.space_type)
            .collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    async fn update_space(&self, id: i64, changes: SpaceChanges) -> AppResult<Option<ParkingSpace>> {
        let mut state = self.state.write().await;
        if let Some(number) = &changes.space_number {
            state.enforce_unique_space_number(number, Some(id))?;
        }
        Ok(state.spaces.get_mut(&id).map(|space| {
            changes.apply(space);
            space.clone()
        }))
    }

    async fn deactivate_space(&self, id: i64) -> AppResult<DeactivateOutcome> {
        let mut state = self.state.write().await;
        if state.holder_of(id, None).is_some() {
            return Ok(DeactivateOutcome::InUse);
        }
        match state.spaces.get_mut(&id) {
            Some(space) => {
                space.is_active = false;
                Ok(DeactivateOutcome::Deactivated)
            }
            None => Ok(DeactivateOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parking_assignment::AssignmentDraft;

    async fn seed(repo: &InMemoryRepository) -> (i64, i64, i64) {
        let client = repo
            .create_client(NewClient {
                first_name: "Ana".into(),
                last_name: "García".into(),
                document_number: "12345678".into(),
                document_type: "DNI".into(),
                phone: None,
                email: "ana@example.com".into(),
                address: None,
            })
            .await
            .unwrap();
        let car = repo
            .create_car(NewCar {
                license_plate: "ABC-123".into(),
                brand: "Toyota".into(),
                model: "Corolla".into(),
                color: None,
                year: 2020,
                client_id: client.id,
            })
            .await
            .unwrap();
        let space = repo
            .create_space(NewParkingSpace {
                space_number: "A-01".into(),
                zone: Some("A".into()),
                space_type: SpaceType::Regular,
                description: None,
            })
            .await
            .unwrap();
        (client.id, car.id, space.id)
    }

    #[tokio::test]
    async fn test_commit_rejects_second_holder() {
        let repo = InMemoryRepository::new();
        let (client, car, space) = seed(&repo).await;
        let now = Utc::now();

        repo.insert(NewAssignment::from_draft(AssignmentDraft::new(client, car, space), now))
            .await
            .unwrap();
        let second = repo
            .insert(NewAssignment::from_draft(AssignmentDraft::new(client, car, space), now))
            .await;

        assert!(matches!(second, Err(AppError::StorageConflict(_))));
        assert_eq!(repo.holder_count(space).await, 1);
    }

    #[tokio::test]
    async fn test_inactive_rows_do_not_count_as_holders() {
        let repo = InMemoryRepository::new();
        let (client, car, space) = seed(&repo).await;
        let now = Utc::now();

        let suspended = AssignmentDraft {
            status: AssignmentStatus::Suspended,
            ..AssignmentDraft::new(client, car, space)
        };
        repo.insert(NewAssignment::from_draft(suspended, now)).await.unwrap();
        repo.insert(NewAssignment::from_draft(AssignmentDraft::new(client, car, space), now))
            .await
            .unwrap();

        assert_eq!(repo.holder_count(space).await, 1);
    }

    #[tokio::test]
    async fn test_cancel_appends_note() {
        let repo = InMemoryRepository::new();
        let (client, car, space) = seed(&repo).await;
        let draft = AssignmentDraft {
            notes: Some("Turno noche".into()),
            ..AssignmentDraft::new(client, car, space)
        };
        let created = repo.insert(NewAssignment::from_draft(draft, Utc::now())).await.unwrap();

        let cancelled = repo
            .cancel(created.id, Some("Revoked: no-show".into()), Utc::now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(cancelled.status, AssignmentStatus::Cancelled);
        assert!(!cancelled.is_active);
        assert_eq!(cancelled.notes.as_deref(), Some("Turno noche\nRevoked: no-show"));
        assert!(repo.cancel(999, None, Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraints() {
        let repo = InMemoryRepository::new();
        let (client, _, _) = seed(&repo).await;

        let duplicate_plate = repo
            .create_car(NewCar {
                license_plate: "ABC-123".into(),
                brand: "Ford".into(),
                model: "Focus".into(),
                color: None,
                year: 2018,
                client_id: client,
            })
            .await;
        assert!(matches!(duplicate_plate, Err(AppError::Conflict(_))));

        let orphan_car = repo
            .create_car(NewCar {
                license_plate: "ZZZ-999".into(),
                brand: "Ford".into(),
                model: "Focus".into(),
                color: None,
                year: 2018,
                client_id: 42,
            })
            .await;
        assert!(matches!(orphan_car, Err(AppError::ReferenceNotFound(_))));
    }

    #[tokio::test]
    async fn test_set_space_availability_reports_changes() {
        let repo = InMemoryRepository::new();
        let (_, _, space) = seed(&repo).await;

        assert!(!repo.set_space_availability(space, true).await.unwrap());
        assert!(repo.set_space_availability(space, false).await.unwrap());
        assert!(!repo.set_space_availability(space, false).await.unwrap());
        assert!(!repo.set_space_availability(999, false).await.unwrap());
    }
}
