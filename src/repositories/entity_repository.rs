use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{
    car::{Car, CarChanges, CarFilter, NewCar},
    client::{Client, ClientChanges, ClientFilter, NewClient},
    parking_space::{NewParkingSpace, ParkingSpace, SpaceChanges, SpaceFilter, SpaceType},
};
use crate::repositories::{DeactivateOutcome, EntityRepository};
use crate::utils::errors::{map_db_error, AppResult};
use crate::utils::validation::{like_pattern, search_term};

pub struct PgEntityRepository {
    pool: PgPool,
}

impl PgEntityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, sql: &str, id: i64) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.0)
    }

    /// Interpreta un UPDATE protegido que no devolvió fila
    async fn guarded_outcome(&self, updated: Option<(i64,)>, exists_sql: &str, id: i64) -> AppResult<DeactivateOutcome> {
        if updated.is_some() {
            return Ok(DeactivateOutcome::Deactivated);
        }
        if self.exists(exists_sql, id).await? {
            Ok(DeactivateOutcome::InUse)
        } else {
            Ok(DeactivateOutcome::NotFound)
        }
    }
}

const CLIENT_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)";
const CAR_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)";
const SPACE_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM parking_spaces WHERE id = $1)";

#[async_trait]
impl EntityRepository for PgEntityRepository {
    async fn client_exists(&self, id: i64) -> AppResult<bool> {
        self.exists(CLIENT_EXISTS, id).await
    }

    async fn car_owner(&self, car_id: i64) -> AppResult<Option<i64>> {
        let owner: Option<(i64,)> = sqlx::query_as("SELECT client_id FROM cars WHERE id = $1")
            .bind(car_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(owner.map(|row| row.0))
    }

    async fn space_exists(&self, id: i64) -> AppResult<bool> {
        self.exists(SPACE_EXISTS, id).await
    }

    async fn set_space_availability(&self, space_id: i64, available: bool) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE parking_spaces SET is_available = $2 WHERE id = $1 AND is_available <> $2",
        )
        .bind(space_id)
        .bind(available)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_space_ids(&self) -> AppResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM parking_spaces ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn create_client(&self, client: NewClient) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                first_name, last_name, document_number, document_type, phone, email, address,
                registration_date, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            RETURNING *
            "#,
        )
        .bind(client.first_name)
        .bind(client.last_name)
        .bind(client.document_number)
        .bind(client.document_type)
        .bind(client.phone)
        .bind(client.email)
        .bind(client.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_client(&self, id: i64) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_clients(&self, filter: &ClientFilter) -> AppResult<Vec<Client>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM clients WHERE TRUE");
        if let Some(is_active) = filter.is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(term);
            query
                .push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR document_number ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY last_name, first_name");

        query
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn update_client(&self, id: i64, changes: ClientChanges) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                document_number = COALESCE($4, document_number),
                document_type = COALESCE($5, document_type),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                address = COALESCE($8, address)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.document_number)
        .bind(changes.document_type)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn deactivate_client(&self, id: i64) -> AppResult<DeactivateOutcome> {
        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE clients SET is_active = FALSE
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM parking_assignments
                  WHERE client_id = $1 AND status = 'Active' AND is_active
              )
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.guarded_outcome(updated, CLIENT_EXISTS, id).await
    }

    async fn create_car(&self, car: NewCar) -> AppResult<Car> {
        sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (license_plate, brand, model, color, year, client_id, registration_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING *
            "#,
        )
        .bind(car.license_plate)
        .bind(car.brand)
        .bind(car.model)
        .bind(car.color)
        .bind(car.year)
        .bind(car.client_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_car(&self, id: i64) -> AppResult<Option<Car>> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_cars(&self, filter: &CarFilter) -> AppResult<Vec<Car>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM cars WHERE TRUE");
        if let Some(client_id) = filter.client_id {
            query.push(" AND client_id = ").push_bind(client_id);
        }
        if let Some(is_active) = filter.is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(term);
            query
                .push(" AND (license_plate ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR brand ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR model ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR color ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY license_plate");

        query
            .build_query_as::<Car>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn update_car(&self, id: i64, changes: CarChanges) -> AppResult<Option<Car>> {
        // client_id no figura en el SET: el trigger lo protege igualmente
        sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET license_plate = COALESCE($2, license_plate),
                brand = COALESCE($3, brand),
                model = COALESCE($4, model),
                color = COALESCE($5, color),
                year = COALESCE($6, year)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.license_plate)
        .bind(changes.brand)
        .bind(changes.model)
        .bind(changes.color)
        .bind(changes.year)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn deactivate_car(&self, id: i64) -> AppResult<DeactivateOutcome> {
        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE cars SET is_active = FALSE
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM parking_assignments
                  WHERE car_id = $1 AND status = 'Active' AND is_active
              )
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.guarded_outcome(updated, CAR_EXISTS, id).await
    }

    async fn create_space(&self, space: NewParkingSpace) -> AppResult<ParkingSpace> {
        sqlx::query_as::<_, ParkingSpace>(
            r#"
            INSERT INTO parking_spaces (space_number, zone, space_type, is_available, is_active, description, created_date)
            VALUES ($1, $2, $3, TRUE, TRUE, $4, $5)
            RETURNING *
            "#,
        )
        .bind(space.space_number)
        .bind(space.zone)
        .bind(space.space_type)
        .bind(space.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_space(&self, id: i64) -> AppResult<Option<ParkingSpace>> {
        sqlx::query_as::<_, ParkingSpace>("SELECT * FROM parking_spaces WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_spaces(&self, filter: &SpaceFilter) -> AppResult<Vec<ParkingSpace>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM parking_spaces WHERE TRUE");
        if let Some(zone) = &filter.zone {
            query.push(" AND zone = ").push_bind(zone.clone());
        }
        if let Some(space_type) = filter.space_type {
            query.push(" AND space_type = ").push_bind(space_type);
        }
        if let Some(is_available) = filter.is_available {
            query.push(" AND is_available = ").push_bind(is_available);
        }
        if let Some(is_active) = filter.is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(term);
            query
                .push(" AND (space_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR zone ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY zone ASC NULLS FIRST, space_number ASC");

        query
            .build_query_as::<ParkingSpace>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn list_available_spaces(&self) -> AppResult<Vec<ParkingSpace>> {
        sqlx::query_as::<_, ParkingSpace>(
            r#"
            SELECT * FROM parking_spaces
            WHERE is_available AND is_active
            ORDER BY zone ASC NULLS FIRST, space_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_zones(&self) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT zone FROM parking_spaces
            WHERE is_active AND zone IS NOT NULL AND zone <> ''
            ORDER BY zone
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn list_space_types(&self) -> AppResult<Vec<SpaceType>> {
        let rows: Vec<(SpaceType,)> = sqlx::query_as(
            "SELECT DISTINCT space_type FROM parking_spaces WHERE is_active ORDER BY space_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn update_space(&self, id: i64, changes: SpaceChanges) -> AppResult<Option<ParkingSpace>> {
        sqlx::query_as::<_, ParkingSpace>(
            r#"
            UPDATE parking_spaces
            SET space_number = COALESCE($2, space_number),
                zone = COALESCE($3, zone),
                space_type = COALESCE($4, space_type),
                description = COALESCE($5, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.space_number)
        .bind(changes.zone)
        .bind(changes.space_type)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn deactivate_space(&self, id: i64) -> AppResult<DeactivateOutcome> {
        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE parking_spaces SET is_active = FALSE
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM parking_assignments
                  WHERE parking_space_id = $1 AND status = 'Active' AND is_active
              )
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.guarded_outcome(updated, SPACE_EXISTS, id).await
    }
}
