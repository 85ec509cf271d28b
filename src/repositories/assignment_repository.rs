use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::parking_assignment::{AssignmentFilter, NewAssignment, ParkingAssignment};
use crate::repositories::AssignmentRepository;
use crate::utils::errors::{map_db_error, not_found_error, AppResult};
use crate::utils::validation::{like_pattern, normalize_pagination, search_term};

pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// FROM común de la búsqueda; los joins solo aportan los campos del texto libre
const SEARCH_FROM: &str = r#"
    FROM parking_assignments pa
    INNER JOIN clients c ON c.id = pa.client_id
    INNER JOIN cars car ON car.id = pa.car_id
    INNER JOIN parking_spaces ps ON ps.id = pa.parking_space_id
"#;

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &AssignmentFilter) {
    builder.push(" WHERE TRUE");
    if let Some(client_id) = filter.client_id {
        builder.push(" AND pa.client_id = ").push_bind(client_id);
    }
    if let Some(car_id) = filter.car_id {
        builder.push(" AND pa.car_id = ").push_bind(car_id);
    }
    if let Some(space_id) = filter.parking_space_id {
        builder.push(" AND pa.parking_space_id = ").push_bind(space_id);
    }
    if let Some(status) = filter.status {
        builder.push(" AND pa.status = ").push_bind(status);
    }
    if let Some(is_active) = filter.is_active {
        builder.push(" AND pa.is_active = ").push_bind(is_active);
    }
    if let Some(from) = filter.start_date {
        builder.push(" AND pa.start_date >= ").push_bind(from);
    }
    if let Some(until) = filter.end_date {
        builder.push(" AND pa.end_date <= ").push_bind(until);
    }
    if let Some(term) = search_term(filter.search.as_deref()) {
        let pattern = like_pattern(term);
        builder
            .push(" AND (c.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR car.license_plate ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR ps.space_number ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    async fn insert(&self, assignment: NewAssignment) -> AppResult<ParkingAssignment> {
        // El índice parcial rechaza aquí al segundo escritor concurrente
        sqlx::query_as::<_, ParkingAssignment>(
            r#"
            INSERT INTO parking_assignments (
                client_id, car_id, parking_space_id, assigned_date, start_date, end_date,
                status, notes, is_active, created_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(assignment.client_id)
        .bind(assignment.car_id)
        .bind(assignment.parking_space_id)
        .bind(assignment.assigned_date)
        .bind(assignment.start_date)
        .bind(assignment.end_date)
        .bind(assignment.status)
        .bind(assignment.notes)
        .bind(assignment.is_active)
        .bind(assignment.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn replace(&self, assignment: &ParkingAssignment) -> AppResult<ParkingAssignment> {
        sqlx::query_as::<_, ParkingAssignment>(
            r#"
            UPDATE parking_assignments
            SET client_id = $2, car_id = $3, parking_space_id = $4, assigned_date = $5,
                start_date = $6, end_date = $7, status = $8, notes = $9, is_active = $10,
                modified_date = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.client_id)
        .bind(assignment.car_id)
        .bind(assignment.parking_space_id)
        .bind(assignment.assigned_date)
        .bind(assignment.start_date)
        .bind(assignment.end_date)
        .bind(assignment.status)
        .bind(&assignment.notes)
        .bind(assignment.is_active)
        .bind(assignment.modified_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| not_found_error("ParkingAssignment", assignment.id))
    }

    async fn cancel(
        &self,
        id: i64,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ParkingAssignment>> {
        // Una sola sentencia: la nota se concatena, nunca se sobrescribe
        sqlx::query_as::<_, ParkingAssignment>(
            r#"
            UPDATE parking_assignments
            SET status = 'Cancelled',
                is_active = FALSE,
                modified_date = $2,
                notes = CASE
                    WHEN $3::TEXT IS NULL THEN notes
                    WHEN notes IS NULL OR notes = '' THEN $3::TEXT
                    ELSE notes || E'\n' || $3::TEXT
                END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .bind(note)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ParkingAssignment>> {
        sqlx::query_as::<_, ParkingAssignment>("SELECT * FROM parking_assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_space_holder(&self, space_id: i64, exclude: Option<i64>) -> AppResult<Option<i64>> {
        let holder: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM parking_assignments
            WHERE parking_space_id = $1
              AND status = 'Active'
              AND is_active
              AND ($2::BIGINT IS NULL OR id <> $2)
            LIMIT 1
            "#,
        )
        .bind(space_id)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(holder.map(|row| row.0))
    }

    async fn list_active(&self) -> AppResult<Vec<ParkingAssignment>> {
        sqlx::query_as::<_, ParkingAssignment>(
            r#"
            SELECT pa.*
            FROM parking_assignments pa
            INNER JOIN parking_spaces ps ON ps.id = pa.parking_space_id
            WHERE pa.is_active AND pa.status = 'Active'
            ORDER BY ps.zone ASC NULLS FIRST, ps.space_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list_by_client(&self, client_id: i64) -> AppResult<Vec<ParkingAssignment>> {
        sqlx::query_as::<_, ParkingAssignment>(
            "SELECT * FROM parking_assignments WHERE client_id = $1 ORDER BY assigned_date DESC, id DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn search(&self, filter: &AssignmentFilter) -> AppResult<(Vec<ParkingAssignment>, i64)> {
        let (page, page_size) = normalize_pagination(filter.page, filter.page_size);

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count_query.push(SEARCH_FROM);
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut page_query = QueryBuilder::<Postgres>::new("SELECT pa.*");
        page_query.push(SEARCH_FROM);
        push_filters(&mut page_query, filter);
        page_query
            .push(" ORDER BY pa.assigned_date DESC, pa.id DESC LIMIT ")
            .push_bind(page_size)
            .push(" OFFSET ")
            .push_bind((page - 1) * page_size);

        let assignments = page_query
            .build_query_as::<ParkingAssignment>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((assignments, total))
    }
}
