//! Modelo de ParkingAssignment
//!
//! Una asignación vincula un cliente, uno de sus coches y un espacio.
//! Conserva dos banderas independientes: `status` (ciclo de vida) e
//! `is_active` (baja lógica). Nunca se borra físicamente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;

/// Estado de la asignación - mapea al ENUM assignment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "assignment_status")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Expired,
    Cancelled,
    Suspended,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "Active",
            AssignmentStatus::Expired => "Expired",
            AssignmentStatus::Cancelled => "Cancelled",
            AssignmentStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AssignmentStatus::Active),
            "expired" => Ok(AssignmentStatus::Expired),
            "cancelled" | "canceled" => Ok(AssignmentStatus::Cancelled),
            "suspended" => Ok(AssignmentStatus::Suspended),
            other => Err(format!("Unknown assignment status '{}'", other)),
        }
    }
}

/// Vista única del ciclo de vida combinando `status` e `is_active`.
/// `Deleted` gana sobre cualquier estado cuando la baja lógica está marcada.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AssignmentState {
    Active,
    Expired,
    Cancelled,
    Suspended,
    Deleted,
}

/// Asignación principal - mapea exactamente a la tabla parking_assignments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ParkingAssignment {
    pub id: i64,
    pub client_id: i64,
    pub car_id: i64,
    pub parking_space_id: i64,
    pub assigned_date: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

impl ParkingAssignment {
    /// Ocupa su espacio: es la condición que protege el índice único parcial
    pub fn holds_space(&self) -> bool {
        holds_space(self.status, self.is_active)
    }

    /// Vigente en el instante `now`, incluyendo la ventana de fechas
    pub fn is_currently_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.holds_space()
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| end >= now)
    }

    pub fn state(&self) -> AssignmentState {
        if !self.is_active {
            return AssignmentState::Deleted;
        }
        match self.status {
            AssignmentStatus::Active => AssignmentState::Active,
            AssignmentStatus::Expired => AssignmentState::Expired,
            AssignmentStatus::Cancelled => AssignmentState::Cancelled,
            AssignmentStatus::Suspended => AssignmentState::Suspended,
        }
    }
}

/// Predicado compartido por la detección de conflictos, el proyector y el guard
pub fn holds_space(status: AssignmentStatus, is_active: bool) -> bool {
    is_active && status == AssignmentStatus::Active
}

/// Propuesta de asignación que recibe el motor (alta o modificación)
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentDraft {
    pub id: Option<i64>,
    pub client_id: i64,
    pub car_id: i64,
    pub parking_space_id: i64,
    pub assigned_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl AssignmentDraft {
    pub fn new(client_id: i64, car_id: i64, parking_space_id: i64) -> Self {
        Self {
            id: None,
            client_id,
            car_id,
            parking_space_id,
            assigned_date: None,
            start_date: None,
            end_date: None,
            status: AssignmentStatus::Active,
            notes: None,
            is_active: true,
        }
    }

    pub fn holds_space(&self) -> bool {
        holds_space(self.status, self.is_active)
    }
}

/// Registro listo para insertar (fechas ya resueltas)
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub client_id: i64,
    pub car_id: i64,
    pub parking_space_id: i64,
    pub assigned_date: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}

impl NewAssignment {
    pub fn from_draft(draft: AssignmentDraft, now: DateTime<Utc>) -> Self {
        Self {
            client_id: draft.client_id,
            car_id: draft.car_id,
            parking_space_id: draft.parking_space_id,
            assigned_date: draft.assigned_date.unwrap_or(now),
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            notes: draft.notes,
            is_active: draft.is_active,
            created_date: now,
        }
    }

    pub fn into_assignment(self, id: i64) -> ParkingAssignment {
        ParkingAssignment {
            id,
            client_id: self.client_id,
            car_id: self.car_id,
            parking_space_id: self.parking_space_id,
            assigned_date: self.assigned_date,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            notes: self.notes,
            is_active: self.is_active,
            created_date: self.created_date,
            modified_date: None,
        }
    }
}

/// Filtros para búsqueda de asignaciones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentFilter {
    pub client_id: Option<i64>,
    pub car_id: Option<i64>,
    pub parking_space_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub is_active: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Nombre o apellido del cliente, matrícula o número de espacio
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl AssignmentFilter {
    /// Filtros estructurados; `search` necesita las entidades relacionadas y se evalúa aparte
    pub fn matches(&self, assignment: &ParkingAssignment) -> bool {
        self.client_id.map_or(true, |id| assignment.client_id == id)
            && self.car_id.map_or(true, |id| assignment.car_id == id)
            && self.parking_space_id.map_or(true, |id| assignment.parking_space_id == id)
            && self.status.map_or(true, |status| assignment.status == status)
            && self.is_active.map_or(true, |active| assignment.is_active == active)
            && self
                .start_date
                .map_or(true, |from| assignment.start_date.map_or(false, |start| start >= from))
            && self
                .end_date
                .map_or(true, |until| assignment.end_date.map_or(false, |end| end <= until))
    }
}

/// Texto de auditoría que se agrega a las notas al revocar
pub fn revocation_note(reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .map(|reason| format!("Revoked: {}", reason))
}

/// Agrega una línea a las notas sin borrar el contenido previo
pub fn append_note(notes: Option<&str>, line: &str) -> String {
    match notes {
        Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, line),
        _ => line.to_string(),
    }
}
