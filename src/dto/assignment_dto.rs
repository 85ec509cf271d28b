use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::parking_assignment::{
    AssignmentDraft, AssignmentState, AssignmentStatus, ParkingAssignment,
};

fn default_true() -> bool {
    true
}

// Request para crear o actualizar una asignación
#[derive(Debug, Deserialize, Validate)]
pub struct AssignmentRequest {
    pub id: Option<i64>,
    #[validate(range(min = 1))]
    pub client_id: i64,
    #[validate(range(min = 1))]
    pub car_id: i64,
    #[validate(range(min = 1))]
    pub parking_space_id: i64,
    pub assigned_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: AssignmentStatus,
    // Sin límite: las revocaciones agregan líneas y el registro debe poder reenviarse completo
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<AssignmentRequest> for AssignmentDraft {
    fn from(request: AssignmentRequest) -> Self {
        Self {
            id: request.id,
            client_id: request.client_id,
            car_id: request.car_id,
            parking_space_id: request.parking_space_id,
            assigned_date: request.assigned_date,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            notes: request.notes,
            is_active: request.is_active,
        }
    }
}

// Request para revocar una asignación
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RevokeRequest {
    #[validate(length(max = 200))]
    pub reason: Option<String>,
}

// Response de asignación
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
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
    pub state: AssignmentState,
    pub is_currently_active: bool,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

impl From<ParkingAssignment> for AssignmentResponse {
    fn from(assignment: ParkingAssignment) -> Self {
        Self {
            state: assignment.state(),
            is_currently_active: assignment.is_currently_effective_at(Utc::now()),
            id: assignment.id,
            client_id: assignment.client_id,
            car_id: assignment.car_id,
            parking_space_id: assignment.parking_space_id,
            assigned_date: assignment.assigned_date,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            status: assignment.status,
            notes: assignment.notes,
            is_active: assignment.is_active,
            created_date: assignment.created_date,
            modified_date: assignment.modified_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults_to_active() {
        let request: AssignmentRequest = serde_json::from_value(json!({
            "client_id": 1,
            "car_id": 2,
            "parking_space_id": 3
        }))
        .unwrap();
        let draft = AssignmentDraft::from(request);

        assert_eq!(draft.status, AssignmentStatus::Active);
        assert!(draft.is_active);
        assert!(draft.holds_space());
    }

    #[test]
    fn test_request_accepts_long_note_history() {
        let history = (0..60)
            .map(|n| format!("Revoked: no-show on visit {}", n))
            .collect::<Vec<_>>()
            .join("\n");
        let request: AssignmentRequest = serde_json::from_value(json!({
            "id": 9,
            "client_id": 1,
            "car_id": 2,
            "parking_space_id": 3,
            "notes": history
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
