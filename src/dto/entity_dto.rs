use serde::Deserialize;
use validator::Validate;

use crate::models::{
    car::{CarChanges, NewCar},
    client::{ClientChanges, NewClient},
    parking_space::{NewParkingSpace, SpaceChanges, SpaceType},
};
use crate::utils::validation::{normalize_license_plate, validate_not_empty, LICENSE_PLATE_REGEX};

fn default_document_type() -> String {
    "DNI".to_string()
}

// Request para registrar un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: String,
    #[validate(length(min = 1, max = 20), custom = "validate_not_empty")]
    pub document_number: String,
    #[serde(default = "default_document_type")]
    #[validate(length(min = 1, max = 50))]
    pub document_type: String,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(max = 200))]
    pub address: Option<String>,
}

impl From<CreateClientRequest> for NewClient {
    fn from(request: CreateClientRequest) -> Self {
        Self {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            document_number: request.document_number.trim().to_string(),
            document_type: request.document_type,
            phone: request.phone,
            email: request.email.trim().to_lowercase(),
            address: request.address,
        }
    }
}

// Request para modificar un cliente; solo se cambian los campos enviados
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 20), custom = "validate_not_empty")]
    pub document_number: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub document_type: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
}

impl From<UpdateClientRequest> for ClientChanges {
    fn from(request: UpdateClientRequest) -> Self {
        Self {
            first_name: request.first_name.map(|v| v.trim().to_string()),
            last_name: request.last_name.map(|v| v.trim().to_string()),
            document_number: request.document_number.map(|v| v.trim().to_string()),
            document_type: request.document_type,
            phone: request.phone,
            email: request.email.map(|v| v.trim().to_lowercase()),
            address: request.address,
        }
    }
}

// Request para registrar un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(regex = "LICENSE_PLATE_REGEX")]
    pub license_plate: String,
    #[validate(length(min = 1, max = 50))]
    pub brand: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(length(max = 20))]
    pub color: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1))]
    pub client_id: i64,
}

impl CreateCarRequest {
    /// Normaliza la matrícula antes de validar
    pub fn normalized(mut self) -> Self {
        self.license_plate = normalize_license_plate(&self.license_plate);
        self
    }
}

impl From<CreateCarRequest> for NewCar {
    fn from(request: CreateCarRequest) -> Self {
        Self {
            license_plate: request.license_plate,
            brand: request.brand,
            model: request.model,
            color: request.color,
            year: request.year,
            client_id: request.client_id,
        }
    }
}

// Request para actualizar un coche; client_id solo se acepta si no cambia
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(regex = "LICENSE_PLATE_REGEX")]
    pub license_plate: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
    #[validate(length(max = 20))]
    pub color: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub client_id: Option<i64>,
}

impl UpdateCarRequest {
    pub fn normalized(mut self) -> Self {
        self.license_plate = self.license_plate.as_deref().map(normalize_license_plate);
        self
    }

    pub fn into_changes(self) -> CarChanges {
        CarChanges {
            license_plate: self.license_plate,
            brand: self.brand,
            model: self.model,
            color: self.color,
            year: self.year,
        }
    }
}

// Request para crear un espacio; is_available no se acepta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    #[validate(length(min = 1, max = 10), custom = "validate_not_empty")]
    pub space_number: String,
    #[validate(length(max = 50))]
    pub zone: Option<String>,
    #[serde(default)]
    pub space_type: SpaceType,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

impl From<CreateSpaceRequest> for NewParkingSpace {
    fn from(request: CreateSpaceRequest) -> Self {
        Self {
            space_number: request.space_number.trim().to_string(),
            zone: request.zone,
            space_type: request.space_type,
            description: request.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSpaceRequest {
    #[validate(length(min = 1, max = 10))]
    pub space_number: Option<String>,
    #[validate(length(max = 50))]
    pub zone: Option<String>,
    pub space_type: Option<SpaceType>,
    #[validate(length(max = 200))]
    pub description: Option<String>,
}

impl From<UpdateSpaceRequest> for SpaceChanges {
    fn from(request: UpdateSpaceRequest) -> Self {
        Self {
            space_number: request.space_number.map(|n| n.trim().to_string()),
            zone: request.zone,
            space_type: request.space_type,
            description: request.description,
        }
    }
}
