//! Modelo de Car
//!
//! Cada coche pertenece a exactamente un cliente. `client_id` no cambia
//! después del alta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::validation::{contains_ignore_case, search_term};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Car {
    pub id: i64,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: Option<String>,
    pub year: i32,
    pub client_id: i64,
    pub registration_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Car {
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.license_plate)
    }
}

#[derive(Debug, Clone)]
pub struct NewCar {
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: Option<String>,
    pub year: i32,
    pub client_id: i64,
}

impl NewCar {
    pub fn into_car(self, id: i64, registration_date: DateTime<Utc>) -> Car {
        Car {
            id,
            license_plate: self.license_plate,
            brand: self.brand,
            model: self.model,
            color: self.color,
            year: self.year,
            client_id: self.client_id,
            registration_date,
            is_active: true,
        }
    }
}

/// Cambios descriptivos permitidos sobre un coche; el propietario no se toca
#[derive(Debug, Clone, Default)]
pub struct CarChanges {
    pub license_plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
}

impl CarChanges {
    pub fn apply(self, car: &mut Car) {
        if let Some(license_plate) = self.license_plate {
            car.license_plate = license_plate;
        }
        if let Some(brand) = self.brand {
            car.brand = brand;
        }
        if let Some(model) = self.model {
            car.model = model;
        }
        if self.color.is_some() {
            car.color = self.color;
        }
        if let Some(year) = self.year {
            car.year = year;
        }
    }
}

/// Filtros para listados de coches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarFilter {
    pub client_id: Option<i64>,
    pub is_active: Option<bool>,
    /// Matrícula, marca, modelo o color
    pub search: Option<String>,
}

impl CarFilter {
    pub fn matches(&self, car: &Car) -> bool {
        self.client_id.map_or(true, |id| car.client_id == id)
            && self.is_active.map_or(true, |active| car.is_active == active)
            && search_term(self.search.as_deref()).map_or(true, |term| {
                contains_ignore_case(&car.license_plate, term)
                    || contains_ignore_case(&car.brand, term)
                    || contains_ignore_case(&car.model, term)
                    || car.color.as_deref().map_or(false, |color| contains_ignore_case(color, term))
            })
    }
}
