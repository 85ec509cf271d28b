//! Modelo de ParkingSpace
//!
//! `is_available` es una proyección derivada de las asignaciones: solo la
//! escribe el proyector de disponibilidad.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::cmp::Ordering;

use crate::utils::validation::{contains_ignore_case, search_term};

/// Tipo de espacio - mapea al ENUM space_type (el orden de declaración es el del ENUM)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[sqlx(type_name = "space_type")]
pub enum SpaceType {
    #[default]
    Regular,
    Compact,
    #[sqlx(rename = "VIP")]
    #[serde(rename = "VIP")]
    Vip,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ParkingSpace {
    pub id: i64,
    pub space_number: String,
    pub zone: Option<String>,
    pub space_type: SpaceType,
    pub is_available: bool,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl ParkingSpace {
    pub fn display_name(&self) -> String {
        match &self.zone {
            Some(zone) => format!("Espacio {} - {}", self.space_number, zone),
            None => format!("Espacio {}", self.space_number),
        }
    }

    /// Orden de listados: zona (sin zona primero) y luego número de espacio
    pub fn layout_order(&self, other: &ParkingSpace) -> Ordering {
        self.zone
            .cmp(&other.zone)
            .then_with(|| self.space_number.cmp(&other.space_number))
    }
}

#[derive(Debug, Clone)]
pub struct NewParkingSpace {
    pub space_number: String,
    pub zone: Option<String>,
    pub space_type: SpaceType,
    pub description: Option<String>,
}

impl NewParkingSpace {
    pub fn into_space(self, id: i64, created_date: DateTime<Utc>) -> ParkingSpace {
        ParkingSpace {
            id,
            space_number: self.space_number,
            zone: self.zone,
            space_type: self.space_type,
            is_available: true,
            is_active: true,
            description: self.description,
            created_date,
        }
    }
}

/// Cambios permitidos sobre un espacio; `is_available` queda fuera a propósito
#[derive(Debug, Clone, Default)]
pub struct SpaceChanges {
    pub space_number: Option<String>,
    pub zone: Option<String>,
    pub space_type: Option<SpaceType>,
    pub description: Option<String>,
}

impl SpaceChanges {
    pub fn apply(self, space: &mut ParkingSpace) {
        if let Some(space_number) = self.space_number {
            space.space_number = space_number;
        }
        if self.zone.is_some() {
            space.zone = self.zone;
        }
        if let Some(space_type) = self.space_type {
            space.space_type = space_type;
        }
        if self.description.is_some() {
            space.description = self.description;
        }
    }
}

/// Filtros para listados de espacios
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceFilter {
    pub zone: Option<String>,
    pub space_type: Option<SpaceType>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    /// Número, zona o descripción
    pub search: Option<String>,
}

impl SpaceFilter {
    pub fn matches(&self, space: &ParkingSpace) -> bool {
        self.zone.as_ref().map_or(true, |zone| space.zone.as_ref() == Some(zone))
            && self.space_type.map_or(true, |space_type| space.space_type == space_type)
            && self.is_available.map_or(true, |available| space.is_available == available)
            && self.is_active.map_or(true, |active| space.is_active == active)
            && search_term(self.search.as_deref()).map_or(true, |term| {
                contains_ignore_case(&space.space_number, term)
                    || space.zone.as_deref().map_or(false, |zone| contains_ignore_case(zone, term))
                    || space
                        .description
                        .as_deref()
                        .map_or(false, |description| contains_ignore_case(description, term))
            })
    }
}
