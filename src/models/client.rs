//! Modelo de Client
//!
//! Mapea a la tabla clients. Único por número de documento y por email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::validation::{contains_ignore_case, search_term};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document_number: String,
    pub document_type: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Datos de alta de un cliente (ya validados)
#[derive(Debug, Clone)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub document_number: String,
    pub document_type: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
}

impl NewClient {
    pub fn into_client(self, id: i64, registration_date: DateTime<Utc>) -> Client {
        Client {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            document_number: self.document_number,
            document_type: self.document_type,
            phone: self.phone,
            email: self.email,
            address: self.address,
            registration_date,
            is_active: true,
        }
    }
}

/// Cambios parciales sobre un cliente; los campos ausentes no se tocan
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_number: Option<String>,
    pub document_type: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ClientChanges {
    pub fn apply(self, client: &mut Client) {
        if let Some(first_name) = self.first_name {
            client.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            client.last_name = last_name;
        }
        if let Some(document_number) = self.document_number {
            client.document_number = document_number;
        }
        if let Some(document_type) = self.document_type {
            client.document_type = document_type;
        }
        if self.phone.is_some() {
            client.phone = self.phone;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
        if self.address.is_some() {
            client.address = self.address;
        }
    }
}

/// Filtros para listados de clientes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub is_active: Option<bool>,
    /// Nombre, apellido, email o documento
    pub search: Option<String>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        self.is_active.map_or(true, |active| client.is_active == active)
            && search_term(self.search.as_deref()).map_or(true, |term| {
                [
                    client.first_name.as_str(),
                    client.last_name.as_str(),
                    client.email.as_str(),
                    client.document_number.as_str(),
                ]
                .iter()
                .any(|field| contains_ignore_case(field, term))
            })
    }
}
