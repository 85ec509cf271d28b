//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los DTOs con `validator`.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Matrícula: letras mayúsculas, dígitos y guiones (máximo 10 caracteres)
    pub static ref LICENSE_PLATE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9\- ]{0,9}$").unwrap();
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normalizar matrícula antes de validarla y guardarla
pub fn normalize_license_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Término de búsqueda libre; en blanco equivale a no filtrar
pub fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|term| !term.is_empty())
}

/// Coincidencia parcial sin distinguir mayúsculas (equivale a ILIKE '%term%')
pub fn contains_ignore_case(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

/// Patrón ILIKE con los comodines del término escapados
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Normalizar parámetros de paginación (página 1-based)
pub fn normalize_pagination(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("A-01").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_license_plate_regex() {
        assert!(LICENSE_PLATE_REGEX.is_match(&normalize_license_plate(" abc-123 ")));
        assert!(!LICENSE_PLATE_REGEX.is_match("abc123"));
        assert!(!LICENSE_PLATE_REGEX.is_match("ABCDEFGHIJK1"));
    }

    #[test]
    fn test_search_helpers() {
        assert_eq!(search_term(Some("  garcía ")), Some("garcía"));
        assert_eq!(search_term(Some("   ")), None);
        assert!(contains_ignore_case("ABC-123", "bc-1"));
        assert_eq!(like_pattern("50%_a"), "%50\\%\\_a%");
    }

    #[test]
    fn test_normalize_pagination() {
        assert_eq!(normalize_pagination(None, None), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(normalize_pagination(Some(0), Some(1000)), (1, MAX_PAGE_SIZE));
        assert_eq!(normalize_pagination(Some(3), Some(25)), (3, 25));
    }
}
