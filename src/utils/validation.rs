//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación y normalización
//! de datos de entrada.

use validator::ValidationError;

/// Normalizar una placa: sin espacios en los extremos y en mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Normalizar un e-mail para comparaciones sin distinguir mayúsculas
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de placa (básico)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 5 || clean_plate.len() > 10 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un IMEI (15 dígitos con checksum Luhn) en un DTO
pub fn validate_imei_field(value: &str) -> Result<(), ValidationError> {
    if !crate::utils::imei::validate_imei(value) {
        let mut error = ValidationError::new("imei");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS (simplificado)
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lon) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lon);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  abc1234 "), "ABC1234");
        assert_eq!(normalize_plate("ABC1234"), "ABC1234");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Ana.Souza@Linka.com "), "ana.souza@linka.com");
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("algo").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("ABC-1234").is_ok());
        assert!(validate_license_plate("A").is_err());
        assert!(validate_license_plate("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_validate_imei_field() {
        assert!(validate_imei_field("49-015420-323751-8").is_ok());
        assert!(validate_imei_field("490154203237519").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-16.6799, -49.255).is_ok());
        assert!(validate_coordinates(91.0, -75.0).is_err());
        assert!(validate_coordinates(45.0, -181.0).is_err());
    }
}
