//! Validación de IMEI
//!
//! Funciones puras para validar (checksum Luhn), formatear y detectar
//! duplicados de IMEI de rastreadores.

use lazy_static::lazy_static;
use regex::Regex;

/// Cantidad de dígitos de un IMEI completo (14 + dígito verificador)
pub const IMEI_LENGTH: usize = 15;

lazy_static! {
    static ref IMEI_GROUPS: Regex = Regex::new(r"^(\d{2})(\d{6})(\d{6})(\d)$").unwrap();
}

/// Registro mínimo necesario para la detección de duplicados
pub trait ImeiRecord {
    fn record_id(&self) -> &str;
    fn record_imei(&self) -> &str;
}

impl ImeiRecord for crate::models::device::Device {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn record_imei(&self) -> &str {
        &self.imei
    }
}

/// Eliminar todo lo que no sea dígito ASCII
pub fn normalize_imei(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validar un IMEI con el algoritmo de Luhn.
///
/// Devuelve `false` para cualquier entrada mal formada; nunca falla.
pub fn validate_imei(raw: &str) -> bool {
    let clean = normalize_imei(raw);
    if clean.len() != IMEI_LENGTH {
        return false;
    }

    let digits: Vec<u32> = clean.chars().filter_map(|c| c.to_digit(10)).collect();
    let (body, check) = digits.split_at(IMEI_LENGTH - 1);

    // De derecha a izquierda; el dígito contiguo al verificador se duplica
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(position, &digit)| {
            if position % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled % 10 + 1
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    let check_digit = (10 - (sum % 10)) % 10;
    check_digit == check[0]
}

/// Formatear un IMEI para mostrarlo como `AA-BBBBBB-CCCCCC-D`.
///
/// Si no hay exactamente 15 dígitos la entrada se devuelve intacta.
pub fn format_imei(raw: &str) -> String {
    let clean = normalize_imei(raw);
    if clean.len() != IMEI_LENGTH {
        return raw.to_string();
    }
    IMEI_GROUPS.replace(&clean, "$1-$2-$3-$4").into_owned()
}

/// Verificar si el IMEI ya existe entre los registros, ignorando `exclude_id`
pub fn is_duplicate_imei<R: ImeiRecord>(raw: &str, existing: &[R], exclude_id: Option<&str>) -> bool {
    let clean = normalize_imei(raw);
    existing.iter().any(|record| {
        Some(record.record_id()) != exclude_id && normalize_imei(record.record_imei()) == clean
    })
}
