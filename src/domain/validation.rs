use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::{
    entities::contact::{ContactForm, ContactRecord, ServiceCode},
    errors::FieldError,
};

const PHONE_DIGITS: usize = 10;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("static regex"));

/// Applies the field rules in form order and stops at the first violation.
pub fn validate_contact_form(form: &ContactForm) -> Result<ContactRecord, FieldError> {
    let nombre = validate_name(&form.nombre)?;
    let telefono = normalize_phone(&form.telefono)?;
    let email = validate_email(&form.email)?;
    let servicio = form.servicio.parse::<ServiceCode>()?;

    Ok(ContactRecord {
        nombre,
        empresa: non_blank(form.empresa.as_deref()),
        telefono,
        email,
        servicio,
        mensaje: non_blank(form.mensaje.as_deref()),
    })
}

pub fn validate_name(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("nombre", "El nombre es requerido"));
    }
    Ok(trimmed.to_string())
}

/// Strips every non-digit and requires exactly ten digits left over.
pub fn normalize_phone(raw: &str) -> Result<String, FieldError> {
    let digits = NON_DIGIT.replace_all(raw, "");
    if digits.len() != PHONE_DIGITS {
        return Err(FieldError::new(
            "telefono",
            "El teléfono debe contener 10 dígitos.",
        ));
    }
    Ok(digits.into_owned())
}

pub fn validate_email(raw: &str) -> Result<String, FieldError> {
    let email = raw.trim().to_string();
    if !email.validate_email() {
        return Err(FieldError::new(
            "email",
            "El correo electrónico no es válido (ej: nombre@dominio.com).",
        ));
    }
    Ok(email)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
