use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{constants::NOT_AVAILABLE, errors::FieldError};

/// Raw form body posted by the website.
/// Missing text fields deserialize as empty strings so that the field rules
/// report them instead of the form extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub nombre: String,

    #[serde(default)]
    pub empresa: Option<String>,

    #[serde(default)]
    pub telefono: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub servicio: String,

    #[serde(default)]
    pub mensaje: Option<String>,

    /// Hidden trap field. Humans never see it, so it stays empty.
    #[serde(default)]
    pub website_url: Option<String>,

    #[serde(default = "not_available")]
    pub client_timezone: String,

    #[serde(default = "not_available")]
    pub client_language: String,

    #[serde(default = "not_available")]
    pub client_timestamp_full: String,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

impl ContactForm {
    pub fn is_honeypot_filled(&self) -> bool {
        self.website_url.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// A submission that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub nombre: String,
    pub empresa: Option<String>,
    pub telefono: String,
    pub email: String,
    pub servicio: ServiceCode,
    pub mensaje: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCode {
    PersonalLimpieza,
    LimpiezaProfunda,
    PulidoEncerado,
    FumigacionSanitizacion,
    Jardineria,
    VentaProductos,
}

impl ServiceCode {
    pub const ALL: [ServiceCode; 6] = [
        ServiceCode::PersonalLimpieza,
        ServiceCode::LimpiezaProfunda,
        ServiceCode::PulidoEncerado,
        ServiceCode::FumigacionSanitizacion,
        ServiceCode::Jardineria,
        ServiceCode::VentaProductos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCode::PersonalLimpieza => "personal-limpieza",
            ServiceCode::LimpiezaProfunda => "limpieza-profunda",
            ServiceCode::PulidoEncerado => "pulido-encerado",
            ServiceCode::FumigacionSanitizacion => "fumigacion-sanitizacion",
            ServiceCode::Jardineria => "jardineria",
            ServiceCode::VentaProductos => "venta-productos",
        }
    }

    /// Human readable title, e.g. `pulido-encerado` -> `Pulido Encerado`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for ServiceCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| FieldError::new("servicio", "Servicio no válido"))
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
