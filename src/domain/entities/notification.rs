use crate::entities::contact::ContactRecord;

/// Request details attached to every notification for operators.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub client_address: String,
    pub user_agent: String,
    pub server_time_utc: String,
    pub server_time_cst: String,
    pub client_timezone: String,
    pub client_language: String,
    pub client_timestamp: String,
}

/// Fully formatted message handed to a `NotificationSender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotification {
    pub subject: String,
    pub text: String,
}

impl ContactNotification {
    pub fn compose(record: &ContactRecord, meta: &RequestMetadata) -> Self {
        let empresa = record.empresa.as_deref().unwrap_or("No especificada");
        let mensaje = record
            .mensaje
            .as_deref()
            .unwrap_or("El cliente no dejó un mensaje adicional.");

        let text = format!(
            "Nuevo mensaje desde el formulario de contacto de LINMSO:

--- INFORMACIÓN DEL CLIENTE ---
- Nombre: {nombre}
- Empresa: {empresa}
- Teléfono: {telefono}
- Email: {email}

--- DETALLES DE LA SOLICITUD ---
- Servicio Solicitado: {servicio}
- Mensaje:
{mensaje}

--- INFORMACIÓN TÉCNICA ---
- IP de Origen: {ip}
- Agente (Navegador/SO): {agent}
- Idioma del Navegador: {language}
- Zona Horaria del Dispositivo: {timezone}
- Hora del Servidor (UTC): {utc}
- Hora del Servidor (CST): {cst}
- Hora del Cliente (Local): {client_time}
---
Enviado desde el sitio web LINMSO.
",
            nombre = record.nombre,
            telefono = record.telefono,
            email = record.email,
            servicio = record.servicio.title(),
            ip = meta.client_address,
            agent = meta.user_agent,
            language = meta.client_language,
            timezone = meta.client_timezone,
            utc = meta.server_time_utc,
            cst = meta.server_time_cst,
            client_time = meta.client_timestamp,
        );

        ContactNotification {
            subject: format!("Nuevo Contacto Web: {}", record.nombre),
            text,
        }
    }
}
