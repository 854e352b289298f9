//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos que puede producir el servidor. En modo legacy todos viajan con
//! la status line `200 OK` y el código real solo aparece en el body; en modo
//! estricto se escriben tal cual.
//!
//! - **2xx**: Éxito (200)
//! - **4xx**: Error del cliente (400, 404, 405, 413, 431)
//! - **5xx**: Error del servidor (500, 503)

/// Códigos de estado que soporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - El handler respondió
    Ok = 200,

    /// 400 Bad Request - Request malformado
    BadRequest = 400,

    /// 404 Not Found - No hay ruta para el path
    NotFound = 404,

    /// 405 Method Not Allowed - El path existe con otro método
    MethodNotAllowed = 405,

    /// 413 Payload Too Large - Body por encima del límite
    PayloadTooLarge = 413,

    /// 431 Request Header Fields Too Large - Cabecera por encima del límite
    RequestHeaderFieldsTooLarge = 431,

    /// 500 Internal Server Error - El handler falló
    InternalServerError = 500,

    /// 503 Service Unavailable - Cola de workers llena
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
        assert_eq!(StatusCode::RequestHeaderFieldsTooLarge.as_u16(), 431);
        assert_eq!(StatusCode::ServiceUnavailable.as_u16(), 503);
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
        assert_eq!(StatusCode::MethodNotAllowed.to_string(), "405 Method Not Allowed");
    }
}
