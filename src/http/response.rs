//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Toda respuesta tiene la misma forma:
//!
//! ```text
//! <status line>\r\n
//! \r\n
//! <body>\r\n
//! ```
//!
//! Sin `Content-Length`, sin `Content-Type`, sin keep-alive: el servidor
//! cierra la conexión después de escribirla, así que el cliente lee hasta EOF.
//!
//! ## Status line
//!
//! - [`StatusMode::Legacy`]: siempre `HTTP/1.1 200 OK ` (con el espacio
//!   final). El resultado real solo se distingue por el body.
//! - [`StatusMode::Strict`]: el código real, ej: `HTTP/1.1 404 Not Found`.

use super::StatusCode;
use crate::router::Outcome;
use std::io::Write;

/// Status line que usan todas las respuestas en modo legacy
pub const LEGACY_STATUS_LINE: &str = "HTTP/1.1 200 OK ";

/// Body para rutas inexistentes
pub const NOT_FOUND_BODY: &str = "404 Not Found";

/// Body para un path existente pedido con otro método
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed";

/// Cómo se escribe la status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMode {
    /// `200 OK` para todo
    #[default]
    Legacy,

    /// El código que corresponde al resultado
    Strict,
}

/// Respuesta lista para escribir en el socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código de estado real del resultado
    status: StatusCode,

    /// Body en texto
    body: String,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Respuesta de error cuyo body es el propio código, ej: "400 Bad Request"
    pub fn error(status: StatusCode) -> Self {
        Self::new(status, status.to_string())
    }

    /// Convierte el resultado del dispatcher en respuesta
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{Response, StatusCode};
    /// use minihttp::router::Outcome;
    ///
    /// let response = Response::from_outcome(Outcome::NotFound);
    /// assert_eq!(response.status(), StatusCode::NotFound);
    /// assert_eq!(response.body(), "404 Not Found");
    /// ```
    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(body) => Self::new(StatusCode::Ok, body),
            Outcome::NotFound => Self::new(StatusCode::NotFound, NOT_FOUND_BODY),
            Outcome::MethodNotAllowed => {
                Self::new(StatusCode::MethodNotAllowed, METHOD_NOT_ALLOWED_BODY)
            }
            Outcome::BadRequest(e) => Self::error(e.status()),
            Outcome::HandlerFailed(_) => Self::error(StatusCode::InternalServerError),
            Outcome::Overloaded => Self::error(StatusCode::ServiceUnavailable),
        }
    }

    /// Status line según el modo, sin el `\r\n`
    pub fn status_line(&self, mode: StatusMode) -> String {
        match mode {
            StatusMode::Legacy => LEGACY_STATUS_LINE.to_string(),
            StatusMode::Strict => format!("HTTP/1.1 {}", self.status),
        }
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{Response, StatusCode, StatusMode};
    ///
    /// let response = Response::new(StatusCode::Ok, "Hello");
    /// assert_eq!(response.to_bytes(StatusMode::Legacy), b"HTTP/1.1 200 OK \r\n\r\nHello\r\n");
    /// ```
    pub fn to_bytes(&self, mode: StatusMode) -> Vec<u8> {
        let status_line = self.status_line(mode);

        let mut result = Vec::with_capacity(status_line.len() + self.body.len() + 6);
        result.extend_from_slice(status_line.as_bytes());
        result.extend_from_slice(b"\r\n\r\n");
        result.extend_from_slice(self.body.as_bytes());
        result.extend_from_slice(b"\r\n");
        result
    }

    /// Escribe la respuesta completa y hace flush
    pub fn write_to<W: Write>(&self, writer: &mut W, mode: StatusMode) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes(mode))?;
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el body
    pub fn body(&self) -> &str {
        &self.body
    }
}
