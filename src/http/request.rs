//! # Modelo de Request
//! src/http/request.rs
//!
//! Un `Request` es inmutable: solo se construye desde el parser
//! (`http::parser::parse`) después de validar la request line, así que
//! método, path y versión nunca están vacíos.

use std::borrow::Cow;
use std::collections::HashMap;

/// Métodos HTTP
///
/// Los verbos conocidos tienen variante propia; cualquier otro token se
/// conserva tal cual en `Other` para que el dispatcher pueda compararlo
/// como texto.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    /// Método de extensión, sensible a mayúsculas (`get` no es `GET`)
    Other(String),
}

impl Method {
    /// Parsea un método desde su token. Nunca falla.
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            "OPTIONS" => Method::OPTIONS,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::Other(token) => token,
        }
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        Method::parse(token)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Target completo tal como llegó (la query string no se separa)
    path: String,

    /// Versión HTTP (ej: "HTTP/1.1")
    version: String,

    /// Headers, nombres sensibles a mayúsculas. Un nombre repetido
    /// sobrescribe al anterior.
    headers: HashMap<String, String>,

    /// Body, solo presente si el cliente envió uno
    body: Option<Vec<u8>>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        version: String,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> Self {
        Self {
            method,
            path,
            version,
            headers,
            body,
        }
    }

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el target del request (incluye la query string si la hay)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header por su nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Obtiene el body como texto (bytes inválidos se reemplazan)
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        self.body.as_deref().map(String::from_utf8_lossy)
    }
}
