//! # Parser de Requests
//! src/http/parser.rs
//!
//! Convierte los bytes leídos del socket en un [`Request`].
//!
//! ## Formato aceptado
//!
//! ```text
//! POST /echo HTTP/1.1\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! 1. **Request line**: exactamente tres tokens separados por espacios
//! 2. **Headers**: `Name: value`, separados en el primer `": "`
//! 3. **Línea vacía**: fin de la cabecera (`\r\n` o `\n`)
//! 4. **Body**: exactamente `Content-Length` bytes. Sin ese header solo un
//!    POST toma lo que venga después de la línea vacía.
//!
//! Los headers repetidos se sobrescriben (gana el último), a diferencia de
//! HTTP que los acumula.

use super::request::{Method, Request};
use super::status::StatusCode;
use std::collections::HashMap;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Request vacío (o solo espacios)
    #[error("Empty request")]
    Empty,

    /// La cabecera no es UTF-8 válido
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,

    /// La request line no tiene exactamente tres tokens
    #[error("Malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Header sin el separador `": "`
    #[error("Malformed header: {0:?}")]
    MalformedHeader(String),

    /// `Content-Length` no es un entero no negativo
    #[error("Invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// El cliente cerró antes de enviar todo el body declarado
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// La cabecera supera el límite configurado
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// El body declarado supera el límite configurado
    #[error("Request body of {0} bytes exceeds the limit")]
    BodyTooLarge(usize),
}

impl ParseError {
    /// Código con el que se reporta este error al cliente
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::HeadTooLarge(_) => StatusCode::RequestHeaderFieldsTooLarge,
            ParseError::BodyTooLarge(_) => StatusCode::PayloadTooLarge,
            _ => StatusCode::BadRequest,
        }
    }
}

/// Posición de la línea vacía que separa cabecera y body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadSplit {
    /// Fin (exclusivo) de la cabecera, sin la línea vacía
    pub head_end: usize,

    /// Primer byte del body
    pub body_start: usize,
}

/// Busca la primera línea vacía después de la request line.
///
/// Retorna `None` si todavía no llegó; el read loop lo usa para saber
/// cuándo dejar de leer la cabecera.
pub fn split_head(buffer: &[u8]) -> Option<HeadSplit> {
    let mut line_start = 0;
    let mut request_line = true;

    for (i, &byte) in buffer.iter().enumerate() {
        if byte != b'\n' {
            continue;
        }

        let line = &buffer[line_start..i];
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        if !request_line && line.is_empty() {
            return Some(HeadSplit {
                head_end: line_start,
                body_start: i + 1,
            });
        }

        request_line = false;
        line_start = i + 1;
    }

    None
}

/// Cabecera parseada, antes de tener el body
#[derive(Debug)]
pub(crate) struct Head {
    pub method: Method,
    pub path: String,
    pub version: String,
    pub headers: HashMap<String, String>,
}

/// Parsea la request line y los headers (sin la línea vacía)
pub(crate) fn parse_head(head: &[u8]) -> Result<Head, ParseError> {
    let text = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let request_line = lines.next().unwrap_or_default();
    let (method, path, version) = parse_request_line(request_line)?;
    let headers = parse_headers(lines)?;

    Ok(Head {
        method,
        path,
        version,
        headers,
    })
}

/// Formato: `GET /path HTTP/1.1`
fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    // Debe tener exactamente 3 partes: METHOD TARGET VERSION
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };

    Ok((Method::parse(method), target.to_string(), version.to_string()))
}

fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, String>, ParseError> {
    let mut headers = HashMap::new();

    for line in lines {
        // Solo puede ser el resto del último "\r\n"
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line.split_once(": ") else {
            return Err(ParseError::MalformedHeader(line.to_string()));
        };

        headers.insert(name.to_string(), value.to_string());
    }

    Ok(headers)
}

/// `Content-Length` sin distinguir mayúsculas en el nombre.
///
/// Si viene varias veces (`Content-Length` y `content-length`) todas deben
/// declarar el mismo valor; si no, el request es ambiguo y se rechaza.
fn content_length(headers: &HashMap<String, String>) -> Result<Option<usize>, ParseError> {
    let mut declared = None;

    for (name, value) in headers {
        if !name.eq_ignore_ascii_case("Content-Length") {
            continue;
        }

        let length: usize = value
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidContentLength(value.clone()))?;

        match declared {
            Some(previous) if previous != length => {
                return Err(ParseError::InvalidContentLength(value.clone()));
            }
            _ => declared = Some(length),
        }
    }

    Ok(declared)
}

/// `Content-Length` declarado en una cabecera ya completa.
///
/// Valida la cabecera entera, así un request malformado se rechaza sin
/// esperar su body.
pub fn declared_content_length(head: &[u8]) -> Result<Option<usize>, ParseError> {
    let head = parse_head(head)?;
    content_length(&head.headers)
}

/// Parsea un request completo desde bytes
///
/// # Ejemplo
///
/// ```
/// use minihttp::http::parser;
///
/// let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let request = parser::parse(raw).unwrap();
///
/// assert_eq!(request.path(), "/");
/// assert_eq!(request.header("Host"), Some("localhost"));
/// ```
pub fn parse(buffer: &[u8]) -> Result<Request, ParseError> {
    if buffer.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ParseError::Empty);
    }

    // Sin línea vacía toda la entrada es cabecera
    let (head_bytes, rest): (&[u8], &[u8]) = match split_head(buffer) {
        Some(split) => (&buffer[..split.head_end], &buffer[split.body_start..]),
        None => (buffer, &[]),
    };

    let head = parse_head(head_bytes)?;

    let body = match content_length(&head.headers)? {
        Some(0) => None,
        Some(expected) if rest.len() < expected => {
            return Err(ParseError::IncompleteBody {
                expected,
                received: rest.len(),
            });
        }
        Some(expected) => Some(rest[..expected].to_vec()),
        None if head.method == Method::POST && !rest.is_empty() => Some(rest.to_vec()),
        None => None,
    };

    Ok(Request::new(
        head.method,
        head.path,
        head.version,
        head.headers,
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let request = parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_none());
    }

    #[test]
    fn test_parse_bare_newlines() {
        let request = parse(b"GET /hello HTTP/1.0\nHost: x\n\n").unwrap();

        assert_eq!(request.path(), "/hello");
        assert_eq!(request.header("Host"), Some("x"));
    }

    #[test]
    fn test_parse_without_blank_line() {
        let request = parse(b"GET /world HTTP/1.1").unwrap();
        assert_eq!(request.path(), "/world");
    }

    #[test]
    fn test_query_string_is_kept() {
        let request = parse(b"GET /search?q=rust HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/search?q=rust");
    }

    #[test]
    fn test_parse_header() {
        let request = parse(b"GET / HTTP/1.1\r\nName: value\r\n\r\n").unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Name"), Some("value"));
    }

    #[test]
    fn test_duplicate_header_overwrites() {
        let raw = b"GET / HTTP/1.1\r\nName: first\r\nName: second\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("Name"), Some("second"));
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let raw = b"GET / HTTP/1.1\r\nX-Key: a\r\nx-key: b\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("X-Key"), Some("a"));
        assert_eq!(request.header("x-key"), Some("b"));
    }

    #[test]
    fn test_header_value_keeps_later_separators() {
        let raw = b"GET / HTTP/1.1\r\nX-Time: 12: 30\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("X-Time"), Some("12: 30"));
    }

    #[test]
    fn test_malformed_header() {
        let result = parse(b"GET / HTTP/1.1\r\nHost:localhost\r\n\r\n");
        assert_eq!(
            result.unwrap_err(),
            ParseError::MalformedHeader("Host:localhost".to_string())
        );
    }

    #[test]
    fn test_short_request_line() {
        let result = parse(b"GET /\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine(_))));
    }

    #[test]
    fn test_long_request_line() {
        let result = parse(b"GET / HTTP/1.1 extra\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine(_))));
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(parse(b"").unwrap_err(), ParseError::Empty);
        assert_eq!(parse(b"\r\n\r\n").unwrap_err(), ParseError::Empty);
    }

    #[test]
    fn test_invalid_encoding() {
        let result = parse(b"\xff\xfe / HTTP/1.1\r\n\r\n");
        assert_eq!(result.unwrap_err(), ParseError::InvalidEncoding);
    }

    #[test]
    fn test_post_body_with_content_length() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = parse(raw).unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_body_with_blank_lines_survives() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 12\r\n\r\nline1\r\n\r\nend";
        let request = parse(raw).unwrap();

        assert_eq!(request.body_text().as_deref(), Some("line1\r\n\r\nend"));
    }

    #[test]
    fn test_body_is_cut_at_content_length() {
        let raw = b"PUT /item HTTP/1.1\r\ncontent-length: 3\r\n\r\nabcdef";
        let request = parse(raw).unwrap();

        assert_eq!(request.body(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_post_without_content_length_takes_rest() {
        let raw = b"POST /echo HTTP/1.1\r\n\r\nhello";
        let request = parse(raw).unwrap();

        assert_eq!(request.body(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_get_without_content_length_has_no_body() {
        let raw = b"GET / HTTP/1.1\r\n\r\nignored";
        let request = parse(raw).unwrap();

        assert!(request.body().is_none());
    }

    #[test]
    fn test_zero_content_length_has_no_body() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
        assert!(parse(raw).unwrap().body().is_none());
    }

    #[test]
    fn test_incomplete_body() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
        assert_eq!(
            parse(raw).unwrap_err(),
            ParseError::IncompleteBody {
                expected: 10,
                received: 5
            }
        );
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: -1\r\n\r\n";
        assert!(matches!(
            parse(raw),
            Err(ParseError::InvalidContentLength(_))
        ));
    }

    #[test]
    fn test_conflicting_content_length_is_rejected() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 3\r\ncontent-length: 5\r\n\r\nhello";
        let head = &raw[..split_head(raw).unwrap().head_end];

        // El orden del HashMap no debe cambiar el resultado
        for _ in 0..50 {
            assert!(matches!(
                parse(raw),
                Err(ParseError::InvalidContentLength(_))
            ));
            assert!(matches!(
                declared_content_length(head),
                Err(ParseError::InvalidContentLength(_))
            ));
        }
    }

    #[test]
    fn test_repeated_content_length_with_same_value() {
        let raw = b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\ncontent-length:  5\r\n\r\nhello";
        let request = parse(raw).unwrap();

        assert_eq!(request.body(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_split_head_offsets() {
        let raw = b"GET / HTTP/1.1\r\nA: b\r\n\r\nbody";
        let split = split_head(raw).unwrap();

        assert_eq!(&raw[..split.head_end], b"GET / HTTP/1.1\r\nA: b\r\n");
        assert_eq!(&raw[split.body_start..], b"body");
    }

    #[test]
    fn test_split_head_incomplete() {
        assert_eq!(split_head(b"GET / HTTP/1.1\r\nA: b\r\n"), None);
        assert_eq!(split_head(b"GET / HT"), None);
    }

    #[test]
    fn test_declared_content_length() {
        assert_eq!(
            declared_content_length(b"POST / HTTP/1.1\r\nContent-Length: 42\r\n"),
            Ok(Some(42))
        );
        assert_eq!(declared_content_length(b"GET / HTTP/1.1\r\n"), Ok(None));
    }

    #[test]
    fn test_error_status() {
        assert_eq!(ParseError::Empty.status(), StatusCode::BadRequest);
        assert_eq!(
            ParseError::HeadTooLarge(10).status(),
            StatusCode::RequestHeaderFieldsTooLarge
        );
        assert_eq!(ParseError::BodyTooLarge(10).status(), StatusCode::PayloadTooLarge);
    }
}
