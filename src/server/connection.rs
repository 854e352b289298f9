//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Pipeline completo de una conexión:
//!
//! ```text
//! read loop → parser::parse → Router::dispatch → Response::write_to → close
//! ```
//!
//! El read loop acumula bytes hasta ver la línea vacía (con límite de
//! `max_header_bytes`) y después lee exactamente `Content-Length` bytes de
//! body (con límite de `max_body_bytes`). Los errores de parsing se
//! responden con un 4xx por el camino normal; los de I/O solo se loguean.
//!
//! `read_timeout` es un deadline para el request completo, no por lectura:
//! antes de cada `read` el timeout del socket se ajusta a lo que queda.

use crate::config::Config;
use crate::error::ConnectionError;
use crate::http::{parser, ParseError, Response, StatusMode};
use crate::router::{Outcome, Router};
use std::io::{self, ErrorKind, Read};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 4096;

/// Parámetros por conexión, copiados a cada worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Tiempo máximo para recibir el request completo (`None` = sin límite)
    pub read_timeout: Option<Duration>,

    /// Deadline de cada escritura (`None` = sin límite)
    pub write_timeout: Option<Duration>,

    /// Máximo de bytes antes de la línea vacía
    pub max_header_bytes: usize,

    /// Máximo `Content-Length` aceptado
    pub max_body_bytes: usize,

    /// Forma de la status line
    pub status_mode: StatusMode,
}

impl ConnectionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            read_timeout: millis(config.read_timeout_ms),
            write_timeout: millis(config.write_timeout_ms),
            max_header_bytes: config.max_header_bytes,
            max_body_bytes: config.max_body_bytes,
            status_mode: config.status_mode(),
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Origen de los bytes de un request cuyo timeout de lectura se puede
/// ajustar antes de cada `read`
pub(crate) trait RequestSource: Read {
    fn set_read_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl RequestSource for TcpStream {
    fn set_read_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)
    }
}

/// Atiende una conexión completa y la cierra
///
/// Si el cliente cierra sin enviar nada no se escribe respuesta.
pub fn handle(
    mut stream: TcpStream,
    router: &Router,
    settings: &ConnectionSettings,
) -> Result<(), ConnectionError> {
    stream.set_write_timeout(settings.write_timeout)?;

    let outcome = match read_request(&mut stream, settings) {
        Ok(buffer) if buffer.is_empty() => {
            tracing::debug!("Connection closed without data");
            return Ok(());
        }
        Ok(buffer) => {
            tracing::debug!(bytes = buffer.len(), "Request received");
            match parser::parse(&buffer) {
                Ok(request) => router.dispatch(&request),
                Err(e) => rejected(e),
            }
        }
        Err(ConnectionError::Parse(e)) => rejected(e),
        Err(e) => return Err(e),
    };

    let response = Response::from_outcome(outcome);
    response.write_to(&mut stream, settings.status_mode)?;

    // El cliente puede haber cerrado ya; no es un error
    let _ = stream.shutdown(Shutdown::Both);
    Ok(())
}

/// Responde a un cliente sin pasar por el pool (cola llena)
pub fn reject_overloaded(
    mut stream: TcpStream,
    settings: &ConnectionSettings,
) -> Result<(), ConnectionError> {
    stream.set_write_timeout(settings.write_timeout)?;
    Response::from_outcome(Outcome::Overloaded).write_to(&mut stream, settings.status_mode)?;
    let _ = stream.shutdown(Shutdown::Both);
    Ok(())
}

fn rejected(e: ParseError) -> Outcome {
    tracing::warn!(error = %e, "Bad request");
    Outcome::BadRequest(e)
}

/// Lee un request completo: cabecera y, si lo declara, el body.
///
/// Retorna un buffer vacío si el peer cerró sin enviar nada. Sin
/// `Content-Length` no se espera más body que lo que ya haya llegado junto
/// con la cabecera.
pub(crate) fn read_request<R: RequestSource>(
    reader: &mut R,
    settings: &ConnectionSettings,
) -> Result<Vec<u8>, ConnectionError> {
    let deadline = settings.read_timeout.map(|timeout| Instant::now() + timeout);
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    // 1. Cabecera
    let split = loop {
        if let Some(split) = parser::split_head(&buffer) {
            break Some(split);
        }
        if buffer.len() > settings.max_header_bytes {
            return Err(ParseError::HeadTooLarge(settings.max_header_bytes).into());
        }

        let n = read_some(reader, &mut chunk, deadline)?;
        if n == 0 {
            break None;
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    // EOF antes de la línea vacía: se parsea lo que haya
    let Some(split) = split else {
        return Ok(buffer);
    };

    if split.head_end > settings.max_header_bytes {
        return Err(ParseError::HeadTooLarge(settings.max_header_bytes).into());
    }

    // 2. Body
    let Some(length) = parser::declared_content_length(&buffer[..split.head_end])? else {
        return Ok(buffer);
    };

    if length > settings.max_body_bytes {
        return Err(ParseError::BodyTooLarge(length).into());
    }

    let expected = split.body_start + length;
    while buffer.len() < expected {
        let n = read_some(reader, &mut chunk, deadline)?;
        if n == 0 {
            // El parser reporta el body incompleto
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    buffer.truncate(expected);
    Ok(buffer)
}

/// Una lectura que no puede terminar después de `deadline`
fn read_some<R: RequestSource>(
    reader: &mut R,
    chunk: &mut [u8],
    deadline: Option<Instant>,
) -> io::Result<usize> {
    if let Some(deadline) = deadline {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(ErrorKind::TimedOut, "read deadline exceeded"));
        }
        reader.set_read_deadline(Some(remaining))?;
    }

    loop {
        match reader.read(chunk) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
