//! # Errores del servidor
//! src/error.rs
//!
//! Los errores de parsing viven en `http::parser`; aquí están los de
//! configuración, arranque y manejo de conexiones.

use crate::http::ParseError;

/// Configuración inválida
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("workers must be >= 1")]
    NoWorkers,

    #[error("queue capacity must be >= 1")]
    NoQueue,

    #[error("max header bytes must be >= {min} (got {got})")]
    HeaderLimitTooSmall { min: usize, got: usize },
}

/// Errores de arranque del servidor
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error de bind distinto a "puerto en uso"
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Se probaron todos los puertos desde el configurado hasta 65535
    #[error("no free port between {first} and 65535")]
    PortsExhausted { first: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errores de una conexión individual. Nunca salen del worker.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl ConnectionError {
    /// `true` si el cliente no envió nada dentro del read timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ConnectionError::Io(e)
                if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut)
        )
    }
}
