//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI con fallback a variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./minihttp --port 8080 --workers 8 --queue 64 --read-timeout-ms 5000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 STRICT_STATUS=true ./minihttp
//! ```

use crate::error::ConfigError;
use crate::http::StatusMode;
use clap::Parser;

/// Mínimo razonable para `max_header_bytes`: una request line corta
pub const MIN_HEADER_BYTES: usize = 64;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "minihttp")]
#[command(about = "Servidor HTTP/1.x minimo con tabla de rutas exacta")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Primer puerto a probar; si está ocupado se prueba el siguiente
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    // === Workers ===
    /// Número de threads que atienden conexiones
    #[arg(long, default_value = "8", env = "WORKERS")]
    pub workers: usize,

    /// Conexiones aceptadas que pueden esperar un worker; con la cola
    /// llena se responde 503
    #[arg(long = "queue", default_value = "64", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Timeouts ===
    /// Deadline de lectura por conexión en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Deadline de escritura por conexión en milisegundos (0 = sin límite)
    #[arg(long = "write-timeout-ms", default_value = "5000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Límites ===
    /// Máximo de bytes de request line + headers
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Máximo Content-Length aceptado
    #[arg(long = "max-body-bytes", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    // === Respuestas ===
    /// Escribir el código real en la status line en vez de siempre 200 OK
    #[arg(long = "strict-status", env = "STRICT_STATUS")]
    pub strict_status: bool,

    // === Logging ===
    /// Nivel de log si RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use minihttp::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        self.address_with_port(self.port)
    }

    /// Dirección con otro puerto, para el reintento de bind
    pub fn address_with_port(&self, port: u16) -> String {
        format!("{}:{}", self.host, port)
    }

    pub fn status_mode(&self) -> StatusMode {
        if self.strict_status {
            StatusMode::Strict
        } else {
            StatusMode::Legacy
        }
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::NoQueue);
        }
        if self.max_header_bytes < MIN_HEADER_BYTES {
            return Err(ConfigError::HeaderLimitTooSmall {
                min: MIN_HEADER_BYTES,
                got: self.max_header_bytes,
            });
        }

        Ok(())
    }

    /// Loguea un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            workers = self.workers,
            queue = self.queue_capacity,
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            max_header_bytes = self.max_header_bytes,
            max_body_bytes = self.max_body_bytes,
            status_mode = ?self.status_mode(),
            "Configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            workers: 8,
            queue_capacity: 64,
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
            max_header_bytes: 8192,
            max_body_bytes: 1024 * 1024,
            strict_status: false,
            log_level: "info".to_string(),
        }
    }
}
