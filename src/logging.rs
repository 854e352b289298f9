//! # Logging
//! src/logging.rs
//!
//! El resto del crate solo emite eventos con `tracing`; el subscriber se
//! instala una única vez desde `main`. `RUST_LOG` tiene prioridad sobre el
//! nivel configurado.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filtro a usar: `RUST_LOG` si está definido, si no `level`
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Instala el subscriber global.
///
/// Retorna `false` si ya había uno instalado (por ejemplo, en tests).
pub fn init(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(level))
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .try_init()
        .is_ok()
}
