//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Hace bind en un puerto (o el siguiente libre)
//! 2. Acepta conexiones entrantes
//! 3. Las reparte a un pool acotado de workers
//! 4. Cada worker lee, parsea, despacha, responde y cierra

pub mod connection;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::ConnectionSettings;
pub use pool::WorkerPool;
pub use tcp::Server;
