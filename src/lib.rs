//! # minihttp
//! src/lib.rs
//!
//! Servidor HTTP/1.x mínimo: una conexión, un request, un handler, una
//! respuesta y cierre. Sin keep-alive, sin chunked, sin TLS.
//!
//! ## Arquitectura
//!
//! - `http`: Modelo del request, parser, framing de la respuesta
//! - `router`: Tabla `(método, path) → handler` y dispatcher
//! - `server`: Bind con reintento de puerto, accept loop y pool de workers
//! - `config`: Argumentos CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//! - `error`: Tipos de error de arranque y de conexión
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use minihttp::config::Config;
//! use minihttp::http::Request;
//! use minihttp::router::Router;
//! use minihttp::server::Server;
//!
//! let mut router = Router::new();
//! router.get("/", |_req: &Request| "Hello World");
//!
//! let server = Server::bind(Config::default(), router).expect("Error al iniciar servidor");
//! server.run().expect("Error en el accept loop");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
