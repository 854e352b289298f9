//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Tabla de rutas `(método, path) → handler`.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::dispatch → Handler → Outcome
//! ```
//!
//! La tabla se arma completa antes de arrancar el servidor. `Server::bind`
//! la toma por valor y la comparte detrás de un `Arc`, así que después de
//! eso ya no se puede modificar y los workers la leen sin locks.
//!
//! El match es exacto: sin wildcards ni patrones.

pub mod dispatch;
pub mod handler;

pub use dispatch::Outcome;
pub use handler::{HandlerError, IntoReply, Reply};

use crate::http::{Method, Request};
use handler::BoxedHandler;
use std::collections::HashMap;

/// Router que mapea path → método → handler
pub struct Router {
    routes: HashMap<String, HashMap<Method, BoxedHandler>>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registra un handler para `(method, path)`
    ///
    /// Registrar de nuevo el mismo par reemplaza el handler anterior. El
    /// path no se valida: cualquier texto es aceptado.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::router::Router;
    /// use minihttp::http::Request;
    ///
    /// let mut router = Router::new();
    /// router.register("GET", "/", |_req: &Request| "Hello World");
    /// router.register("POST", "/sum", |_req: &Request| 1 + 2);
    /// assert_eq!(router.len(), 2);
    /// ```
    pub fn register<M, F, R>(&mut self, method: M, path: &str, handler: F)
    where
        M: Into<Method>,
        F: Fn(&Request) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.routes
            .entry(path.to_string())
            .or_default()
            .insert(method.into(), handler::boxed(handler));
    }

    /// Atajo para `register(Method::GET, ...)`
    pub fn get<F, R>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.register(Method::GET, path, handler);
    }

    /// Atajo para `register(Method::POST, ...)`
    pub fn post<F, R>(&mut self, path: &str, handler: F)
    where
        F: Fn(&Request) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.register(Method::POST, path, handler);
    }

    /// Verifica si hay un handler para el par exacto
    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes
            .get(path)
            .is_some_and(|methods| methods.contains_key(method))
    }

    /// Número de pares `(método, path)` registrados
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn lookup(&self, path: &str) -> Option<&HashMap<Method, BoxedHandler>> {
        self.routes.get(path)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<String> = self
            .routes
            .iter()
            .flat_map(|(path, methods)| methods.keys().map(move |m| format!("{} {}", m, path)))
            .collect();
        routes.sort();
        f.debug_struct("Router").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_handler(_req: &Request) -> &'static str {
        "hello"
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[test]
    fn test_register_route() {
        let mut router = Router::new();
        router.register("GET", "/hello", hello_handler);

        assert_eq!(router.len(), 1);
        assert!(router.contains(&Method::GET, "/hello"));
        assert!(!router.contains(&Method::POST, "/hello"));
    }

    #[test]
    fn test_same_pair_is_replaced() {
        let mut router = Router::new();
        router.get("/", hello_handler);
        router.get("/", |_req: &Request| "again");

        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_methods_on_same_path_coexist() {
        let mut router = Router::new();
        router.get("/item", hello_handler);
        router.post("/item", hello_handler);

        assert_eq!(router.len(), 2);
        assert!(router.contains(&Method::GET, "/item"));
        assert!(router.contains(&Method::POST, "/item"));
    }

    #[test]
    fn test_any_path_is_accepted() {
        let mut router = Router::new();
        router.get("", hello_handler);
        router.get("no slash", hello_handler);

        assert!(router.contains(&Method::GET, ""));
        assert!(router.contains(&Method::GET, "no slash"));
    }

    #[test]
    fn test_debug_lists_routes() {
        let mut router = Router::new();
        router.post("/echo", hello_handler);
        router.get("/", hello_handler);

        assert_eq!(
            format!("{:?}", router),
            r#"Router { routes: ["GET /", "POST /echo"] }"#
        );
    }
}
