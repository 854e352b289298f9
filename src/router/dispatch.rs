//! # Dispatcher
//! src/router/dispatch.rs
//!
//! Resuelve un request contra la tabla y ejecuta el handler. Un handler
//! que retorna `Err` o hace panic no tumba al worker: el resultado se
//! convierte en `Outcome::HandlerFailed`.

use super::Router;
use crate::http::{ParseError, Request};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Resultado de procesar un request, antes de serializarlo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// El handler respondió; contiene el body ya convertido a texto
    Success(String),

    /// No hay ninguna ruta para el path
    NotFound,

    /// El path existe pero no con ese método
    MethodNotAllowed,

    /// El request no se pudo parsear
    BadRequest(ParseError),

    /// El handler falló (error retornado o panic)
    HandlerFailed(String),

    /// La cola de workers estaba llena
    Overloaded,
}

impl Router {
    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{parser, Request};
    /// use minihttp::router::{Outcome, Router};
    ///
    /// let mut router = Router::new();
    /// router.get("/", |_req: &Request| "Hello World");
    ///
    /// let request = parser::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.dispatch(&request), Outcome::Success("Hello World".into()));
    /// ```
    pub fn dispatch(&self, request: &Request) -> Outcome {
        let path = request.path();

        let Some(methods) = self.lookup(path) else {
            tracing::warn!(path, "404 Not Found - {}", path);
            return Outcome::NotFound;
        };

        let Some(handler) = methods.get(request.method()) else {
            tracing::warn!(method = %request.method(), path, "Method not allowed");
            return Outcome::MethodNotAllowed;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler(request))) {
            Ok(Ok(reply)) => {
                tracing::info!(method = %request.method(), path, "200 OK - {}", path);
                Outcome::Success(reply.into_text())
            }
            Ok(Err(e)) => {
                tracing::error!(method = %request.method(), path, error = %e, "Handler failed");
                Outcome::HandlerFailed(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(
                    method = %request.method(),
                    path,
                    panic = %message,
                    "Handler panicked"
                );
                Outcome::HandlerFailed(message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
