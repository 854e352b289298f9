//! # Handlers y sus respuestas
//! src/router/handler.rs
//!
//! Un handler recibe un `&Request` y retorna cualquier valor que implemente
//! [`IntoReply`]. El valor termina convertido a texto: el body de la
//! respuesta siempre es texto plano.

use crate::http::Request;
use serde::Serialize;
use std::sync::Arc;

/// Error que puede retornar un handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Forma interna en la que se guarda un handler en la tabla
pub(crate) type BoxedHandler = Arc<dyn Fn(&Request) -> Result<Reply, HandlerError> + Send + Sync>;

/// Valor producido por un handler
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Texto que se envía tal cual
    Text(String),

    /// Valor estructurado, se envía como JSON compacto
    Json(serde_json::Value),
}

impl Reply {
    /// Serializa cualquier valor `Serialize` como respuesta JSON
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        Ok(Reply::Json(serde_json::to_value(value)?))
    }

    /// Texto final del body
    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) => text,
            Reply::Json(value) => value.to_string(),
        }
    }
}

/// Conversión del valor de retorno de un handler a [`Reply`]
///
/// Retornar `Err` (o un `Result` cuyo error sea un [`HandlerError`]) marca
/// el handler como fallido y el cliente recibe un 500.
pub trait IntoReply {
    fn into_reply(self) -> Result<Reply, HandlerError>;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Result<Reply, HandlerError> {
        Ok(self)
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Result<Reply, HandlerError> {
        Ok(Reply::Text(self))
    }
}

impl IntoReply for &str {
    fn into_reply(self) -> Result<Reply, HandlerError> {
        Ok(Reply::Text(self.to_string()))
    }
}

impl IntoReply for serde_json::Value {
    fn into_reply(self) -> Result<Reply, HandlerError> {
        Ok(Reply::Json(self))
    }
}

impl<T, E> IntoReply for Result<T, E>
where
    T: IntoReply,
    E: Into<HandlerError>,
{
    fn into_reply(self) -> Result<Reply, HandlerError> {
        self.map_err(Into::into)?.into_reply()
    }
}

// Escalares: se convierten con su Display
macro_rules! display_reply {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoReply for $ty {
                fn into_reply(self) -> Result<Reply, HandlerError> {
                    Ok(Reply::Text(self.to_string()))
                }
            }
        )*
    };
}

display_reply!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

/// Envuelve un closure del usuario en la forma que guarda la tabla
pub(crate) fn boxed<F, R>(handler: F) -> BoxedHandler
where
    F: Fn(&Request) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    Arc::new(move |request: &Request| handler(request).into_reply())
}
