//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.x que habla el servidor:
//!
//! - Modelo inmutable del request
//! - Parsing de request line, headers y body
//! - Construcción y framing de la respuesta
//! - Códigos de estado
//!
//! No hay chunked transfer encoding ni conexiones persistentes: un request
//! por conexión, una respuesta, y el servidor cierra.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK \r\n
//! \r\n
//! Hello World\r\n
//! ```

pub mod parser; // Bytes → Request
pub mod request; // Modelo del request
pub mod response; // Framing de la respuesta
pub mod status; // Códigos de estado HTTP

pub use parser::ParseError;
pub use request::{Method, Request};
pub use response::{Response, StatusMode};
pub use status::StatusCode;
