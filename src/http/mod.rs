//! # Módulo HTTP
//!
//! Implementa el protocolo HTTP desde cero, sin librerías de alto nivel:
//!
//! - Parsing de requests (request line, headers, body con `Content-Length`)
//! - Construcción de responses con bodies JSON
//! - Manejo de status codes
//! - Política CORS de un solo origen
//!
//! El servidor responde siempre con `Connection: close`: un request por
//! conexión, como en HTTP/1.0.

pub mod cors;      // Política CORS
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use cors::CorsPolicy;
pub use request::{header_end, Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
