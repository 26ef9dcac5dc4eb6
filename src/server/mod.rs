//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee y parsea requests HTTP, con un límite de tamaño
//! 4. Genera y envía responses HTTP con un `X-Request-Id`

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{api_router, Server};
