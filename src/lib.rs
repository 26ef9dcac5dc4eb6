//! # Perf Analyzer
//! src/lib.rs
//!
//! Servicio HTTP que simula análisis de rendimiento de modelos de IA.
//! Los jobs se crean en estado `running` y un pool de workers los completa
//! en segundo plano con métricas estimadas según el tier del modelo.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing y construcción de mensajes HTTP, política CORS
//! - `server`: Servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento de peticiones a handlers
//! - `jobs`: Store, estimador, runner en segundo plano y handlers
//! - `config`: Configuración por CLI y variables de entorno
//! - `error`: Errores del núcleo y de la configuración
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use perf_analyzer::config::Config;
//! use perf_analyzer::server::Server;
//!
//! let server = Server::bind(Config::default()).expect("bind");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod router;
pub mod server;
