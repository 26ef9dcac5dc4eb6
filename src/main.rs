//! # Perf Analyzer - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, instala el subscriber de logs y arranca el
//! servidor.

use perf_analyzer::config::Config;
use perf_analyzer::server::Server;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::new();
    let validation = config.validate();

    // RUST_LOG tiene prioridad sobre --log-level. Con una configuración
    // inválida se arranca en `info` para poder reportar el error.
    let level = match validation {
        Ok(()) => config.log_level.to_ascii_lowercase(),
        Err(_) => "info".to_string(),
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = validation {
        error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    config.log_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to bind listener");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
