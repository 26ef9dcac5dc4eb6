//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando threads.
//! Cada conexión se procesa en su propio thread y atiende un solo request.

use crate::config::Config;
use crate::http::{header_end, CorsPolicy, Method, Request, Response, StatusCode};
use crate::jobs::{handlers, JobService};
use crate::router::Router;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const READ_CHUNK: usize = 8192;
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Resultado de leer un request del socket
enum ReadOutcome {
    /// El peer cerró sin enviar nada
    Closed,
    Complete(Vec<u8>),
    TooLarge,
}

/// Router con las rutas del servicio de análisis
pub fn api_router(cors: CorsPolicy) -> Router {
    let mut router = Router::new(cors);

    router.register(Method::GET, "/", handlers::root_handler);
    router.register(Method::GET, "/health", handlers::health_handler);
    router.register(Method::POST, "/jobs/", handlers::create_job_handler);
    router.register(Method::GET, "/jobs/", handlers::list_jobs_handler);
    router.register(Method::GET, "/jobs/{id}", handlers::get_job_handler);

    router
}

/// Servidor HTTP concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    jobs: Arc<JobService>,
    listener: TcpListener,
}

impl Server {
    /// Hace bind del listener e inicia el servicio de jobs
    pub fn bind(config: Config) -> io::Result<Self> {
        let address = config.address();
        let listener = TcpListener::bind(&address)?;

        let jobs = Arc::new(JobService::with_defaults(&config.runner_config())?);
        let router = Arc::new(api_router(CorsPolicy::new(config.cors_origin.clone())));

        info!(address = %address, "listener bound");

        Ok(Self {
            config,
            router,
            jobs,
            listener,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Servicio de jobs compartido por todas las conexiones
    pub fn jobs(&self) -> Arc<JobService> {
        Arc::clone(&self.jobs)
    }

    /// Acepta conexiones indefinidamente, un thread por conexión
    pub fn run(&self) -> io::Result<()> {
        info!(address = %self.local_addr()?, "server accepting connections");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let jobs = Arc::clone(&self.jobs);
                    let max_request_bytes = self.config.max_request_bytes;

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, &router, &jobs, max_request_bytes) {
                            error!(error = %e, "connection failed");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        mut stream: TcpStream,
        router: &Router,
        jobs: &JobService,
        max_request_bytes: usize,
    ) -> io::Result<()> {
        let start = Instant::now();
        let request_id = Uuid::new_v4().to_string();

        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut response = match Self::read_request(&mut stream, max_request_bytes)? {
            ReadOutcome::Closed => {
                debug!(request_id = %request_id, "peer closed before sending data");
                return Ok(());
            }
            ReadOutcome::TooLarge => {
                warn!(request_id = %request_id, limit = max_request_bytes, "request too large");
                let mut response = Response::detail(StatusCode::PayloadTooLarge, "Request too large");
                Router::add_server_headers(&mut response);
                response
            }
            ReadOutcome::Complete(buffer) => match Request::parse(&buffer) {
                Ok(request) => {
                    debug!(
                        request_id = %request_id,
                        method = request.method().as_str(),
                        path = request.path(),
                        "request received"
                    );
                    router.route(&request, jobs)
                }
                Err(e) => {
                    debug!(request_id = %request_id, error = %e, "parse error");
                    let mut response =
                        Response::detail(StatusCode::BadRequest, &format!("Invalid request: {}", e));
                    Router::add_server_headers(&mut response);
                    response
                }
            },
        };

        response.add_header("X-Request-Id", &request_id);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        debug!(
            request_id = %request_id,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "response sent"
        );

        Ok(())
    }

    /// Lee hasta completar headers y el body declarado en `Content-Length`
    fn read_request(stream: &mut TcpStream, max_request_bytes: usize) -> io::Result<ReadOutcome> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let bytes_read = stream.read(&mut chunk)?;

            if bytes_read == 0 {
                if buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }
                // Request truncado: el parser decide
                return Ok(ReadOutcome::Complete(buffer));
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);
            if buffer.len() > max_request_bytes {
                return Ok(ReadOutcome::TooLarge);
            }

            if let Some(end) = header_end(&buffer) {
                let expected = match declared_length(&buffer[..end]) {
                    Some(length) => end.checked_add(length),
                    None => Some(end),
                };
                let expected = match expected {
                    Some(expected) if expected <= max_request_bytes => expected,
                    _ => return Ok(ReadOutcome::TooLarge),
                };
                if buffer.len() >= expected {
                    return Ok(ReadOutcome::Complete(buffer));
                }
            }
        }
    }
}

/// `Content-Length` declarado en la sección de headers, si es válido
fn declared_length(head: &[u8]) -> Option<usize> {
    let head = std::str::from_utf8(head).ok()?;

    head.split("\r\n").find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod server_tests {
    use super::*;
    use crate::jobs::RunnerConfig;
    use std::net::Shutdown;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    fn jobs() -> Arc<JobService> {
        Arc::new(JobService::with_defaults(&RunnerConfig {
            workers: 1,
            processing_delay: Duration::from_millis(5),
        })
        .unwrap())
    }

    /// Acepta una conexión, la procesa y retorna lo que recibió el cliente
    fn exchange(max_request_bytes: usize, send: impl FnOnce(&mut TcpStream)) -> String {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let router = Arc::new(api_router(CorsPolicy::new("http://localhost:3000")));
        let jobs = jobs();

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            Server::handle_connection(stream, &router, &jobs, max_request_bytes).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        send(&mut client);

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        t.join().unwrap();

        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_handle_connection_root_ok() {
        let text = exchange(65536, |client| {
            client.write_all(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        });

        assert!(text.starts_with("HTTP/1.1 200 OK"));
        assert!(text.contains("X-Request-Id:"));
        assert!(text.contains("Connection: close"));
        assert!(text.contains("AI Performance Analyzer API is running!"));
    }

    #[test]
    fn test_handle_connection_body_in_two_writes() {
        let text = exchange(65536, |client| {
            let body = r#"{"model_name":"split-small"}"#;
            let head = format!(
                "POST /jobs/ HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
                body.len()
            );
            client.write_all(head.as_bytes()).unwrap();
            client.flush().unwrap();
            thread::sleep(Duration::from_millis(50));
            client.write_all(body.as_bytes()).unwrap();
        });

        assert!(text.starts_with("HTTP/1.1 200 OK"), "got: {text}");
        assert!(text.contains("split-small"));
        assert!(text.contains("\"status\":\"running\""));
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let text = exchange(65536, |client| {
            // Bytes no-HTTP para disparar error de parseo
            client.write_all(b"\x00\x01\x02\x03garbage\r\n\r\n").unwrap();
        });

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid request"));
    }

    #[test]
    fn test_handle_connection_too_large() {
        let text = exchange(128, |client| {
            // Basta con declarar un body mayor al límite
            client
                .write_all(b"POST /jobs/ HTTP/1.1\r\nContent-Length: 512\r\n\r\n")
                .unwrap();
        });

        assert!(text.contains("413 Payload Too Large"));
    }

    #[test]
    fn test_handle_connection_overflowing_content_length() {
        let text = exchange(128, |client| {
            client
                .write_all(b"POST /jobs/ HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\n")
                .unwrap();
        });

        assert!(text.contains("413 Payload Too Large"), "got: {text}");
    }

    #[test]
    fn test_handle_connection_truncated_request() {
        let text = exchange(65536, |client| {
            client
                .write_all(b"POST /jobs/ HTTP/1.1\r\nContent-Length: 40\r\n\r\n{}")
                .unwrap();
            client.shutdown(Shutdown::Write).unwrap();
        });

        assert!(text.contains("400 Bad Request"));
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        let text = exchange(65536, |client| {
            client.shutdown(Shutdown::Write).unwrap();
        });

        assert!(text.is_empty());
    }

    #[test]
    fn test_declared_length() {
        assert_eq!(declared_length(b"POST / HTTP/1.1\r\ncontent-length: 12"), Some(12));
        assert_eq!(declared_length(b"GET / HTTP/1.1\r\nHost: x"), None);
        assert_eq!(declared_length(b"POST / HTTP/1.1\r\nContent-Length: abc"), None);
    }

    #[test]
    fn test_server_bind_ephemeral() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Config::default()
        };

        let server = Server::bind(config).unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert!(server.jobs().list_jobs().is_empty());
    }
}
