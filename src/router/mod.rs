//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea (método, path) a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//!              │
//!              └─ preflight CORS → CorsPolicy
//! ```
//!
//! Los patrones admiten segmentos `{param}` (ej: `/jobs/{id}`). El slash
//! final no es significativo: `/jobs` y `/jobs/` son la misma ruta.
//!
//! - Path desconocido: 404 `{"detail": "Not Found"}`
//! - Path conocido con otro método: 405 `{"detail": "Method Not Allowed"}`
//! - HEAD se atiende como GET, sin body

use crate::http::{CorsPolicy, Method, Request, Response, StatusCode};
use crate::jobs::JobService;
use std::collections::HashMap;
use tracing::debug;

const SERVER_NAME: &str = concat!("perf-analyzer/", env!("CARGO_PKG_VERSION"));

/// Tipo de función handler
///
/// Un handler recibe el request, los parámetros del path y el servicio de jobs
pub type Handler = fn(&Request, &RouteParams, &JobService) -> Response;

/// Parámetros extraídos de los segmentos `{param}` del path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: HashMap<String, String>,
}

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct Route {
    method: Method,
    segments: Vec<Segment>,
    handler: Handler,
}

impl Route {
    /// Intenta hacer match del path contra el patrón
    fn matches(&self, path: &[&str]) -> Option<RouteParams> {
        if self.segments.len() != path.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.values.insert(name.clone(), (*value).to_string());
                }
            }
        }

        Some(params)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Router que mapea (método, patrón) a handlers
pub struct Router {
    routes: Vec<Route>,
    cors: CorsPolicy,
}

impl Router {
    /// Crea un router vacío con la política CORS dada
    pub fn new(cors: CorsPolicy) -> Self {
        Self {
            routes: Vec::new(),
            cors,
        }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use perf_analyzer::router::{RouteParams, Router};
    /// use perf_analyzer::http::{CorsPolicy, Method, Request, Response, StatusCode};
    /// use perf_analyzer::jobs::JobService;
    ///
    /// fn hello_handler(_req: &Request, _params: &RouteParams, _jobs: &JobService) -> Response {
    ///     Response::detail(StatusCode::Ok, "hello")
    /// }
    ///
    /// let mut router = Router::new(CorsPolicy::new("http://localhost:3000"));
    /// router.register(Method::GET, "/hello", hello_handler);
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        let segments = split_path(pattern)
            .into_iter()
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        self.routes.push(Route {
            method,
            segments,
            handler,
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request, jobs: &JobService) -> Response {
        if CorsPolicy::is_preflight(request) {
            debug!(path = request.path(), "cors preflight");
            let mut response = self.cors.preflight(request);
            Self::add_server_headers(&mut response);
            return response;
        }

        let response = self.dispatch(request, jobs);

        let mut response = if request.method() == Method::HEAD {
            response.without_body()
        } else {
            response
        };

        self.add_common_headers(request, &mut response);
        response
    }

    fn dispatch(&self, request: &Request, jobs: &JobService) -> Response {
        let method = match request.method() {
            Method::HEAD => Method::GET,
            other => other,
        };
        let path = split_path(request.path());

        let mut path_known = false;
        for route in &self.routes {
            if let Some(params) = route.matches(&path) {
                if route.method == method {
                    return (route.handler)(request, &params, jobs);
                }
                path_known = true;
            }
        }

        if path_known {
            debug!(method = request.method().as_str(), path = request.path(), "method not allowed");
            Response::detail(StatusCode::MethodNotAllowed, "Method Not Allowed")
        } else {
            debug!(path = request.path(), "route not found");
            Response::detail(StatusCode::NotFound, "Not Found")
        }
    }

    /// Agrega headers comunes a todas las respuestas
    fn add_common_headers(&self, request: &Request, response: &mut Response) {
        Self::add_server_headers(response);
        self.cors.apply(request, response);
    }

    /// Headers de servidor, también para respuestas que no pasan por una ruta
    pub(crate) fn add_server_headers(response: &mut Response) {
        response.add_header("Server", SERVER_NAME);
        response.add_header("Connection", "close");
    }
}
