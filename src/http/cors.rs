//! # CORS
//! src/http/cors.rs
//!
//! Política de un único origen permitido. Desde ese origen se aceptan
//! todos los métodos y headers, con credenciales.

use super::{Method, Request, Response, StatusCode};

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Política CORS del servidor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origin: String,
}

impl CorsPolicy {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
        }
    }

    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    fn allows(&self, origin: &str) -> bool {
        origin == self.allowed_origin
    }

    /// Un preflight es un OPTIONS con `Origin` y `Access-Control-Request-Method`
    pub fn is_preflight(request: &Request) -> bool {
        request.method() == Method::OPTIONS
            && request.header("Origin").is_some()
            && request.header("Access-Control-Request-Method").is_some()
    }

    /// Responde un preflight
    pub fn preflight(&self, request: &Request) -> Response {
        let origin = request.header("Origin").unwrap_or_default();

        if !self.allows(origin) {
            return Response::text(StatusCode::BadRequest, "Disallowed CORS origin")
                .with_header("Vary", "Origin");
        }

        let mut response = Response::text(StatusCode::Ok, "OK")
            .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .with_header("Access-Control-Max-Age", PREFLIGHT_MAX_AGE);

        if let Some(requested) = request.header("Access-Control-Request-Headers") {
            response.add_header("Access-Control-Allow-Headers", requested);
        }

        self.add_origin_headers(&mut response);
        response
    }

    /// Agrega los headers CORS a una respuesta normal
    ///
    /// No hace nada si el request no trae `Origin` o el origen no está permitido.
    pub fn apply(&self, request: &Request, response: &mut Response) {
        match request.header("Origin") {
            Some(origin) if self.allows(origin) => self.add_origin_headers(response),
            _ => {}
        }
    }

    fn add_origin_headers(&self, response: &mut Response) {
        response.add_header("Access-Control-Allow-Origin", &self.allowed_origin);
        response.add_header("Access-Control-Allow-Credentials", "true");
        response.add_header("Vary", "Origin");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "http://localhost:3000";

    fn request(raw: &str) -> Request {
        Request::parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_preflight_detection() {
        let preflight = request(
            "OPTIONS /jobs/ HTTP/1.1\r\nOrigin: http://localhost:3000\r\nAccess-Control-Request-Method: POST\r\n\r\n",
        );
        let plain_options = request("OPTIONS /jobs/ HTTP/1.1\r\n\r\n");

        assert!(CorsPolicy::is_preflight(&preflight));
        assert!(!CorsPolicy::is_preflight(&plain_options));
    }

    #[test]
    fn test_preflight_allowed_origin() {
        let policy = CorsPolicy::new(ORIGIN);
        let req = request(
            "OPTIONS /jobs/ HTTP/1.1\r\nOrigin: http://localhost:3000\r\nAccess-Control-Request-Method: POST\r\nAccess-Control-Request-Headers: content-type\r\n\r\n",
        );

        let response = policy.preflight(&req);
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some(ORIGIN));
        assert_eq!(response.header("Access-Control-Allow-Headers"), Some("content-type"));
        assert_eq!(response.header("Access-Control-Allow-Credentials"), Some("true"));
        assert!(response
            .header("Access-Control-Allow-Methods")
            .unwrap()
            .contains("POST"));
    }

    #[test]
    fn test_preflight_disallowed_origin() {
        let policy = CorsPolicy::new(ORIGIN);
        let req = request(
            "OPTIONS /jobs/ HTTP/1.1\r\nOrigin: http://evil.example\r\nAccess-Control-Request-Method: POST\r\n\r\n",
        );

        let response = policy.preflight(&req);
        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(response.header("Access-Control-Allow-Origin").is_none());
    }

    #[test]
    fn test_apply_only_for_allowed_origin() {
        let policy = CorsPolicy::new(ORIGIN);

        let mut allowed = Response::new(StatusCode::Ok);
        policy.apply(&request("GET / HTTP/1.1\r\nOrigin: http://localhost:3000\r\n\r\n"), &mut allowed);
        assert_eq!(allowed.header("Access-Control-Allow-Origin"), Some(ORIGIN));

        let mut other = Response::new(StatusCode::Ok);
        policy.apply(&request("GET / HTTP/1.1\r\nOrigin: http://other:1\r\n\r\n"), &mut other);
        assert!(other.header("Access-Control-Allow-Origin").is_none());

        let mut no_origin = Response::new(StatusCode::Ok);
        policy.apply(&request("GET / HTTP/1.1\r\n\r\n"), &mut no_origin);
        assert!(no_origin.headers().is_empty());
    }
}
