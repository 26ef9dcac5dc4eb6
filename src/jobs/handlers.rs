//! # Handlers HTTP para Jobs
//! src/jobs/handlers.rs
//!
//! Implementa los endpoints del servicio:
//! - `GET /`
//! - `GET /health`
//! - `POST /jobs/`
//! - `GET /jobs/`
//! - `GET /jobs/{id}`

use crate::error::JobError;
use crate::http::{Request, Response, StatusCode};
use crate::jobs::service::JobService;
use crate::jobs::types::JobCreate;
use crate::router::RouteParams;
use serde_json::json;
use tracing::{debug, error};

/// Handler para `GET /`
pub fn root_handler(_req: &Request, _params: &RouteParams, _jobs: &JobService) -> Response {
    Response::json(
        StatusCode::Ok,
        &json!({ "message": "AI Performance Analyzer API is running!" }),
    )
}

/// Handler para `GET /health`
///
/// ```json
/// {"status": "healthy", "timestamp": 1718000000.123, "total_jobs": 3}
/// ```
pub fn health_handler(_req: &Request, _params: &RouteParams, jobs: &JobService) -> Response {
    Response::json(StatusCode::Ok, &jobs.health())
}

/// Handler para `POST /jobs/`
///
/// Body: `{"model_name": "bert-large", "batch_size": 16}`. `batch_size` es
/// opcional (32 por defecto) y debe ser positivo. Responde de inmediato con
/// el job en estado `running`.
pub fn create_job_handler(req: &Request, _params: &RouteParams, jobs: &JobService) -> Response {
    let payload: JobCreate = match serde_json::from_slice(req.body()) {
        Ok(payload) => payload,
        Err(e) => {
            debug!(error = %e, "rejected job payload");
            return Response::detail(StatusCode::UnprocessableEntity, &e.to_string());
        }
    };

    if payload.batch_size == 0 {
        return Response::detail(
            StatusCode::UnprocessableEntity,
            "batch_size must be a positive integer",
        );
    }

    match jobs.create_job(&payload.model_name, payload.batch_size) {
        Ok(job) => Response::json(StatusCode::Ok, &job),
        Err(e) => {
            error!(error = %e, "failed to create job");
            Response::detail(StatusCode::InternalServerError, &e.to_string())
        }
    }
}

/// Handler para `GET /jobs/`
///
/// Lista todos los jobs en orden de creación.
pub fn list_jobs_handler(_req: &Request, _params: &RouteParams, jobs: &JobService) -> Response {
    Response::json(StatusCode::Ok, &jobs.list_jobs())
}

/// Handler para `GET /jobs/{id}`
pub fn get_job_handler(_req: &Request, params: &RouteParams, jobs: &JobService) -> Response {
    let job_id = params.get("id").unwrap_or_default();

    match jobs.get_job(job_id) {
        Ok(job) => Response::json(StatusCode::Ok, &job),
        Err(JobError::NotFound(_)) => Response::detail(StatusCode::NotFound, "Job not found"),
        Err(e) => Response::detail(StatusCode::InternalServerError, &e.to_string()),
    }
}
