use crate::config::ServerConfig;
use crate::core::submission::SubmissionService;
use crate::domain::ports::Storage;
use crate::utils::error::SiteError;
use crate::utils::validation::FieldError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

type SharedService<S> = State<Arc<SubmissionService<S>>>;
type Payload = Result<Json<Value>, JsonRejection>;

#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub body_limit_bytes: usize,
    pub static_dir: Option<PathBuf>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        RouterOptions::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for RouterOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            body_limit_bytes: config.request_body_limit_bytes,
            static_dir: config.static_dir.as_ref().map(PathBuf::from),
        }
    }
}

#[derive(Debug, Serialize)]
struct Submitted<T: Serialize> {
    message: &'static str,
    data: T,
}

#[derive(Debug, Serialize)]
struct ValidationFailed {
    message: &'static str,
    errors: Vec<FieldError>,
}

fn created<T: Serialize>(message: &'static str, data: T) -> Response {
    (StatusCode::CREATED, Json(Submitted { message, data })).into_response()
}

fn validation_failed(errors: Vec<FieldError>) -> Response {
    let body = ValidationFailed {
        message: "Validation failed",
        errors,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Client mistakes become 400 with field errors; anything else is logged and
/// hidden behind `public_message`.
fn failure(err: SiteError, public_message: &'static str) -> Response {
    match err {
        SiteError::ValidationError { errors } => {
            tracing::debug!(errors = errors.len(), "Rejected submission");
            validation_failed(errors)
        }
        other => {
            tracing::error!(
                category = ?other.category(),
                severity = ?other.severity(),
                "{}: {}",
                public_message,
                other
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": public_message })),
            )
                .into_response()
        }
    }
}

fn rejected_payload(rejection: JsonRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({ "message": "Request body too large" })),
        )
            .into_response();
    }
    validation_failed(vec![FieldError::new("", rejection.body_text())])
}

async fn submit_contact<S: Storage + 'static>(
    State(service): SharedService<S>,
    payload: Payload,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejected_payload(rejection),
    };
    match service.submit_contact(&payload).await {
        Ok(message) => created("Contact message submitted successfully", message),
        Err(e) => failure(e, "An error occurred while submitting your message"),
    }
}

async fn list_contact<S: Storage + 'static>(State(service): SharedService<S>) -> Response {
    match service.contact_messages().await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => failure(e, "An error occurred while fetching contact messages."),
    }
}

async fn submit_freelance<S: Storage + 'static>(
    State(service): SharedService<S>,
    payload: Payload,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejected_payload(rejection),
    };
    match service.submit_freelance(&payload).await {
        Ok(application) => created("Freelance application submitted successfully", application),
        Err(e) => failure(e, "An error occurred while submitting your application"),
    }
}

async fn list_freelance<S: Storage + 'static>(State(service): SharedService<S>) -> Response {
    match service.freelance_applications().await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(e) => failure(e, "An error occurred while fetching freelance applications."),
    }
}

async fn submit_job_application<S: Storage + 'static>(
    State(service): SharedService<S>,
    payload: Payload,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejected_payload(rejection),
    };
    match service.submit_job_application(&payload).await {
        Ok(summary) => created("Job application submitted successfully", summary),
        Err(e) => failure(e, "An error occurred while submitting your application"),
    }
}

async fn list_job_applications<S: Storage + 'static>(
    State(service): SharedService<S>,
) -> Response {
    match service.job_applications().await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(e) => failure(e, "An error occurred while fetching job applications."),
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_router<S: Storage + 'static>(
    service: Arc<SubmissionService<S>>,
    options: RouterOptions,
) -> Router {
    let api = Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/contact",
            post(submit_contact::<S>).get(list_contact::<S>),
        )
        .route(
            "/api/freelance",
            post(submit_freelance::<S>).get(list_freelance::<S>),
        )
        .route("/api/jobs/apply", post(submit_job_application::<S>))
        .route("/api/jobs/applications", get(list_job_applications::<S>))
        .layer(DefaultBodyLimit::max(options.body_limit_bytes))
        .with_state(service);

    let router = match options.static_dir {
        Some(dir) => {
            // 前端路由交給 index.html
            let index = dir.join("index.html");
            tracing::info!("Serving static files from {}", dir.display());
            api.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => api,
    };

    router.layer(TraceLayer::new_for_http())
}
