pub mod counts;

use std::any::Any;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use common::types::Health;
use service::CountService;

use crate::errors::ApiError;

/// Shared handler state. Cloned per request; the service holds the injected repository.
#[derive(Clone)]
pub struct AppState {
    pub counts: CountService,
}

impl AppState {
    pub fn new(counts: CountService) -> Self { Self { counts } }
}

pub async fn health() -> Json<Health> {
    Json(Health::running())
}

pub async fn not_found() -> ApiError {
    ApiError::endpoint_not_found()
}

async fn log_request(req: Request, next: Next) -> Response {
    info!(
        timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method = %req.method(),
        path = %req.uri(),
        "request"
    );
    next.run(req).await
}

// a known path with the wrong verb is reported like an unknown path
async fn method_not_allowed_as_not_found(res: Response) -> Response {
    if res.status() == StatusCode::METHOD_NOT_ALLOWED {
        ApiError::endpoint_not_found().into_response()
    } else {
        res
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "Unhandled error");
    ApiError::internal("Internal server error").into_response()
}

/// Build the full application router: health probe, `/api/counts`, fallbacks and cross-cutting layers.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health))
        .nest("/api/counts", counts::router())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::map_response(method_not_allowed_as_not_found))
        .layer(middleware::from_fn(log_request))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}
