use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;

use models::Count;
use service::errors::ServiceError;

use crate::envelope::Envelope;
use crate::errors::ApiError;
use crate::routes::AppState;

type Reply<T> = Result<Json<Envelope<T>>, ApiError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
        .route("/:id/increment", patch(increment))
        .route("/:id/decrement", patch(decrement))
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::invalid_id())
}

/// `value` of a JSON object body, as an integral number within `i32`.
/// `5.0` is accepted; `5.5`, `"5"` and non-object bodies such as `[1]` are not.
fn parse_value(payload: Result<Json<Value>, JsonRejection>) -> Result<i32, ApiError> {
    let Ok(Json(Value::Object(body))) = payload else {
        return Err(ApiError::invalid_value());
    };
    body.get("value").and_then(as_i32).ok_or_else(ApiError::invalid_value)
}

fn as_i32(v: &Value) -> Option<i32> {
    if let Some(i) = v.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = v.as_f64()?;
    let in_range = f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX);
    (f.fract() == 0.0 && in_range).then_some(f as i32)
}

/// Service failures become a generic 500; the detail was already logged by the service.
fn respond<T>(outcome: Result<T, ServiceError>, failure: &str) -> Result<T, ApiError> {
    outcome.map_err(|_| ApiError::internal(failure))
}

fn found(row: Option<Count>, id: i32) -> Reply<Count> {
    row.map(|r| Json(Envelope::ok(r))).ok_or_else(|| ApiError::count_not_found(id))
}

pub async fn list(State(state): State<AppState>) -> Reply<Vec<Count>> {
    let rows = respond(state.counts.get_all_counts().await, "Failed to get counts")?;
    Ok(Json(Envelope::ok(rows)))
}

pub async fn get_one(State(state): State<AppState>, Path(raw): Path<String>) -> Reply<Count> {
    let id = parse_id(&raw)?;
    found(respond(state.counts.get_count_by_id(id).await, "Failed to get count")?, id)
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Count>>), ApiError> {
    let value = parse_value(payload)?;
    let row = respond(state.counts.create_count(value).await, "Failed to create count")?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(row))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Reply<Count> {
    let id = parse_id(&raw)?;
    let value = parse_value(payload)?;
    found(respond(state.counts.update_count(id, value).await, "Failed to update count")?, id)
}

pub async fn remove(State(state): State<AppState>, Path(raw): Path<String>) -> Reply<Count> {
    let id = parse_id(&raw)?;
    found(respond(state.counts.delete_count(id).await, "Failed to delete count")?, id)
}

pub async fn increment(State(state): State<AppState>, Path(raw): Path<String>) -> Reply<Count> {
    let id = parse_id(&raw)?;
    found(respond(state.counts.increment_count(id).await, "Failed to increment count")?, id)
}

pub async fn decrement(State(state): State<AppState>, Path(raw): Path<String>) -> Reply<Count> {
    let id = parse_id(&raw)?;
    found(respond(state.counts.decrement_count(id).await, "Failed to decrement count")?, id)
}
