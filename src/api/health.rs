use actix_web::{HttpResponse, http::header};
use serde_json::json;

/// Liveness check. Never touches the datastore.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Process is accepting requests", body = Object, example = json!({
            "status": "healthy",
            "app": "LeaveTrack-Pro"
        }))
    ),
    tag = "Health"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(json!({
            "status": "healthy",
            "app": "LeaveTrack-Pro"
        }))
}
