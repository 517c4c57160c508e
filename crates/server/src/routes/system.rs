use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness check
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let templates = state.templates.read().await.len();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        templates,
    })
}
