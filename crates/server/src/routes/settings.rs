use actix_web::{delete, get, put, web, HttpResponse};
use promptdeck_compose::InstructionOverrides;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::settings::SettingsUpdate;
use crate::state::AppState;

#[get("/settings")]
pub async fn get_settings(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let view = state.settings.read().await.settings().masked();
    HttpResponse::Ok().json(view)
}

#[put("/settings")]
pub async fn update_settings(
    req: web::Json<SettingsUpdate>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let mut repo = state.settings.write().await;
    let view = repo
        .update(req.into_inner())
        .map_err(ApiError::context("Failed to update settings"))?
        .masked();

    info!("Settings updated (provider: {})", view.selected_provider);
    Ok(HttpResponse::Ok().json(view))
}

/// Effective instruction tables, every category spelled out
#[get("/settings/instructions")]
pub async fn get_instructions(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let tables = state.settings.read().await.tables().to_overrides();
    HttpResponse::Ok().json(tables)
}

#[put("/settings/instructions")]
pub async fn update_instructions(
    req: web::Json<InstructionOverrides>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let mut repo = state.settings.write().await;
    let tables = repo
        .set_instructions(req.into_inner())
        .map_err(ApiError::context("Failed to update instructions"))?
        .to_overrides();

    info!("Enhancement instructions customized");
    Ok(HttpResponse::Ok().json(tables))
}

#[delete("/settings/instructions")]
pub async fn reset_instructions(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    let mut repo = state.settings.write().await;
    let tables = repo
        .reset_instructions()
        .map_err(ApiError::context("Failed to reset instructions"))?
        .to_overrides();

    info!("Enhancement instructions reset to defaults");
    Ok(HttpResponse::Ok().json(tables))
}
