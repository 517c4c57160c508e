use actix_web::{post, web, HttpResponse};
use promptdeck_compose::{compose_enhancement_instruction, extract_placeholders, unresolved_placeholders};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    InstructionRequest, InstructionResponse, PlaceholdersRequest, PlaceholdersResponse,
    RenderRequest, RenderResponse,
};

/// Fill a template's placeholders with the given field values
#[post("/templates/{id}/render")]
pub async fn render_template(
    id: web::Path<u64>,
    req: web::Json<RenderRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let content = state
        .templates
        .read()
        .await
        .get(id.into_inner())
        .map_err(ApiError::context("Failed to render template"))?
        .content
        .clone();

    let values = req.fields.values();
    Ok(HttpResponse::Ok().json(RenderResponse {
        prompt: req.fields.render(&content),
        placeholders: extract_placeholders(&content),
        unresolved: unresolved_placeholders(&content, &values),
    }))
}

/// Enhancement instruction the template would be sent with
#[post("/templates/{id}/instructions")]
pub async fn template_instructions(
    id: web::Path<u64>,
    req: web::Json<InstructionRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let attributes = state
        .templates
        .read()
        .await
        .get(id.into_inner())
        .map_err(ApiError::context("Failed to compose instructions"))?
        .attributes
        .clone();

    let settings = state.settings.read().await;
    let custom = req
        .custom_instruction
        .as_deref()
        .or(settings.settings().custom_instruction.as_deref());
    let instruction = compose_enhancement_instruction(&attributes, settings.tables(), custom);

    Ok(HttpResponse::Ok().json(InstructionResponse { instruction }))
}

/// Placeholder names of arbitrary content
#[post("/placeholders")]
pub async fn placeholders(req: web::Json<PlaceholdersRequest>) -> HttpResponse {
    HttpResponse::Ok().json(PlaceholdersResponse {
        placeholders: extract_placeholders(&req.content),
    })
}
