use actix_web::{delete, get, post, put, web, HttpResponse};
use promptdeck_compose::TemplateDomain;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{ReorderItem, TemplateInput, TemplateQuery};

#[get("/templates")]
pub async fn list_templates(
    query: web::Query<TemplateQuery>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let domain = query
        .domain
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(str::parse::<TemplateDomain>)
        .transpose()?;

    let templates = state.templates.read().await.list_filtered(domain, query.core_first);
    Ok(HttpResponse::Ok().json(templates))
}

#[post("/templates")]
pub async fn create_template(
    req: web::Json<TemplateInput>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let template = state
        .templates
        .write()
        .await
        .create(req.into_inner())
        .map_err(ApiError::context("Failed to create template"))?;

    info!("Template created: {} ({})", template.id, template.name);
    Ok(HttpResponse::Ok().json(template))
}

#[put("/templates/{id}")]
pub async fn update_template(
    id: web::Path<u64>,
    req: web::Json<TemplateInput>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let template = state
        .templates
        .write()
        .await
        .update(id.into_inner(), req.into_inner())
        .map_err(ApiError::context("Failed to update template"))?;

    Ok(HttpResponse::Ok().json(template))
}

#[delete("/templates/{id}")]
pub async fn delete_template(
    id: web::Path<u64>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    state
        .templates
        .write()
        .await
        .delete(id)
        .map_err(ApiError::context("Failed to delete template"))?;

    info!("Template deleted: {}", id);
    Ok(HttpResponse::NoContent().finish())
}

#[post("/templates/reorder")]
pub async fn reorder_templates(
    req: web::Json<Vec<ReorderItem>>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let templates = state
        .templates
        .write()
        .await
        .reorder(&req)
        .map_err(ApiError::context("Failed to reorder templates"))?;

    Ok(HttpResponse::Ok().json(templates))
}

#[post("/templates/{id}/duplicate")]
pub async fn duplicate_template(
    id: web::Path<u64>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let copy = state
        .templates
        .write()
        .await
        .duplicate(id.into_inner())
        .map_err(ApiError::context("Failed to duplicate template"))?;

    Ok(HttpResponse::Ok().json(copy))
}
