use actix_web::http::StatusCode;
use actix_web::{post, web, HttpRequest, HttpResponse};
use promptdeck_compose::{build_enhancement_prompt, preserve_placeholders};
use promptdeck_llm::{GenerateRequest, Provider};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{EnhanceRequest, EnhanceResponse, EnhanceTemplateRequest, EnhanceTemplateResponse};

const API_KEY_HEADER: &str = "X-API-Key";

/// Provider, key and model an enhancement request goes out with
struct Target {
    provider: Provider,
    api_key: String,
    model: Option<String>,
}

/// Request values win over stored settings; the key comes from the
/// `X-API-Key` header or the stored key of the chosen provider.
async fn resolve_target(
    http: &HttpRequest,
    state: &AppState,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<Target, ApiError> {
    let repo = state.settings.read().await;
    let settings = repo.settings();

    let provider = match provider.filter(|p| !p.trim().is_empty()) {
        Some(p) => p.parse::<Provider>().map_err(ApiError::context("Failed to enhance prompt"))?,
        None => settings.selected_provider,
    };

    let header_key = http
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let api_key = header_key
        .or_else(|| settings.api_key(provider))
        .map(str::to_string)
        .ok_or_else(|| ApiError::status(StatusCode::UNAUTHORIZED, "API key is required"))?;

    let model = model
        .map(str::to_string)
        .or_else(|| settings.selected_model.clone());

    debug!(
        "Enhancement target: {} (model: {})",
        provider,
        model.as_deref().unwrap_or("default")
    );
    Ok(Target {
        provider,
        api_key,
        model,
    })
}

/// Enhance an arbitrary prompt
#[post("/enhance")]
pub async fn enhance(
    http: HttpRequest,
    req: web::Json<EnhanceRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::status(StatusCode::BAD_REQUEST, "Prompt is required"));
    }

    let target = resolve_target(&http, &state, req.provider.as_deref(), req.model.as_deref()).await?;
    info!("Enhance request received. Provider: {}", target.provider);

    let request = GenerateRequest::new(req.prompt.clone()).with_model(target.model);
    let enhanced_prompt = state
        .gateway
        .generate(target.provider, &target.api_key, &request)
        .await
        .map_err(ApiError::context("Failed to enhance prompt"))?;

    Ok(HttpResponse::Ok().json(EnhanceResponse { enhanced_prompt }))
}

/// Render a template, compose its instructions, enhance the result and
/// restore placeholder syntax the model rewrote
#[post("/templates/{id}/enhance")]
pub async fn enhance_template(
    http: HttpRequest,
    id: web::Path<u64>,
    req: web::Json<EnhanceTemplateRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let template = state
        .templates
        .read()
        .await
        .get(id.into_inner())
        .map_err(ApiError::context("Failed to enhance prompt"))?
        .clone();

    let generated_prompt = req.fields.render(&template.content);

    let outbound = {
        let settings = state.settings.read().await;
        let custom = req
            .custom_instruction
            .as_deref()
            .or(settings.settings().custom_instruction.as_deref());
        build_enhancement_prompt(&generated_prompt, &template.attributes, settings.tables(), custom)
    };

    let target = resolve_target(&http, &state, req.provider.as_deref(), req.model.as_deref()).await?;
    info!(
        "Enhancing template {} with {} (prompt length: {})",
        template.id,
        target.provider,
        outbound.len()
    );

    let request = GenerateRequest::new(outbound).with_model(target.model);
    let enhanced = state
        .gateway
        .generate(target.provider, &target.api_key, &request)
        .await
        .map_err(ApiError::context("Failed to enhance prompt"))?;

    Ok(HttpResponse::Ok().json(EnhanceTemplateResponse {
        enhanced_prompt: preserve_placeholders(&enhanced, &generated_prompt),
        generated_prompt,
    }))
}
