use actix_web::{get, web, HttpResponse};
use promptdeck_llm::Provider;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    /// Restrict the catalog to one provider
    pub provider: Option<String>,
}

/// GET /models - Model catalog of the providers that have a stored key
#[get("/models")]
pub async fn get_models(
    query: web::Query<ModelsQuery>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let mut keys: BTreeMap<Provider, String> = state.settings.read().await.settings().api_keys.clone();

    if let Some(provider) = query.provider.as_deref().filter(|p| !p.trim().is_empty()) {
        let provider: Provider = provider
            .parse()
            .map_err(ApiError::context("Failed to list models"))?;
        keys.retain(|p, _| *p == provider);
    }

    let models = state.gateway.list_all_models(&keys).await;
    Ok(HttpResponse::Ok().json(models))
}
