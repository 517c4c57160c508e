//! PromptDeck HTTP Server
//!
//! Actix-web 기반 REST API: 템플릿 CRUD, 렌더링, 인스트럭션 합성, 프롬프트 개선

pub mod error;
pub mod routes;
pub mod settings;
pub mod state;
pub mod store;
pub mod types;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use promptdeck_common::{AppConfig, PromptDeckError, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::error::ApiError;
use crate::state::AppState;

pub use settings::{Settings, SettingsRepository};
pub use store::TemplateStore;
pub use types::Template;

/// JSON body errors rendered like every other API error
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::new("Invalid request body", PromptDeckError::invalid_input(err.to_string())).into()
    })
}

/// Query string errors rendered like every other API error
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::new("Invalid query", PromptDeckError::invalid_input(err.to_string())).into()
    })
}

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let static_dir = config.static_dir.clone();
    let state = Arc::new(AppState::new(config)?);

    info!("Starting server on http://{}", bind_addr);
    if let Some(dir) = &static_dir {
        info!("Serving client files from {}", dir.display());
    }

    HttpServer::new(move || {
        let app = App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .configure(routes::configure);

        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind(&bind_addr)
    .map_err(|e| PromptDeckError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorResponse, RenderResponse};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use async_trait::async_trait;
    use promptdeck_compose::{Methodology, CLOSING_DIRECTIVE};
    use promptdeck_llm::{GenerateRequest, LlmClient, ModelGateway, ModelInfo, Provider};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Returns a canned reply and remembers what it was sent
    struct CannedClient {
        provider: Provider,
        reply: String,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl LlmClient for CannedClient {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.prompt.clone()));
            Ok(self.reply.clone())
        }

        async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>> {
            Ok(vec![ModelInfo::chat(self.provider, "canned-1", "Canned")])
        }
    }

    fn setup(reply: &str) -> (TempDir, Arc<AppState>, Arc<CannedClient>) {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            db_base_path: dir.path().to_path_buf(),
            log_dir: dir.path().join("log"),
            ..AppConfig::default()
        };
        let client = Arc::new(CannedClient {
            provider: Provider::Google,
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let gateway = ModelGateway::new(vec![client.clone()]);
        let state = Arc::new(AppState::with_gateway(config, gateway).unwrap());
        (dir, state, client)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(json_config())
                    .app_data(query_config())
                    .configure(routes::configure),
            )
            .await
        };
    }

    fn template_body(name: &str, domain: &str) -> Value {
        json!({
            "name": name,
            "content": "Write about {{topic}} for {{audience}}",
            "isCore": false,
            "domain": domain,
            "providerType": "Anthropic",
            "modelType": "Claude-Sonnet-3.5",
            "roleType": "Developer",
            "methodologies": ["TDD", "DRY", "TDD"]
        })
    }

    #[actix_web::test]
    async fn test_health() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_template_crud_flow() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/templates")
            .set_json(template_body("Blog post", "Marketing"))
            .to_request();
        let created: Template = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.order, 0);
        assert_eq!(created.attributes.methodologies, vec![Methodology::Tdd, Methodology::Dry]);

        let req = test::TestRequest::put()
            .uri(&format!("/api/templates/{}", created.id))
            .set_json(template_body("Renamed", "Code"))
            .to_request();
        let updated: Template = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.name, "Renamed");

        let req = test::TestRequest::post()
            .uri(&format!("/api/templates/{}/duplicate", created.id))
            .to_request();
        let copy: Template = test::call_and_read_body_json(&app, req).await;
        assert_eq!(copy.name, "Renamed (Copy)");

        let req = test::TestRequest::get().uri("/api/templates?domain=Code").to_request();
        let listed: Vec<Template> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 2);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/templates/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/templates/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(err.message, "Failed to delete template");
    }

    #[actix_web::test]
    async fn test_invalid_input_is_bad_request() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/templates?domain=Law").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let mut body = template_body("x", "Code");
        body["modelType"] = json!("GPT-5");
        let req = test::TestRequest::post().uri("/api/templates").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(err.message, "Invalid request body");
    }

    #[actix_web::test]
    async fn test_render_and_instructions() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/templates")
            .set_json(template_body("Post", "Marketing"))
            .to_request();
        let created: Template = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/templates/{}/render", created.id))
            .set_json(json!({"fields": [{"name": "topic", "value": "Rust"}]}))
            .to_request();
        let rendered: RenderResponse = serde_json::from_slice(&test::call_and_read_body(&app, req).await).unwrap();
        assert_eq!(rendered.prompt, "Write about Rust for {{audience}}");
        assert_eq!(rendered.placeholders, vec!["topic", "audience"]);
        assert_eq!(rendered.unresolved, vec!["audience"]);

        let req = test::TestRequest::post()
            .uri(&format!("/api/templates/{}/instructions", created.id))
            .set_json(json!({"customInstruction": "Keep it short."}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let instruction = body["instruction"].as_str().unwrap();
        assert!(instruction.ends_with(&format!("Keep it short.\n\n{}", CLOSING_DIRECTIVE)));
    }

    #[actix_web::test]
    async fn test_enhance_requires_api_key() {
        let (_dir, state, client) = setup("better");
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/enhance")
            .set_json(json!({"prompt": "make it better"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let err: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(err.message, "API key is required");
        assert!(client.seen.lock().unwrap().is_empty());

        let req = test::TestRequest::post()
            .uri("/api/enhance")
            .insert_header(("X-API-Key", "header-key"))
            .set_json(json!({"prompt": "make it better", "provider": "google"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["enhancedPrompt"], "better");
        assert_eq!(client.seen.lock().unwrap()[0].0, "header-key");
    }

    #[actix_web::test]
    async fn test_enhance_template_uses_stored_key_and_restores_placeholders() {
        let (_dir, state, client) = setup("Write an engaging post about Rust for <Audience>.");
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri("/api/settings")
            .set_json(json!({"apiKeys": {"google": "stored-key-123456"}}))
            .to_request();
        let view: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view["apiKeys"]["google"], "*************3456");

        let req = test::TestRequest::post()
            .uri("/api/templates")
            .set_json(template_body("Post", "Marketing"))
            .to_request();
        let created: Template = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/templates/{}/enhance", created.id))
            .set_json(json!({"fields": [{"name": "topic", "value": "Rust"}]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["generatedPrompt"], "Write about Rust for {{audience}}");
        assert_eq!(body["enhancedPrompt"], "Write an engaging post about Rust for {{audience}}.");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].0, "stored-key-123456");
        assert!(seen[0].1.starts_with(
            "Please enhance the following prompt while maintaining its core intent and purpose: Original Prompt: Write about Rust for {{audience}} Enhancement Instructions: "
        ));
    }

    #[actix_web::test]
    async fn test_unknown_provider_is_rejected() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/enhance")
            .insert_header(("X-API-Key", "k"))
            .set_json(json!({"prompt": "p", "provider": "mistral"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_instruction_settings_round_trip() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri("/api/settings/instructions")
            .set_json(json!({"roles": {"Architect": "Design."}}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/api/settings/instructions")
            .set_json(json!({"roles": {"Architect": "Design.", "Developer": "Build.", "Tester": "Test."}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["roles"]["Developer"], "Build.");

        let req = test::TestRequest::delete().uri("/api/settings/instructions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_ne!(body["roles"]["Developer"], "Build.");
    }

    #[actix_web::test]
    async fn test_models_only_for_providers_with_keys() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/models").to_request();
        let models: Vec<ModelInfo> = test::call_and_read_body_json(&app, req).await;
        assert!(models.is_empty());

        state
            .settings
            .write()
            .await
            .update(crate::settings::SettingsUpdate {
                api_keys: Some([(Provider::Google, "k".to_string())].into_iter().collect()),
                ..Default::default()
            })
            .unwrap();

        let req = test::TestRequest::get().uri("/api/models").to_request();
        let models: Vec<ModelInfo> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "canned-1");
    }

    #[actix_web::test]
    async fn test_placeholders_endpoint() {
        let (_dir, state, _) = setup("");
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/placeholders")
            .set_json(json!({"content": "{{a}} {{b}} {{a}}"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["placeholders"], json!(["a", "b"]));
    }
}
