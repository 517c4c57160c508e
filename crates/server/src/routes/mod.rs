use actix_web::web;

pub mod enhance;
pub mod models;
pub mod render;
pub mod settings;
pub mod system;
pub mod templates;

/// Register every `/api` route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(system::health)
            .service(templates::list_templates)
            .service(templates::create_template)
            .service(templates::reorder_templates)
            .service(templates::update_template)
            .service(templates::delete_template)
            .service(templates::duplicate_template)
            .service(render::render_template)
            .service(render::template_instructions)
            .service(render::placeholders)
            .service(enhance::enhance)
            .service(enhance::enhance_template)
            .service(settings::get_settings)
            .service(settings::update_settings)
            .service(settings::get_instructions)
            .service(settings::update_instructions)
            .service(settings::reset_instructions)
            .service(models::get_models),
    );
}
