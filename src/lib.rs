pub mod audit;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod workflow;

use actix_web::web;

/// Route table, shared by the server binary and the handler tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook/intake")
            .route("/named-columns", web::post().to(handlers::intake_handlers::named_columns))
            .route("/indexed-rows", web::post().to(handlers::intake_handlers::indexed_rows))
            .route("/batch", web::post().to(handlers::intake_handlers::batch)),
    )
    .service(
        web::scope("/api")
            .route("/dashboard", web::get().to(handlers::dashboard::index))
            .route("/settings", web::get().to(handlers::settings_handlers::list))
            .route("/settings/{name}", web::put().to(handlers::settings_handlers::save))
            .route("/categories", web::get().to(handlers::proposal_handlers::categories))
            .route("/profiles", web::post().to(handlers::profile_handlers::create))
            .route("/profiles", web::get().to(handlers::profile_handlers::list))
            .route("/profiles/{id}", web::get().to(handlers::profile_handlers::detail))
            .route("/profiles/{id}", web::put().to(handlers::profile_handlers::update))
            .route("/profiles/{id}", web::delete().to(handlers::profile_handlers::delete))
            .route("/profiles/{id}/admin", web::put().to(handlers::profile_handlers::admin_update))
            .route("/profiles/{id}/submit", web::post().to(handlers::profile_handlers::submit))
            .route("/profiles/{id}/approve", web::post().to(handlers::profile_handlers::approve))
            .route("/profiles/{id}/reject", web::post().to(handlers::profile_handlers::reject))
            .route("/proposals", web::post().to(handlers::proposal_handlers::create))
            .route("/proposals", web::get().to(handlers::proposal_handlers::list))
            .route("/proposals/{id}", web::get().to(handlers::proposal_handlers::detail))
            .route("/proposals/{id}", web::put().to(handlers::proposal_handlers::update))
            .route("/proposals/{id}/submit", web::post().to(handlers::proposal_handlers::submit))
            .route("/proposals/{id}/approve", web::post().to(handlers::proposal_handlers::approve))
            .route("/proposals/{id}/reject", web::post().to(handlers::proposal_handlers::reject))
            .route(
                "/proposals/{id}/attachments",
                web::post().to(handlers::proposal_handlers::add_attachment),
            ),
    );
}
