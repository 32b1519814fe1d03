use actix_web::{middleware, web, App, HttpServer};

use sk_records::{configure_routes, db};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Ensure data directory exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/app.db".to_string());
    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    db::seed_lookups(&pool)
        .await
        .expect("Failed to seed lookups");

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
