mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let mongodb_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");

    log::info!("🚀 Starting Classroom Service...");

    // Initialize MongoDB connection; the handle is cloned into each worker
    let db = database::MongoDB::new(&mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db);

    log::info!("✅ MongoDB connected successfully");
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/api/v1")
                    // Health check
                    .route("/healthz", web::get().to(api::health::health_check))
                    // Auth endpoints
                    .route("/signup", web::post().to(api::auth::signup))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/logout", web::post().to(api::auth::logout))
                    // Projects: CRUD + content generation - Requires JWT
                    .service(
                        web::scope("/projects")
                            .wrap(middleware::AuthMiddleware)
                            .route("", web::post().to(api::projects::create_project))
                            .route("", web::get().to(api::projects::list_projects))
                            .route("/{project_id}", web::get().to(api::projects::get_project))
                            .route(
                                "/{project_id}",
                                web::delete().to(api::projects::delete_project),
                            )
                            .route(
                                "/{project_id}/generate-lesson-plan",
                                web::post().to(api::projects::generate_lesson_plan),
                            )
                            .route(
                                "/{project_id}/generate-parent-updates",
                                web::post().to(api::projects::generate_parent_updates),
                            ),
                    ),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
