use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::database::MongoDB;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 500, description = "Database connection failed")
    )
)]
pub async fn health_check(db: web::Data<MongoDB>) -> impl Responder {
    match db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "ok".to_string(),
            database: "connected".to_string(),
        }),
        Err(e) => {
            log::error!("❌ Health check failed: {}", e);
            HttpResponse::InternalServerError().json(HealthResponse {
                status: "error".to_string(),
                database: "disconnected".to_string(),
            })
        }
    }
}
