use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::services::auth_service;

#[utoipa::path(
    post,
    path = "/api/v1/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Signup successful", body = AuthResponse),
        (status = 400, description = "Email already registered")
    )
)]
pub async fn signup(
    db: web::Data<MongoDB>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    log::info!("📝 POST /signup - email: {}", request.email);

    match auth_service::signup(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Signup successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

/// Tokens are stateless; logout only confirms the action so clients can drop
/// their copy.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logout confirmed")
    )
)]
pub async fn logout() -> HttpResponse {
    log::info!("👋 POST /logout");

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Logout successful"
    }))
}
