use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Classroom Service API",
        version = "1.0.0",
        description = "CRUD backend for teacher lesson-planning projects. \n\n**Authentication:** project endpoints require a JWT Bearer token obtained from signup or login.\n\n**Features:**\n- Email/password authentication\n- Project management with per-user ownership\n- Mock lesson plan and worksheet generation\n- Bulk parent update drafting from tabular input\n- Health monitoring"
    ),
    paths(
        // Auth endpoints
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::logout,

        // Health
        crate::api::health::health_check,

        // Projects
        crate::api::projects::create_project,
        crate::api::projects::list_projects,
        crate::api::projects::get_project,
        crate::api::projects::delete_project,
        crate::api::projects::generate_lesson_plan,
        crate::api::projects::generate_parent_updates,
    ),
    components(
        schemas(
            // Auth
            crate::models::SignupRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::UserInfo,

            // Health
            crate::api::health::HealthResponse,

            // Projects
            crate::models::Project,
            crate::models::LessonPlan,
            crate::models::Worksheet,
            crate::models::ParentUpdate,
            crate::models::CreateProjectRequest,
            crate::models::GenerationParams,
            crate::models::ParentUpdateParams,
            crate::services::project_service::LessonPlanResult,
            crate::services::project_service::ParentUpdatesResult,
            crate::services::project_service::ParentUpdateFailure,
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login and logout. Tokens are stateless HS256 JWTs carrying the account email."),
        (name = "Health", description = "Liveness endpoint reporting database reachability."),
        (name = "Projects", description = "Project CRUD and content generation. Every operation is scoped to the authenticated owner.")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
