use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{CreateProjectRequest, GenerationParams, ParentUpdateParams, Project};
use crate::services::auth_service::{self, Claims};
use crate::services::project_service::{self, LessonPlanResult, ParentUpdatesResult};
use crate::utils::AppError;

/// Resolves the token identity to the owning user id. Done on every request;
/// there is no session cache.
async fn resolve_owner(db: &MongoDB, claims: &Claims) -> Result<String, AppError> {
    let user = auth_service::get_user_by_email(db, &claims.email).await?;
    Ok(user.id_hex())
}

#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = Project),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateProjectRequest>,
) -> HttpResponse {
    log::info!("📝 POST /projects - name: {} ({})", request.name, user.email);

    let owner_id = match resolve_owner(&db, &user).await {
        Ok(id) => id,
        Err(e) => return e.to_response(),
    };

    match project_service::create_project(&db, &owner_id, &request.name).await {
        Ok(project) => {
            log::info!("✅ Project created: {}", project.id);
            HttpResponse::Ok().json(project)
        }
        Err(e) => {
            log::error!("❌ Failed to create project: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects owned by the caller", body = [Project]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_projects(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("📋 GET /projects ({})", user.email);

    let owner_id = match resolve_owner(&db, &user).await {
        Ok(id) => id,
        Err(e) => return e.to_response(),
    };

    match project_service::list_projects(&db, &owner_id).await {
        Ok(projects) => {
            log::info!("✅ Listed {} projects", projects.len());
            HttpResponse::Ok().json(projects)
        }
        Err(e) => {
            log::error!("❌ Failed to list projects: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project with its artifacts", body = Project),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found or not owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    project_id: web::Path<String>,
) -> HttpResponse {
    log::info!("📖 GET /projects/{} ({})", project_id, user.email);

    let owner_id = match resolve_owner(&db, &user).await {
        Ok(id) => id,
        Err(e) => return e.to_response(),
    };

    match project_service::get_project(&db, &project_id, &owner_id).await {
        Ok(project) => HttpResponse::Ok().json(project),
        Err(e) => {
            log::warn!("❌ GET /projects/{} - {}", project_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found or not owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    project_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🗑️ DELETE /projects/{} ({})", project_id, user.email);

    let owner_id = match resolve_owner(&db, &user).await {
        Ok(id) => id,
        Err(e) => return e.to_response(),
    };

    match project_service::delete_project(&db, &project_id, &owner_id).await {
        Ok(()) => {
            log::info!("✅ Project deleted: {}", project_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            log::warn!("❌ DELETE /projects/{} - {}", project_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/generate-lesson-plan",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    request_body = GenerationParams,
    responses(
        (status = 200, description = "Lesson plan and worksheet generated", body = LessonPlanResult),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found or not owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_lesson_plan(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    project_id: web::Path<String>,
    request: web::Json<GenerationParams>,
) -> HttpResponse {
    log::info!(
        "📚 POST /projects/{}/generate-lesson-plan - {}/{}/{}",
        project_id,
        request.subject,
        request.level,
        request.topic
    );

    let owner_id = match resolve_owner(&db, &user).await {
        Ok(id) => id,
        Err(e) => return e.to_response(),
    };

    match project_service::generate_lesson_plan(&db, &project_id, &owner_id, &request).await {
        Ok(result) => {
            log::info!("✅ Generated {}", result.lesson_plan.file_name);
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::warn!("❌ Lesson plan generation failed: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/generate-parent-updates",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    request_body = ParentUpdateParams,
    responses(
        (status = 200, description = "Parent updates generated; failures reported per row", body = ParentUpdatesResult),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found or not owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_parent_updates(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    project_id: web::Path<String>,
    request: web::Json<ParentUpdateParams>,
) -> HttpResponse {
    log::info!("👪 POST /projects/{}/generate-parent-updates", project_id);

    let owner_id = match resolve_owner(&db, &user).await {
        Ok(id) => id,
        Err(e) => return e.to_response(),
    };

    match project_service::generate_parent_updates(&db, &project_id, &owner_id, &request.csv_data)
        .await
    {
        Ok(result) => {
            log::info!(
                "✅ Parent updates: {} generated, {} inserted",
                result.updates.len(),
                result.inserted_ids.len()
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::warn!("❌ Parent update generation failed: {}", e);
            e.to_response()
        }
    }
}
