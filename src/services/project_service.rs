use crate::database::{MongoDB, LESSON_PLANS, PARENT_UPDATES, PROJECTS, WORKSHEETS};
use crate::models::{
    GenerationParams, LessonPlan, LessonPlanDoc, ParentUpdate, ParentUpdateDoc, Project,
    ProjectDoc, Worksheet, WorksheetDoc,
};
use crate::services::content_generator;
use crate::utils::AppError;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Serialize;

/// Result of a lesson-plan generation: both artifacts, persisted and tagged
/// with the project id.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LessonPlanResult {
    pub lesson_plan: LessonPlan,
    pub worksheet: Worksheet,
}

/// Partial-success result of a bulk parent-update generation. Every generated
/// update is reported; rows that failed to persist are listed instead of
/// being silently dropped.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ParentUpdatesResult {
    pub updates: Vec<String>,
    pub inserted_ids: Vec<String>,
    pub failures: Vec<ParentUpdateFailure>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ParentUpdateFailure {
    pub student_name: String,
    pub error: String,
}

fn parse_project_id(project_id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(project_id)
        .map_err(|_| AppError::InvalidRequest("Invalid project ID".to_string()))
}

/// Fetches a project scoped to its owner. Absence and foreign ownership are
/// deliberately the same NotFound so unauthorized callers learn nothing.
async fn find_owned_project(
    db: &MongoDB,
    project_id: &str,
    owner_id: &str,
) -> Result<ProjectDoc, AppError> {
    let oid = parse_project_id(project_id)?;

    db.collection::<ProjectDoc>(PROJECTS)
        .find_one(doc! { "_id": oid, "userId": owner_id })
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Project not found or you do not have access".to_string())
        })
}

async fn load_children(
    db: &MongoDB,
    project_id: &str,
) -> Result<(Vec<LessonPlan>, Vec<Worksheet>, Vec<ParentUpdate>), AppError> {
    let filter = doc! { "projectId": project_id };

    let lesson_plans: Vec<LessonPlanDoc> = db
        .collection::<LessonPlanDoc>(LESSON_PLANS)
        .find(filter.clone())
        .await?
        .try_collect()
        .await?;

    let worksheets: Vec<WorksheetDoc> = db
        .collection::<WorksheetDoc>(WORKSHEETS)
        .find(filter.clone())
        .await?
        .try_collect()
        .await?;

    let parent_updates: Vec<ParentUpdateDoc> = db
        .collection::<ParentUpdateDoc>(PARENT_UPDATES)
        .find(filter)
        .await?
        .try_collect()
        .await?;

    Ok((
        lesson_plans.into_iter().map(Into::into).collect(),
        worksheets.into_iter().map(Into::into).collect(),
        parent_updates.into_iter().map(Into::into).collect(),
    ))
}

pub async fn create_project(db: &MongoDB, owner_id: &str, name: &str) -> Result<Project, AppError> {
    let collection = db.collection::<ProjectDoc>(PROJECTS);

    let mut project = ProjectDoc {
        id: None,
        name: name.to_string(),
        user_id: owner_id.to_string(),
    };

    let result = collection.insert_one(&project).await?;
    project.id = result.inserted_id.as_object_id();

    Ok(project.into_response(vec![], vec![], vec![]))
}

pub async fn list_projects(db: &MongoDB, owner_id: &str) -> Result<Vec<Project>, AppError> {
    let collection = db.collection::<ProjectDoc>(PROJECTS);

    let mut cursor = collection.find(doc! { "userId": owner_id }).await?;

    let mut projects = Vec::new();
    while let Some(project) = cursor.try_next().await? {
        let project_id = project.id.map(|oid| oid.to_hex()).unwrap_or_default();
        let (lesson_plans, worksheets, parent_updates) = load_children(db, &project_id).await?;
        projects.push(project.into_response(lesson_plans, worksheets, parent_updates));
    }

    Ok(projects)
}

pub async fn get_project(
    db: &MongoDB,
    project_id: &str,
    owner_id: &str,
) -> Result<Project, AppError> {
    let project = find_owned_project(db, project_id, owner_id).await?;
    let (lesson_plans, worksheets, parent_updates) = load_children(db, project_id).await?;

    log::info!(
        "📖 Project {}: {} lesson plans, {} worksheets, {} parent updates",
        project_id,
        lesson_plans.len(),
        worksheets.len(),
        parent_updates.len()
    );

    Ok(project.into_response(lesson_plans, worksheets, parent_updates))
}

/// Deletes only the project document. Child artifacts are left orphaned;
/// they stay queryable by the old project id.
pub async fn delete_project(db: &MongoDB, project_id: &str, owner_id: &str) -> Result<(), AppError> {
    find_owned_project(db, project_id, owner_id).await?;

    let oid = parse_project_id(project_id)?;
    let result = db
        .collection::<ProjectDoc>(PROJECTS)
        .delete_one(doc! { "_id": oid })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    Ok(())
}

pub async fn generate_lesson_plan(
    db: &MongoDB,
    project_id: &str,
    owner_id: &str,
    params: &GenerationParams,
) -> Result<LessonPlanResult, AppError> {
    find_owned_project(db, project_id, owner_id).await?;

    let content =
        content_generator::generate_lesson_content(&params.subject, &params.level, &params.topic);

    let mut lesson_plan = LessonPlanDoc {
        id: None,
        project_id: project_id.to_string(),
        file_name: format!(
            "{}-{}-{}-LessonPlan.md",
            params.subject, params.level, params.topic
        ),
        content: content.lesson_plan,
        export_format: "pdf".to_string(),
    };

    let mut worksheet = WorksheetDoc {
        id: None,
        project_id: project_id.to_string(),
        file_name: format!(
            "{}-{}-{}-Worksheet.md",
            params.subject, params.level, params.topic
        ),
        content: content.worksheet,
        export_format: "pdf".to_string(),
    };

    let result = db
        .collection::<LessonPlanDoc>(LESSON_PLANS)
        .insert_one(&lesson_plan)
        .await?;
    lesson_plan.id = result.inserted_id.as_object_id();

    let result = db
        .collection::<WorksheetDoc>(WORKSHEETS)
        .insert_one(&worksheet)
        .await?;
    worksheet.id = result.inserted_id.as_object_id();

    Ok(LessonPlanResult {
        lesson_plan: lesson_plan.into(),
        worksheet: worksheet.into(),
    })
}

/// Generates one update per parsed row and persists each one. A failed insert
/// does not abort the batch; it is reported in `failures` alongside the rows
/// that did go through.
pub async fn generate_parent_updates(
    db: &MongoDB,
    project_id: &str,
    owner_id: &str,
    csv_data: &str,
) -> Result<ParentUpdatesResult, AppError> {
    find_owned_project(db, project_id, owner_id).await?;

    let updates = content_generator::generate_parent_updates(csv_data);
    log::info!("📝 Generated {} parent updates for project {}", updates.len(), project_id);

    let collection = db.collection::<ParentUpdateDoc>(PARENT_UPDATES);

    let mut inserted_ids = Vec::new();
    let mut failures = Vec::new();

    for update_content in &updates {
        let student_name = extract_student_name(update_content);

        let parent_update = ParentUpdateDoc {
            id: None,
            project_id: project_id.to_string(),
            student_name: student_name.clone(),
            file_name: format!("{}-ParentUpdate.txt", student_name),
            draft_text: update_content.clone(),
        };

        match collection.insert_one(&parent_update).await {
            Ok(result) => {
                let id = result
                    .inserted_id
                    .as_object_id()
                    .map(|oid| oid.to_hex())
                    .unwrap_or_default();
                inserted_ids.push(id);
            }
            Err(e) => {
                log::error!("❌ Failed to insert parent update for {}: {}", student_name, e);
                failures.push(ParentUpdateFailure {
                    student_name,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "✅ Parent updates persisted: {} inserted, {} failed",
        inserted_ids.len(),
        failures.len()
    );

    Ok(ParentUpdatesResult {
        updates,
        inserted_ids,
        failures,
    })
}

fn extract_student_name(update_content: &str) -> String {
    update_content
        .strip_prefix("Update for ")
        .and_then(|rest| rest.split(':').next())
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_student_name() {
        assert_eq!(
            extract_student_name("Update for Alice: Their score was 90."),
            "Alice"
        );
        assert_eq!(
            extract_student_name("Update for Student: just one line"),
            "Student"
        );
        assert_eq!(extract_student_name("something else entirely"), "Unknown");
    }

    #[test]
    fn test_invalid_project_id_is_rejected() {
        assert!(matches!(
            parse_project_id("not-a-hex-id"),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(parse_project_id("65f0a1b2c3d4e5f6a7b8c9d0").is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_project_round_trip() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/classroom_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let owner_id = ObjectId::new().to_hex();
        let created = create_project(&db, &owner_id, "Term 2 planning").await.unwrap();
        assert!(created.lesson_plans.is_empty());
        assert!(created.worksheets.is_empty());
        assert!(created.parent_updates.is_empty());

        let listed = list_projects(&db, &owner_id).await.unwrap();
        assert!(listed.iter().any(|p| p.id == created.id));

        let params = GenerationParams {
            subject: "Math".into(),
            level: "Grade5".into(),
            topic: "Fractions".into(),
        };
        generate_lesson_plan(&db, &created.id, &owner_id, &params).await.unwrap();

        let fetched = get_project(&db, &created.id, &owner_id).await.unwrap();
        assert_eq!(fetched.lesson_plans.len(), 1);
        assert_eq!(fetched.worksheets.len(), 1);
        assert_eq!(fetched.lesson_plans[0].file_name, "Math-Grade5-Fractions-LessonPlan.md");
        assert_eq!(fetched.worksheets[0].file_name, "Math-Grade5-Fractions-Worksheet.md");

        // Delete does not cascade; children stay queryable by the old id.
        delete_project(&db, &created.id, &owner_id).await.unwrap();
        assert!(matches!(
            get_project(&db, &created.id, &owner_id).await,
            Err(AppError::NotFound(_))
        ));
        let (lesson_plans, worksheets, _) = load_children(&db, &created.id).await.unwrap();
        assert_eq!(lesson_plans.len(), 1);
        assert_eq!(worksheets.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_foreign_owner_sees_not_found() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/classroom_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let owner_id = ObjectId::new().to_hex();
        let stranger_id = ObjectId::new().to_hex();
        let created = create_project(&db, &owner_id, "Private notes").await.unwrap();

        let foreign = get_project(&db, &created.id, &stranger_id).await;
        let missing = get_project(&db, &ObjectId::new().to_hex(), &stranger_id).await;

        // Same signal for "not yours" and "does not exist".
        match (foreign, missing) {
            (Err(AppError::NotFound(a)), Err(AppError::NotFound(b))) => assert_eq!(a, b),
            other => panic!("expected NotFound pair, got {:?}", other),
        }

        assert!(matches!(
            delete_project(&db, &created.id, &stranger_id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
