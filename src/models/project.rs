use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

// Stored documents. Field names keep the camelCase wire format the frontend
// expects; foreign keys are plain hex-string copies of the parent `_id`.

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LessonPlanDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub content: String,
    #[serde(rename = "exportFormat", default = "default_export_format")]
    pub export_format: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorksheetDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub content: String,
    #[serde(rename = "exportFormat", default = "default_export_format")]
    pub export_format: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ParentUpdateDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "studentName")]
    pub student_name: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "draftText")]
    pub draft_text: String,
}

fn default_export_format() -> String {
    "pdf".to_string()
}

// API shapes. Ids are hex strings; a Project response denormalizes its three
// child collections, joined at read time by the project id string.

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "lessonPlans")]
    pub lesson_plans: Vec<LessonPlan>,
    pub worksheets: Vec<Worksheet>,
    #[serde(rename = "parentUpdates")]
    pub parent_updates: Vec<ParentUpdate>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LessonPlan {
    pub id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub content: String,
    #[serde(rename = "exportFormat")]
    pub export_format: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Worksheet {
    pub id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub content: String,
    #[serde(rename = "exportFormat")]
    pub export_format: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ParentUpdate {
    pub id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "studentName")]
    pub student_name: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "draftText")]
    pub draft_text: String,
}

fn hex(id: &Option<ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

impl ProjectDoc {
    pub fn into_response(
        self,
        lesson_plans: Vec<LessonPlan>,
        worksheets: Vec<Worksheet>,
        parent_updates: Vec<ParentUpdate>,
    ) -> Project {
        Project {
            id: hex(&self.id),
            name: self.name,
            user_id: self.user_id,
            lesson_plans,
            worksheets,
            parent_updates,
        }
    }
}

impl From<LessonPlanDoc> for LessonPlan {
    fn from(doc: LessonPlanDoc) -> Self {
        LessonPlan {
            id: hex(&doc.id),
            project_id: doc.project_id,
            file_name: doc.file_name,
            content: doc.content,
            export_format: doc.export_format,
        }
    }
}

impl From<WorksheetDoc> for Worksheet {
    fn from(doc: WorksheetDoc) -> Self {
        Worksheet {
            id: hex(&doc.id),
            project_id: doc.project_id,
            file_name: doc.file_name,
            content: doc.content,
            export_format: doc.export_format,
        }
    }
}

impl From<ParentUpdateDoc> for ParentUpdate {
    fn from(doc: ParentUpdateDoc) -> Self {
        ParentUpdate {
            id: hex(&doc.id),
            project_id: doc.project_id,
            student_name: doc.student_name,
            file_name: doc.file_name,
            draft_text: doc.draft_text,
        }
    }
}

// Request bodies

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GenerationParams {
    pub subject: String,
    pub level: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ParentUpdateParams {
    pub csv_data: String,
}
