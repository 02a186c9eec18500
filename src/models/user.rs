use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// User document as stored in the `users` collection. The password field
/// holds a bcrypt hash, never the plaintext.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub created_at: Option<BsonDateTime>,
}

impl User {
    /// Hex string of the store-generated id, used as the `userId` foreign key
    /// on owned projects.
    pub fn id_hex(&self) -> String {
        self.id.map(|oid| oid.to_hex()).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public view of a user, without the password hash.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub email: String,
    pub full_name: Option<String>,
}
