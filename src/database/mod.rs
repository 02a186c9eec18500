use mongodb::bson::doc;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

pub const USERS: &str = "users";
pub const PROJECTS: &str = "projects";
pub const LESSON_PLANS: &str = "lesson_plans";
pub const WORKSHEETS: &str = "worksheets";
pub const PARENT_UPDATES: &str = "parent_updates";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("classroom");

        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::options::IndexOptions;

        log::info!("🔧 Creating database indexes...");

        // Unique index on users(email) - one account per email
        let users = self.db.collection::<mongodb::bson::Document>(USERS);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index on projects(userId) - ownership-scoped listing
        let projects = self.db.collection::<mongodb::bson::Document>(PROJECTS);
        let owner_index = IndexModel::builder().keys(doc! { "userId": 1 }).build();

        match projects.create_index(owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: projects(userId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index on child collections(projectId) - read-time joins
        for name in [LESSON_PLANS, WORKSHEETS, PARENT_UPDATES] {
            let collection = self.db.collection::<mongodb::bson::Document>(name);
            let fk_index = IndexModel::builder().keys(doc! { "projectId": 1 }).build();

            match collection.create_index(fk_index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(projectId)", name),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    /// Check if the connection is healthy (cheap ping, no auth required)
    pub async fn health_check(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/classroom_test".to_string());

        let db = MongoDB::new(&uri).await;
        assert!(db.is_ok());
        assert!(db.unwrap().health_check().await.is_ok());
    }
}
