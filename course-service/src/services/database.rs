use crate::error::CourseError;
use crate::models::course::code_filter;
use crate::models::{Course, CourseUpdate};
use crate::services::store::CourseStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const COURSES_COLLECTION: &str = "cursos";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Process-wide MongoDB handle. Cloning shares the driver's connection pool.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for course-service");

        let code_index = IndexModel::builder()
            .keys(doc! { "codigo": 1 })
            .options(
                IndexOptions::builder()
                    .name("codigo_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.courses()
            .create_index(code_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create codigo index on cursos collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on cursos.codigo");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn courses(&self) -> Collection<Course> {
        self.db.collection(COURSES_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// [`CourseStore`] over the `cursos` collection.
#[derive(Clone)]
pub struct MongoCourseStore {
    db: MongoDb,
}

impl MongoCourseStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseStore for MongoCourseStore {
    async fn list(&self) -> Result<Vec<Course>, CourseError> {
        let cursor = self.db.courses().find(None, None).await.map_err(|e| {
            tracing::error!("Failed to query courses: {}", e);
            CourseError::from(e)
        })?;

        let courses: Vec<Course> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read courses cursor: {}", e);
            CourseError::from(e)
        })?;
        Ok(courses)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Course>, CourseError> {
        self.db
            .courses()
            .find_one(code_filter(code), None)
            .await
            .map_err(|e| {
                tracing::error!(code = %code, "Failed to find course: {}", e);
                CourseError::from(e)
            })
    }

    async fn insert(&self, course: &Course) -> Result<(), CourseError> {
        match self.db.courses().insert_one(course, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                tracing::warn!(code = %course.code, "Unique index rejected duplicate course code");
                Err(CourseError::DuplicateCode)
            }
            Err(e) => {
                tracing::error!(code = %course.code, "Failed to insert course: {}", e);
                Err(CourseError::from(e))
            }
        }
    }

    async fn update_by_code(
        &self,
        code: &str,
        update: &CourseUpdate,
    ) -> Result<u64, CourseError> {
        let set: Document = update.to_set_document();
        let result = self
            .db
            .courses()
            .update_one(code_filter(code), doc! { "$set": set }, None)
            .await
            .map_err(|e| {
                tracing::error!(code = %code, "Failed to update course: {}", e);
                CourseError::from(e)
            })?;
        Ok(result.matched_count)
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64, CourseError> {
        let result = self
            .db
            .courses()
            .delete_one(code_filter(code), None)
            .await
            .map_err(|e| {
                tracing::error!(code = %code, "Failed to delete course: {}", e);
                CourseError::from(e)
            })?;
        Ok(result.deleted_count)
    }

    async fn health_check(&self) -> Result<(), CourseError> {
        Ok(self.db.health_check().await?)
    }
}
