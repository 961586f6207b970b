use crate::error::CourseError;
use crate::models::{Course, CourseUpdate};
use crate::services::store::CourseStore;
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process [`CourseStore`] for tests and local runs without MongoDB.
///
/// Keeps insertion order and rejects duplicate codes the way the unique
/// index on `codigo` does.
pub struct InMemoryCourseStore {
    courses: RwLock<Vec<Course>>,
    healthy: AtomicBool,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::with_courses(Vec::new())
    }

    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            courses: RwLock::new(courses.into_iter().collect()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Toggle what `health_check` reports.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.courses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.courses.read().await.is_empty()
    }
}

impl Default for InMemoryCourseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn list(&self) -> Result<Vec<Course>, CourseError> {
        Ok(self.courses.read().await.clone())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Course>, CourseError> {
        Ok(self
            .courses
            .read()
            .await
            .iter()
            .find(|course| course.code == code)
            .cloned())
    }

    async fn insert(&self, course: &Course) -> Result<(), CourseError> {
        let mut courses = self.courses.write().await;
        if courses.iter().any(|existing| existing.code == course.code) {
            return Err(CourseError::DuplicateCode);
        }
        courses.push(course.clone());
        Ok(())
    }

    async fn update_by_code(
        &self,
        code: &str,
        update: &CourseUpdate,
    ) -> Result<u64, CourseError> {
        let mut courses = self.courses.write().await;
        match courses.iter_mut().find(|course| course.code == code) {
            Some(course) => {
                course.apply(update);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64, CourseError> {
        let mut courses = self.courses.write().await;
        match courses.iter().position(|course| course.code == code) {
            Some(index) => {
                courses.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn health_check(&self) -> Result<(), CourseError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CourseError::Service(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store marked unhealthy"
            ))))
        }
    }
}
