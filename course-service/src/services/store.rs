use crate::error::CourseError;
use crate::models::{Course, CourseUpdate};
use async_trait::async_trait;

/// Persistence operations behind the course routes.
///
/// Each method is a single store round trip. Callers compose them; nothing
/// here spans more than one document.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Every stored course in the store's natural order.
    async fn list(&self) -> Result<Vec<Course>, CourseError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Course>, CourseError>;

    /// Insert `course` as-is. Fails with [`CourseError::DuplicateCode`] when
    /// the store itself rejects the code.
    async fn insert(&self, course: &Course) -> Result<(), CourseError>;

    /// Apply `update` to the course with `code`; returns the matched count.
    async fn update_by_code(&self, code: &str, update: &CourseUpdate)
        -> Result<u64, CourseError>;

    /// Remove the course with `code`; returns the deleted count.
    async fn delete_by_code(&self, code: &str) -> Result<u64, CourseError>;

    async fn health_check(&self) -> Result<(), CourseError>;
}
