use crate::error::CourseError;
use crate::models::{Course, CourseUpdate};
use crate::services::metrics::{
    COURSES_CREATED, COURSES_DELETED, COURSES_UPDATED, COURSE_CONFLICTS,
};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use metrics::counter;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCourseResponse {
    pub detail: String,
}

#[tracing::instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, CourseError> {
    let courses = state.store.list().await?;
    tracing::debug!(count = courses.len(), "Listed courses");
    Ok(Json(courses))
}

#[tracing::instrument(skip(state, course))]
pub async fn create_course(
    State(state): State<AppState>,
    WithRejection(Json(course), _): WithRejection<Json<Course>, CourseError>,
) -> Result<Json<Course>, CourseError> {
    course.validate()?;

    // Best-effort check; the unique index on `codigo` catches concurrent inserts.
    if state.store.find_by_code(&course.code).await?.is_some() {
        counter!(COURSE_CONFLICTS).increment(1);
        tracing::info!(code = %course.code, "Course code already exists");
        return Err(CourseError::DuplicateCode);
    }

    state.store.insert(&course).await.map_err(|e| {
        if matches!(e, CourseError::DuplicateCode) {
            counter!(COURSE_CONFLICTS).increment(1);
        }
        e
    })?;

    counter!(COURSES_CREATED).increment(1);
    tracing::info!(code = %course.code, "Course created");

    Ok(Json(course))
}

#[tracing::instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Course>, CourseError> {
    state
        .store
        .find_by_code(&code)
        .await?
        .map(Json)
        .ok_or(CourseError::NotFound)
}

#[tracing::instrument(skip(state, update))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
    WithRejection(Json(update), _): WithRejection<Json<CourseUpdate>, CourseError>,
) -> Result<Json<Course>, CourseError> {
    if update.is_empty() {
        return Err(CourseError::EmptyUpdate);
    }

    let matched = state.store.update_by_code(&code, &update).await?;
    if matched == 0 {
        return Err(CourseError::NotFound);
    }

    counter!(COURSES_UPDATED).increment(1);
    tracing::info!(code = %code, "Course updated");

    // The course can disappear between the write and this read.
    let course = state
        .store
        .find_by_code(&code)
        .await?
        .ok_or(CourseError::NotFound)?;

    Ok(Json(course))
}

#[tracing::instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeleteCourseResponse>, CourseError> {
    let deleted = state.store.delete_by_code(&code).await?;
    if deleted == 0 {
        return Err(CourseError::NotFound);
    }

    counter!(COURSES_DELETED).increment(1);
    tracing::info!(code = %code, "Course deleted");

    Ok(Json(DeleteCourseResponse {
        detail: format!("Course {} deleted successfully", code),
    }))
}
