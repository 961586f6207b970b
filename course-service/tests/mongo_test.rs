mod common;

use common::TestApp;
use course_service::models::Course;
use course_service::services::{CourseStore, MongoCourseStore};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "Requires MongoDB at MONGO_URI (default mongodb://localhost:27017)"]
async fn crud_round_trip_against_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();
    let course = json!({
        "codigo": "CS101",
        "titulo": "Intro",
        "descricao": "Basics",
        "carga_horaria": 40
    });

    let response = client
        .post(app.courses_url())
        .json(&course)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, course);

    let response = client
        .post(app.courses_url())
        .json(&course)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .put(app.course_url("CS101"))
        .json(&json!({ "titulo": "Intro to CS" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["titulo"], "Intro to CS");
    assert_eq!(body["descricao"], "Basics");
    assert_eq!(body["carga_horaria"], 40);

    let response = client
        .get(app.courses_url())
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let response = client
        .delete(app.course_url("CS101"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["detail"], "Course CS101 deleted successfully");

    let response = client
        .get(app.course_url("CS101"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at MONGO_URI (default mongodb://localhost:27017)"]
async fn unique_index_rejects_duplicate_insert() {
    let app = TestApp::spawn().await;
    let store = MongoCourseStore::new(app.db.clone());
    let course = Course::new("CS101", "Intro", "Basics", 40);

    store.insert(&course).await.expect("First insert failed");
    let second = store.insert(&course).await;

    assert!(matches!(
        second,
        Err(course_service::error::CourseError::DuplicateCode)
    ));
    assert_eq!(store.list().await.expect("List failed").len(), 1);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires MongoDB at MONGO_URI (default mongodb://localhost:27017)"]
async fn health_check_works() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "course-service");

    app.cleanup().await;
}
