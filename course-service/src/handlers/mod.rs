pub mod courses;
pub mod health;

pub use courses::{create_course, delete_course, get_course, list_courses, update_course};
pub use health::{health_check, metrics_endpoint, readiness_check};
