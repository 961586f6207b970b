use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Field name of the course code, both on the wire and in the store.
pub const CODE_FIELD: &str = "codigo";

/// A course as stored in the `cursos` collection and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Course {
    #[serde(rename = "codigo")]
    #[validate(length(min = 1, message = "Course code cannot be empty"))]
    pub code: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "carga_horaria")]
    pub duration_hours: i64,
}

/// Partial update payload. Absent and `null` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdate {
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "carga_horaria",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_hours: Option<i64>,
}

impl Course {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        duration_hours: i64,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            description: description.into(),
            duration_hours,
        }
    }

    /// Overwrite the fields present in `update`.
    pub fn apply(&mut self, update: &CourseUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(duration_hours) = update.duration_hours {
            self.duration_hours = duration_hours;
        }
    }
}

impl CourseUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.duration_hours.is_none()
    }

    /// The `$set` body holding only the provided fields.
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(title) = &self.title {
            set.insert("titulo", title.as_str());
        }
        if let Some(description) = &self.description {
            set.insert("descricao", description.as_str());
        }
        if let Some(duration_hours) = self.duration_hours {
            set.insert("carga_horaria", duration_hours);
        }
        set
    }
}

/// Exact-match filter on the course code.
pub fn code_filter(code: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(CODE_FIELD, code);
    filter
}
