// File: ./src/model/subject.rs
use crate::model::semester::Semester;
use std::fmt;
use std::sync::Arc;

/// One enrolled subject, tied to a project in the external task service.
///
/// `code` is the unique key tasks reference; it is matched
/// case-insensitively, so it is stored lowercased.
#[derive(Debug, Clone)]
pub struct Subject {
    pub code: String,
    pub name: String,
    pub project_id: u64,
    pub semester: Arc<Semester>,
}

impl Subject {
    pub fn new(code: &str, name: &str, project_id: u64, semester: Arc<Semester>) -> Self {
        Self {
            code: code.to_lowercase(),
            name: name.to_lowercase(),
            project_id,
            semester,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}); ID: {}", self.code, self.name, self.project_id)
    }
}
