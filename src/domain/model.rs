use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RecordId = u64;

/// Placeholder substituted for base64 file bodies in bulk listings.
pub const REDACTED_FILE_CONTENT: &str = "[File Content]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    Individual,
    Agency,
}

impl ApplicationType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "individual" => Some(ApplicationType::Individual),
            "agency" => Some(ApplicationType::Agency),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelanceApplication {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub experience_years: String,
    pub skills: String,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub message: String,
    pub application_type: ApplicationType,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFreelanceApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    pub experience_years: String,
    pub skills: String,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub message: String,
    pub application_type: ApplicationType,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub cv_file_name: String,
    pub cv_file_content: String,
    pub cover_letter_file_name: Option<String>,
    pub cover_letter_file_content: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobApplication {
    /// Copy with file bodies replaced by [`REDACTED_FILE_CONTENT`].
    pub fn redacted(&self) -> Self {
        Self {
            cv_file_content: REDACTED_FILE_CONTENT.to_string(),
            cover_letter_file_content: self
                .cover_letter_file_content
                .as_ref()
                .map(|_| REDACTED_FILE_CONTENT.to_string()),
            ..self.clone()
        }
    }

    pub fn summary(&self) -> JobApplicationSummary {
        JobApplicationSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewJobApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub cv_file_name: String,
    pub cv_file_content: String,
    pub cover_letter_file_name: Option<String>,
    pub cover_letter_file_content: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a job applicant gets back; file content is never echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplicationSummary {
    pub id: RecordId,
    pub name: String,
    pub email: String,
}
