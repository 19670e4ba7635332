//! Submittable form schemas.
//!
//! Each form is parsed straight from the request JSON. Every field is checked
//! and all problems are reported together, so a client can fix the whole form
//! in one round trip. Nothing is returned unless the entire payload is valid.

use crate::domain::model::{
    ApplicationType, NewContactMessage, NewFreelanceApplication, NewJobApplication,
};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{has_min_length, is_valid_email, is_valid_url, FieldError};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const MAX_FILE_SIZE_BYTES: f64 = 5.0 * 1024.0 * 1024.0;

const EMAIL_MESSAGE: &str = "Please enter a valid email address";
const PHONE_MESSAGE: &str = "Please enter a valid phone number";
const URL_MESSAGE: &str = "Please enter a valid URL";

pub trait Form: Sized {
    fn parse(payload: &Value) -> Result<Self>;
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
) -> std::result::Result<&'a Map<String, Value>, FieldError> {
    value.as_object().ok_or_else(|| {
        FieldError::new(
            path,
            format!("Expected object, received {}", json_type_name(value)),
        )
    })
}

/// Walks one JSON object, collecting field errors as it goes.
struct FormReader<'a> {
    fields: &'a Map<String, Value>,
    prefix: String,
    errors: Vec<FieldError>,
}

impl<'a> FormReader<'a> {
    fn root(payload: &'a Value) -> Result<Self> {
        let fields = expect_object(payload, "").map_err(|e| SiteError::validation(vec![e]))?;
        Ok(Self {
            fields,
            prefix: String::new(),
            errors: Vec::new(),
        })
    }

    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.prefix, field)
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        let path = self.path(field);
        self.errors.push(FieldError::new(path, message));
    }

    fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_error(self) -> SiteError {
        SiteError::validation(self.errors)
    }

    fn string(&mut self, field: &str) -> Option<&'a str> {
        let fields = self.fields;
        match fields.get(field) {
            None => {
                self.reject(field, "Required");
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.reject(
                    field,
                    format!("Expected string, received {}", json_type_name(other)),
                );
                None
            }
        }
    }

    /// Missing, null, and "" all read as absent.
    fn optional_string(&mut self, field: &str) -> Option<&'a str> {
        let fields = self.fields;
        match fields.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.reject(
                    field,
                    format!("Expected string, received {}", json_type_name(other)),
                );
                None
            }
        }
    }

    fn number(&mut self, field: &str) -> Option<f64> {
        let fields = self.fields;
        match fields.get(field) {
            None => {
                self.reject(field, "Required");
                None
            }
            Some(Value::Number(n)) => n.as_f64(),
            Some(other) => {
                self.reject(
                    field,
                    format!("Expected number, received {}", json_type_name(other)),
                );
                None
            }
        }
    }

    fn text(&mut self, field: &str, min: usize, message: &str) -> Option<String> {
        let value = self.string(field)?;
        if !has_min_length(value, min) {
            self.reject(field, message);
            return None;
        }
        Some(value.to_string())
    }

    fn email(&mut self, field: &str) -> Option<String> {
        let value = self.string(field)?;
        if !is_valid_email(value) {
            self.reject(field, EMAIL_MESSAGE);
            return None;
        }
        Some(value.to_string())
    }

    fn optional_url(&mut self, field: &str) -> Option<String> {
        let value = self.optional_string(field)?;
        if !is_valid_url(value) {
            self.reject(field, URL_MESSAGE);
            return None;
        }
        Some(value.to_string())
    }

    fn file(&mut self, field: &str, too_large: &str) -> Option<UploadedFile> {
        let fields = self.fields;
        match fields.get(field) {
            None => {
                self.reject(field, "Required");
                None
            }
            Some(value) => self.nested_file(field, value, too_large),
        }
    }

    fn optional_file(&mut self, field: &str, too_large: &str) -> Option<UploadedFile> {
        let fields = self.fields;
        match fields.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.nested_file(field, value, too_large),
        }
    }

    fn nested_file(&mut self, field: &str, value: &'a Value, too_large: &str) -> Option<UploadedFile> {
        let path = self.path(field);
        let fields = match expect_object(value, &path) {
            Ok(fields) => fields,
            Err(e) => {
                self.errors.push(e);
                return None;
            }
        };

        let mut nested = FormReader {
            fields,
            prefix: path,
            errors: Vec::new(),
        };
        let name = nested.string("name");
        let content = nested.string("content");
        let size = nested.number("size");
        if let Some(size) = size {
            if size > MAX_FILE_SIZE_BYTES {
                nested.reject("size", too_large);
            }
        }

        let file = match (name, content, size) {
            (Some(name), Some(content), Some(size)) if nested.is_clean() => Some(UploadedFile {
                name: name.to_string(),
                content: content.to_string(),
                size,
            }),
            _ => None,
        };
        self.errors.append(&mut nested.errors);
        file
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Form for ContactForm {
    fn parse(payload: &Value) -> Result<Self> {
        let mut reader = FormReader::root(payload)?;

        let name = reader.text("name", 2, "Name must be at least 2 characters");
        let email = reader.email("email");
        let subject = reader.text("subject", 5, "Subject must be at least 5 characters");
        let message = reader.text("message", 10, "Message must be at least 10 characters");

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) if reader.is_clean() => {
                Ok(ContactForm {
                    name,
                    email,
                    subject,
                    message,
                })
            }
            _ => Err(reader.into_error()),
        }
    }
}

impl ContactForm {
    pub fn into_record(self, created_at: DateTime<Utc>) -> NewContactMessage {
        NewContactMessage {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreelanceForm {
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
}

impl Form for FreelanceForm {
    fn parse(payload: &Value) -> Result<Self> {
        let mut reader = FormReader::root(payload)?;

        let name = reader.text("name", 2, "Name must be at least 2 characters");
        let email = reader.email("email");
        let phone = reader.text("phone", 10, PHONE_MESSAGE);
        let specialty = reader.text("specialty", 2, "Specialty must be at least 2 characters");
        let experience_years =
            reader.text("experienceYears", 1, "Years of experience is required");
        let skills = reader.text("skills", 5, "Skills must be at least 5 characters");
        let portfolio_url = reader.optional_url("portfolioUrl");
        let linkedin_url = reader.optional_url("linkedinUrl");
        let message = reader.text("message", 10, "Message must be at least 10 characters");
        let application_type = match reader.string("applicationType") {
            Some(raw) => {
                let parsed = ApplicationType::parse(raw);
                if parsed.is_none() {
                    reader.reject(
                        "applicationType",
                        "Application type must be either 'individual' or 'agency'",
                    );
                }
                parsed
            }
            None => None,
        };
        let company_name = reader.optional_string("companyName").map(str::to_string);

        // 代理商申請必須填寫公司名稱
        if application_type == Some(ApplicationType::Agency)
            && company_name.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            reader.reject("companyName", "Company name is required for agency applications");
        }

        match (
            name,
            email,
            phone,
            specialty,
            experience_years,
            skills,
            message,
            application_type,
        ) {
            (
                Some(name),
                Some(email),
                Some(phone),
                Some(specialty),
                Some(experience_years),
                Some(skills),
                Some(message),
                Some(application_type),
            ) if reader.is_clean() => Ok(FreelanceForm {
                name,
                email,
                phone,
                specialty,
                experience_years,
                skills,
                portfolio_url,
                linkedin_url,
                message,
                application_type,
                company_name,
            }),
            _ => Err(reader.into_error()),
        }
    }
}

impl FreelanceForm {
    pub fn into_record(self, created_at: DateTime<Utc>) -> NewFreelanceApplication {
        NewFreelanceApplication {
            name: self.name,
            email: self.email,
            phone: self.phone,
            specialty: self.specialty,
            experience_years: self.experience_years,
            skills: self.skills,
            portfolio_url: self.portfolio_url,
            linkedin_url: self.linkedin_url,
            message: self.message,
            application_type: self.application_type,
            company_name: self.company_name,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    /// Base64 body as sent by the browser; it is stored, not decoded.
    pub content: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub cv_file: UploadedFile,
    pub cover_letter_file: Option<UploadedFile>,
    pub message: Option<String>,
}

impl Form for JobApplicationForm {
    fn parse(payload: &Value) -> Result<Self> {
        let mut reader = FormReader::root(payload)?;

        let name = reader.text("name", 2, "Name must be at least 2 characters");
        let email = reader.email("email");
        let phone = reader.text("phone", 10, PHONE_MESSAGE);
        let position = reader.text("position", 2, "Position must be at least 2 characters");
        let cv_file = reader.file("cvFile", "CV file must be less than 5MB");
        let cover_letter_file =
            reader.optional_file("coverLetterFile", "Cover letter file must be less than 5MB");
        let message = reader.optional_string("message").map(str::to_string);

        match (name, email, phone, position, cv_file) {
            (Some(name), Some(email), Some(phone), Some(position), Some(cv_file))
                if reader.is_clean() =>
            {
                Ok(JobApplicationForm {
                    name,
                    email,
                    phone,
                    position,
                    cv_file,
                    cover_letter_file,
                    message,
                })
            }
            _ => Err(reader.into_error()),
        }
    }
}

impl JobApplicationForm {
    pub fn into_record(self, created_at: DateTime<Utc>) -> NewJobApplication {
        let (cover_letter_file_name, cover_letter_file_content) = match self.cover_letter_file {
            Some(file) => (Some(file.name), Some(file.content)),
            None => (None, None),
        };

        NewJobApplication {
            name: self.name,
            email: self.email,
            phone: self.phone,
            position: self.position,
            cv_file_name: self.cv_file.name,
            cv_file_content: self.cv_file.content,
            cover_letter_file_name,
            cover_letter_file_content,
            message: self.message,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(err: SiteError) -> Vec<FieldError> {
        match err {
            SiteError::ValidationError { errors } => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn paths(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    fn freelance_payload() -> Value {
        json!({
            "name": "Ana Lee",
            "email": "ana@example.com",
            "phone": "5551234567",
            "specialty": "UX Design",
            "experienceYears": "4",
            "skills": "Figma, user research",
            "message": "I'd love to collaborate.",
            "applicationType": "individual"
        })
    }

    fn job_payload() -> Value {
        json!({
            "name": "Sam Park",
            "email": "sam@example.com",
            "phone": "0612345678",
            "position": "Backend Engineer",
            "cvFile": {"name": "cv.pdf", "content": "JVBERi0xLjQK", "size": 2048}
        })
    }

    #[test]
    fn test_contact_form_accepts_valid_payload() {
        let form = ContactForm::parse(&json!({
            "name": "Jo",
            "email": "jo@example.com",
            "subject": "Hello",
            "message": "Please call me back."
        }))
        .unwrap();

        assert_eq!(form.name, "Jo");
        assert_eq!(form.subject, "Hello");
    }

    #[test]
    fn test_contact_form_reports_every_failing_field() {
        let err = ContactForm::parse(&json!({
            "name": "J",
            "email": "not-an-email",
            "subject": "Hi",
            "message": "short"
        }))
        .unwrap_err();

        let errors = field_errors(err);
        assert_eq!(paths(&errors), vec!["name", "email", "subject", "message"]);
        assert_eq!(errors[0].message, "Name must be at least 2 characters");
        assert_eq!(errors[1].message, "Please enter a valid email address");
        assert_eq!(errors[2].message, "Subject must be at least 5 characters");
        assert_eq!(errors[3].message, "Message must be at least 10 characters");
    }

    #[test]
    fn test_contact_form_missing_and_mistyped_fields() {
        let err = ContactForm::parse(&json!({
            "name": 42,
            "email": "jo@example.com",
            "message": "Please call me back."
        }))
        .unwrap_err();

        let errors = field_errors(err);
        assert_eq!(
            errors,
            vec![
                FieldError::new("name", "Expected string, received number"),
                FieldError::new("subject", "Required"),
            ]
        );
    }

    #[test]
    fn test_non_object_payload_is_rejected_at_root() {
        let errors = field_errors(ContactForm::parse(&json!(["a", "b"])).unwrap_err());
        assert_eq!(errors, vec![FieldError::new("", "Expected object, received array")]);
    }

    #[test]
    fn test_freelance_individual_without_company() {
        let form = FreelanceForm::parse(&freelance_payload()).unwrap();

        assert_eq!(form.application_type, ApplicationType::Individual);
        assert_eq!(form.company_name, None);
        assert_eq!(form.portfolio_url, None);
        assert_eq!(form.experience_years, "4");
    }

    #[test]
    fn test_freelance_short_phone_is_rejected() {
        let mut payload = freelance_payload();
        payload["phone"] = json!("555");

        let errors = field_errors(FreelanceForm::parse(&payload).unwrap_err());
        assert_eq!(errors, vec![FieldError::new("phone", "Please enter a valid phone number")]);
    }

    #[test]
    fn test_freelance_empty_urls_mean_absent() {
        let mut payload = freelance_payload();
        payload["portfolioUrl"] = json!("");
        payload["linkedinUrl"] = json!("");

        let form = FreelanceForm::parse(&payload).unwrap();
        assert_eq!(form.portfolio_url, None);
        assert_eq!(form.linkedin_url, None);
    }

    #[test]
    fn test_freelance_invalid_url_is_rejected() {
        let mut payload = freelance_payload();
        payload["portfolioUrl"] = json!("not-a-url");
        payload["linkedinUrl"] = json!("https://www.linkedin.com/in/analee");

        let errors = field_errors(FreelanceForm::parse(&payload).unwrap_err());
        assert_eq!(errors, vec![FieldError::new("portfolioUrl", "Please enter a valid URL")]);
    }

    #[test]
    fn test_freelance_unknown_application_type() {
        let mut payload = freelance_payload();
        payload["applicationType"] = json!("company");

        let errors = field_errors(FreelanceForm::parse(&payload).unwrap_err());
        assert_eq!(paths(&errors), vec!["applicationType"]);
    }

    #[test]
    fn test_freelance_agency_requires_company_name() {
        let mut payload = freelance_payload();
        payload["applicationType"] = json!("agency");

        let errors = field_errors(FreelanceForm::parse(&payload).unwrap_err());
        assert_eq!(
            errors,
            vec![FieldError::new(
                "companyName",
                "Company name is required for agency applications"
            )]
        );

        payload["companyName"] = json!("Lee Studio");
        let form = FreelanceForm::parse(&payload).unwrap();
        assert_eq!(form.application_type, ApplicationType::Agency);
        assert_eq!(form.company_name.as_deref(), Some("Lee Studio"));
    }

    #[test]
    fn test_job_application_without_cover_letter() {
        let form = JobApplicationForm::parse(&job_payload()).unwrap();

        assert_eq!(form.cv_file.name, "cv.pdf");
        assert!(form.cover_letter_file.is_none());
        assert!(form.message.is_none());

        let record = form.into_record(Utc::now());
        assert_eq!(record.cv_file_content, "JVBERi0xLjQK");
        assert_eq!(record.cover_letter_file_name, None);
    }

    #[test]
    fn test_job_application_missing_cv() {
        let mut payload = job_payload();
        payload.as_object_mut().unwrap().remove("cvFile");

        let errors = field_errors(JobApplicationForm::parse(&payload).unwrap_err());
        assert_eq!(errors, vec![FieldError::new("cvFile", "Required")]);
    }

    #[test]
    fn test_job_application_file_size_limit() {
        let mut payload = job_payload();
        payload["cvFile"]["size"] = json!(5 * 1024 * 1024 + 1);
        payload["coverLetterFile"] = json!({"name": "letter.pdf", "content": "AAAA", "size": 6_000_000});

        let errors = field_errors(JobApplicationForm::parse(&payload).unwrap_err());
        assert_eq!(
            errors,
            vec![
                FieldError::new("cvFile.size", "CV file must be less than 5MB"),
                FieldError::new("coverLetterFile.size", "Cover letter file must be less than 5MB"),
            ]
        );
    }

    #[test]
    fn test_job_application_exactly_five_mib_is_allowed() {
        let mut payload = job_payload();
        payload["cvFile"]["size"] = json!(5_242_880);

        assert!(JobApplicationForm::parse(&payload).is_ok());
    }

    #[test]
    fn test_job_application_malformed_file_object() {
        let mut payload = job_payload();
        payload["cvFile"] = json!({"name": "cv.pdf", "size": "big"});

        let errors = field_errors(JobApplicationForm::parse(&payload).unwrap_err());
        assert_eq!(
            errors,
            vec![
                FieldError::new("cvFile.content", "Required"),
                FieldError::new("cvFile.size", "Expected number, received string"),
            ]
        );
    }
}
