use crate::core::forms::{ContactForm, Form, FreelanceForm, JobApplicationForm};
use crate::domain::model::{
    ContactMessage, FreelanceApplication, JobApplication, JobApplicationSummary,
};
use crate::domain::ports::{Notifier, Storage};
use crate::utils::error::Result;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Validate, store, then (contact only) notify.
///
/// Validation always runs before storage is touched, so a rejected payload
/// leaves every collection unchanged.
pub struct SubmissionService<S: Storage> {
    storage: Arc<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Storage> SubmissionService<S> {
    pub fn new(storage: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self { storage, notifier }
    }

    pub async fn submit_contact(&self, payload: &Value) -> Result<ContactMessage> {
        let form = ContactForm::parse(payload)?;
        let message = self
            .storage
            .create_contact_message(form.into_record(Utc::now()))
            .await?;
        tracing::info!(id = message.id, "📨 Stored contact message");

        // 通知失敗不影響回應，記錄即可
        match self.notifier.notify_contact(&message).await {
            Ok(()) => tracing::info!(id = message.id, "Contact notification sent"),
            Err(e) => tracing::warn!(
                id = message.id,
                error = %e,
                "Failed to send contact notification: {}",
                e.recovery_suggestion()
            ),
        }

        Ok(message)
    }

    pub async fn submit_freelance(&self, payload: &Value) -> Result<FreelanceApplication> {
        let form = FreelanceForm::parse(payload)?;
        let application = self
            .storage
            .create_freelance_application(form.into_record(Utc::now()))
            .await?;
        tracing::info!(
            id = application.id,
            application_type = ?application.application_type,
            "📝 Stored freelance application"
        );
        Ok(application)
    }

    pub async fn submit_job_application(&self, payload: &Value) -> Result<JobApplicationSummary> {
        let form = JobApplicationForm::parse(payload)?;
        let has_cover_letter = form.cover_letter_file.is_some();
        let application = self
            .storage
            .create_job_application(form.into_record(Utc::now()))
            .await?;
        tracing::info!(
            id = application.id,
            position = %application.position,
            has_cover_letter,
            "📎 Stored job application"
        );
        Ok(application.summary())
    }

    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>> {
        self.storage.list_contact_messages().await
    }

    pub async fn freelance_applications(&self) -> Result<Vec<FreelanceApplication>> {
        self.storage.list_freelance_applications().await
    }

    /// Listing with file bodies redacted.
    pub async fn job_applications(&self) -> Result<Vec<JobApplication>> {
        let applications = self.storage.list_job_applications().await?;
        Ok(applications.iter().map(JobApplication::redacted).collect())
    }
}
