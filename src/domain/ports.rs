use crate::domain::model::{
    ContactMessage, FreelanceApplication, JobApplication, NewContactMessage,
    NewFreelanceApplication, NewJobApplication, NewUser, RecordId, User,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// Append-only record store. Every `create_*` assigns the next id of its own
/// collection; id assignment and insertion happen as one step.
pub trait Storage: Send + Sync {
    fn get_user(&self, id: RecordId) -> impl Future<Output = Result<Option<User>>> + Send;
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send;
    fn create_user(&self, user: NewUser) -> impl Future<Output = Result<User>> + Send;

    fn create_contact_message(
        &self,
        message: NewContactMessage,
    ) -> impl Future<Output = Result<ContactMessage>> + Send;
    fn list_contact_messages(&self) -> impl Future<Output = Result<Vec<ContactMessage>>> + Send;
    fn get_contact_message(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<Option<ContactMessage>>> + Send;

    fn create_freelance_application(
        &self,
        application: NewFreelanceApplication,
    ) -> impl Future<Output = Result<FreelanceApplication>> + Send;
    fn list_freelance_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<FreelanceApplication>>> + Send;
    fn get_freelance_application(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<Option<FreelanceApplication>>> + Send;

    fn create_job_application(
        &self,
        application: NewJobApplication,
    ) -> impl Future<Output = Result<JobApplication>> + Send;
    fn list_job_applications(&self) -> impl Future<Output = Result<Vec<JobApplication>>> + Send;
    fn get_job_application(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<Option<JobApplication>>> + Send;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_contact(&self, message: &ContactMessage) -> Result<()>;
}
