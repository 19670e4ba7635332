use crate::domain::model::{
    ContactMessage, FreelanceApplication, JobApplication, NewContactMessage,
    NewFreelanceApplication, NewJobApplication, NewUser, RecordId, User,
};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SiteError};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// One entity collection: its id counter and records live under the same lock.
#[derive(Debug)]
struct Collection<T> {
    next_id: RecordId,
    records: BTreeMap<RecordId, T>,
}

impl<T: Clone> Collection<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(RecordId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let record = build(id);
        self.records.insert(id, record.clone());
        record
    }

    fn get(&self, id: RecordId) -> Option<T> {
        self.records.get(&id).cloned()
    }

    /// Ids only grow, so key order is insertion order.
    fn all(&self) -> Vec<T> {
        self.records.values().cloned().collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Process-lifetime storage. Nothing survives a restart.
#[derive(Debug)]
pub struct MemStorage {
    users: RwLock<Collection<User>>,
    contact_messages: RwLock<Collection<ContactMessage>>,
    freelance_applications: RwLock<Collection<FreelanceApplication>>,
    job_applications: RwLock<Collection<JobApplication>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Collection::new()),
            contact_messages: RwLock::new(Collection::new()),
            freelance_applications: RwLock::new(Collection::new()),
            job_applications: RwLock::new(Collection::new()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    async fn get_user(&self, id: RecordId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .records
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.records.values().any(|u| u.username == user.username) {
            return Err(SiteError::DuplicateUsername {
                username: user.username,
            });
        }

        let created = users.insert_with(|id| User {
            id,
            username: user.username,
            password: user.password,
        });
        tracing::debug!(id = created.id, "Created user");
        Ok(created)
    }

    async fn create_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage> {
        let created = self
            .contact_messages
            .write()
            .await
            .insert_with(|id| ContactMessage {
                id,
                name: message.name,
                email: message.email,
                subject: message.subject,
                message: message.message,
                created_at: message.created_at,
            });
        Ok(created)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        Ok(self.contact_messages.read().await.all())
    }

    async fn get_contact_message(&self, id: RecordId) -> Result<Option<ContactMessage>> {
        Ok(self.contact_messages.read().await.get(id))
    }

    async fn create_freelance_application(
        &self,
        application: NewFreelanceApplication,
    ) -> Result<FreelanceApplication> {
        let created = self
            .freelance_applications
            .write()
            .await
            .insert_with(|id| FreelanceApplication {
                id,
                name: application.name,
                email: application.email,
                phone: application.phone,
                specialty: application.specialty,
                experience_years: application.experience_years,
                skills: application.skills,
                portfolio_url: non_empty(application.portfolio_url),
                linkedin_url: non_empty(application.linkedin_url),
                message: application.message,
                application_type: application.application_type,
                company_name: non_empty(application.company_name),
                created_at: application.created_at,
            });
        Ok(created)
    }

    async fn list_freelance_applications(&self) -> Result<Vec<FreelanceApplication>> {
        Ok(self.freelance_applications.read().await.all())
    }

    async fn get_freelance_application(&self, id: RecordId) -> Result<Option<FreelanceApplication>> {
        Ok(self.freelance_applications.read().await.get(id))
    }

    async fn create_job_application(
        &self,
        application: NewJobApplication,
    ) -> Result<JobApplication> {
        let created = self
            .job_applications
            .write()
            .await
            .insert_with(|id| JobApplication {
                id,
                name: application.name,
                email: application.email,
                phone: application.phone,
                position: application.position,
                cv_file_name: application.cv_file_name,
                cv_file_content: application.cv_file_content,
                cover_letter_file_name: non_empty(application.cover_letter_file_name),
                cover_letter_file_content: non_empty(application.cover_letter_file_content),
                message: non_empty(application.message),
                created_at: application.created_at,
            });
        Ok(created)
    }

    async fn list_job_applications(&self) -> Result<Vec<JobApplication>> {
        Ok(self.job_applications.read().await.all())
    }

    async fn get_job_application(&self, id: RecordId) -> Result<Option<JobApplication>> {
        Ok(self.job_applications.read().await.get(id))
    }
}
