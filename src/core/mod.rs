pub mod forms;
pub mod storage;
pub mod submission;

pub use crate::domain::model::{
    ContactMessage, FreelanceApplication, JobApplication, JobApplicationSummary,
};
pub use crate::domain::ports::{Notifier, Storage};
pub use crate::utils::error::Result;
