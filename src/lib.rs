pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SiteConfig;

pub use adapters::http::{build_router, RouterOptions};
pub use adapters::mail::build_notifier;
pub use core::{storage::MemStorage, submission::SubmissionService};
pub use utils::error::{Result, SiteError};
