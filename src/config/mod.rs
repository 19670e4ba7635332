pub mod toml_config;

pub use toml_config::{LogFormat, LoggingConfig, NotificationConfig, ServerConfig, SiteConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "zbenya-site")]
#[command(about = "API server for the company website forms")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:5000
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory containing the built single-page app
    #[arg(long)]
    pub static_dir: Option<String>,

    /// Mail relay endpoint; enables contact notifications
    #[arg(long)]
    pub mail_endpoint: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔並套用命令列覆蓋
    pub fn resolve(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?,
            None => SiteConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
        if let Some(endpoint) = &self.mail_endpoint {
            config.notification.endpoint = Some(endpoint.clone());
            config.notification.enabled = true;
        }

        Ok(config)
    }
}
