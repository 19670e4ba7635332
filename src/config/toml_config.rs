use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_socket_addr, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Large enough for a 5 MiB CV plus a cover letter after base64 inflation.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;
const MIN_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Built single-page app to serve for non-API paths.
    pub static_dir: Option<String>,
    pub request_body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            static_dir: None,
            request_body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// Mail relay that accepts a JSON message and delivers it.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub sender: String,
    pub recipient: String,
    pub timeout_seconds: u64,
}

// api_key stays out of logs
impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            sender: "Website <noreply@localhost>".to_string(),
            recipient: "contact@localhost".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAIL_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.server.bind)?;

        validate_positive_number(
            "server.request_body_limit_bytes",
            self.server.request_body_limit_bytes,
            MIN_BODY_LIMIT_BYTES,
        )?;

        if let Some(dir) = &self.server.static_dir {
            validate_non_empty_string("server.static_dir", dir)?;
        }

        if self.notification.enabled {
            let endpoint = self.notification.endpoint.as_deref().unwrap_or_default();
            validate_url("notification.endpoint", endpoint)?;
            validate_non_empty_string("notification.sender", &self.notification.sender)?;
            validate_non_empty_string("notification.recipient", &self.notification.recipient)?;
            validate_positive_number(
                "notification.timeout_seconds",
                self.notification.timeout_seconds as usize,
                1,
            )?;
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(SiteError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Unsupported level. Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
