use crate::config::toml_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let default_directives = if verbose {
        "zbenya_site=debug,tower_http=debug,info".to_string()
    } else {
        format!("zbenya_site={},tower_http=info", config.level)
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

pub fn init_logger(config: &LoggingConfig, verbose: bool) {
    let filter = build_filter(config, verbose);

    match config.format {
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .json(), // 容器部署時方便日誌收集
                )
                .init();
        }
    }
}
