use clap::Parser;
use std::sync::Arc;
use zbenya_site::utils::error::{ErrorSeverity, SiteError};
use zbenya_site::utils::{logger, validation::Validate};
use zbenya_site::{
    build_notifier, build_router, CliConfig, MemStorage, RouterOptions, SubmissionService,
};

fn exit_with(e: &SiteError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("🛑 Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(&config.logging, cli.verbose);

    tracing::info!("🚀 Starting website API server");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    // 建立儲存與通知
    let storage = Arc::new(MemStorage::new());
    let notifier = match build_notifier(&config.notification) {
        Ok(notifier) => notifier,
        Err(e) => exit_with(&e),
    };
    let service = Arc::new(SubmissionService::new(storage, notifier));

    let app = build_router(service, RouterOptions::from(&config.server));

    let listener = match tokio::net::TcpListener::bind(&config.server.bind).await {
        Ok(listener) => listener,
        Err(e) => exit_with(&SiteError::IoError(e)),
    };
    tracing::info!("✅ Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
