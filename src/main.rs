use clap::Parser;
use iris_serve::app::{load_state, serve};
use iris_serve::utils::error::{ErrorCategory, ServeError};
use iris_serve::utils::{logger, validation::Validate};
use iris_serve::ServeArgs;

fn exit_with(e: &ServeError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.category() {
        ErrorCategory::Model => 2,
        _ => 1,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServeArgs::parse();

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(args.verbose);
            exit_with(&e);
        }
    };

    // 初始化日誌
    logger::init_logger(config.logging.verbose, config.logging.json);

    tracing::info!("Starting iris-serve {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Service config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let state = match load_state(&config).await {
        Ok(state) => state,
        Err(e) => exit_with(&e),
    };
    tracing::info!("✅ Models loaded from {}", config.models.dir.display());

    if let Err(e) = serve(&config, state).await {
        exit_with(&e);
    }

    Ok(())
}
