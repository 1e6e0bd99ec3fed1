use std::env;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payroll_engine=info".into()),
        )
        .init();

    let config_dir = env::var("PAYROLL_ENGINE_CONFIG").unwrap_or_else(|_| "./config".to_string());
    let addr = env::var("PAYROLL_ENGINE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let policies = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        policies = policies.policies().len(),
        "Payroll policies loaded"
    );

    let app = create_router(AppState::new(policies));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, "Payroll engine listening");
    axum::serve(listener, app).await?;
    Ok(())
}
