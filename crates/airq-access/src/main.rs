//! Demo driver: create, grant, check, and list a permission request.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use airq_access::{DataSource, PermissionRegistry, RegistryConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = RegistryConfig::from_env()?;
    let mut registry = PermissionRegistry::from_config(&config)
        .with_context(|| format!("opening {}", config.storage_path.display()))?;

    let request = registry.create(
        "Yash Lunawat",
        DataSource::WorldBankApi,
        "Download PM2.5 exposure indicators for 2004-2023 analysis",
        Some("Required for country-level air quality panel"),
    )?;
    println!("Created request: {}", request.request_id);

    registry.grant(
        request.request_id.as_str(),
        "Project Lead",
        Some("Approved for academic research purposes"),
    )?;
    println!("Request {} has been granted", request.request_id);

    let has_access = registry.has_permission("Yash Lunawat", DataSource::WorldBankApi);
    println!("Yash Lunawat has World Bank API access: {has_access}");

    println!("\nAll permission requests:");
    for req in registry.list_all() {
        println!("  {}: {} - {}", req.request_id, req.data_source, req.status);
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
