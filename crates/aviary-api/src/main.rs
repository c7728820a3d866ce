use aviary_core::Config;

// Use mimalloc as the global allocator for better performance and lower
// fragmentation, especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    aviary_api::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Initialize the application (stores, maintainer, routes)
    let (_state, router) = aviary_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    aviary_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
