use call_relay::config::RelayConfig;
use call_relay::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Seed the environment from .env when present
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export HS_API_KEY=... API_ID=... API_TOKEN=...");
        std::process::exit(1);
    });

    eprintln!("📞 Call Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://{}/aircall/calls", config.bind_addr());
    eprintln!("   HubSpot: {}", config.hubspot.base_url);
    eprintln!("   Aircall: {}", config.aircall.base_url);
    if dotenv_loaded {
        eprintln!("   Loaded .env");
    }
    match config.http_timeout {
        Some(timeout) => eprintln!("   Outbound timeout: {}s\n", timeout.as_secs()),
        None => eprintln!("   Outbound timeout: none\n"),
    }

    server::serve(config).await?;

    Ok(())
}
