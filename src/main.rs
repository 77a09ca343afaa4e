#[cfg(feature = "web")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use fin_agent_rs::Config;
    use tracing::info;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fin_agent_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model);

    fin_agent_rs::web::serve(config).await?;

    Ok(())
}

#[cfg(not(feature = "web"))]
fn main() {
    eprintln!("Web feature not enabled. Build with --features web");
    std::process::exit(1);
}
