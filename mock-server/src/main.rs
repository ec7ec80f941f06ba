use envconfig::Envconfig;
use tokio::net::TcpListener;

#[derive(Envconfig, Clone, Debug)]
struct ServerConfig {
    #[envconfig(from = "PORT", default = "4000")]
    port: u16,
    #[envconfig(from = "API_KEY")]
    api_key: Option<String>,
}

fn init_log() {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_log();
    let conf = ServerConfig::init_from_env()?;
    let addr = format!("127.0.0.1:{}", conf.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    mock_server::run(listener, conf.api_key.as_deref()).await?;
    Ok(())
}
