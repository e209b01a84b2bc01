use clap::Parser;
use gateway::config::GatewayConfig;
use gateway::{create_router, AppState};
use market_data::MarketService;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Simulated coin market API
#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(about = "Serve the simulated coin market over HTTP")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind_address: String,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Fixed RNG seed for the initial market (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of synthetic coins after bitcoin, ethereum and xrp
    #[arg(long, default_value = "1997")]
    synthetic_coins: usize,
}

impl From<Args> for GatewayConfig {
    fn from(args: Args) -> Self {
        let mut config = GatewayConfig {
            bind_address: args.bind_address,
            port: args.port,
            ..GatewayConfig::default()
        };
        config.market.seed = args.seed;
        config.market.synthetic_coins = args.synthetic_coins;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,market_data=info,tower_http=info".into()),
        )
        .init();

    let config = GatewayConfig::from(Args::parse());
    tracing::info!("Starting Gateway API service");

    let state = AppState::new(MarketService::seeded(&config.market));
    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
