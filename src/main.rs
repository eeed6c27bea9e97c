use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use reputex::analysis::ReputationService;
use reputex::api::{ChainDataClient, CoinGeckoClient, ExplorerClient, GeminiClient};
use reputex::config::{Config, StoreBackend};
use reputex::scoring::Normalizer;
use reputex::solana::SolanaClient;
use reputex::storage::{AssessmentStore, JsonStore, SledStore};
use reputex::web::{self, AppState};

async fn open_store(config: &Config) -> Result<Arc<dyn AssessmentStore>> {
    let store: Arc<dyn AssessmentStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(JsonStore::in_memory().with_history_cap(config.history_retention)),
        StoreBackend::Json => {
            let path = config.store_path.clone().context("STORE_PATH missing for json store")?;
            let store = JsonStore::with_path(path).with_history_cap(config.history_retention);
            store.load().await?;
            Arc::new(store)
        }
        StoreBackend::Sled => {
            let path = config.store_path.clone().context("STORE_PATH missing for sled store")?;
            Arc::new(SledStore::open(path)?)
        }
    };
    Ok(store)
}

fn chain_client(config: &Config) -> ChainDataClient {
    let mut chain = ChainDataClient::new(CoinGeckoClient::new(&config.coingecko_api_url));
    for explorer in &config.explorers {
        info!("Explorer configured for {}", explorer.network.display_name());
        chain = chain.with_explorer(explorer.network, ExplorerClient::new(&explorer.api_url, &explorer.api_key));
    }
    match &config.solana_rpc_url {
        Some(url) => chain = chain.with_solana(SolanaClient::new(url)),
        None => warn!("SOLANA_RPC_URL not set, Solana addresses will not be enriched"),
    }
    chain
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Arc::new(Config::load()?);
    info!("Configuration loaded successfully");

    let store = open_store(&config).await?;
    info!("Assessment store ready ({:?})", config.store_backend);

    let chain = Arc::new(chain_client(&config));
    let model = Arc::new(GeminiClient::new(
        &config.gemini_api_url,
        &config.gemini_api_key,
        &config.gemini_model,
    ));

    let normalizer = match config.score_fallback_fill {
        Some(fill) => Normalizer::with_fallback_fill(fill),
        None => Normalizer::new(),
    };

    let service = ReputationService::new(store, chain.clone(), chain, model)
        .with_thresholds(config.thresholds)
        .with_normalizer(normalizer)
        .with_history_limit(config.history_limit);

    info!("Starting ReputexAI API...");
    web::server::start_server(AppState::new(Arc::new(service), config)).await?;

    Ok(())
}
