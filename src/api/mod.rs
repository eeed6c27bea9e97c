pub mod chain;
pub mod coingecko;
pub mod explorer;
pub mod gemini;

pub use chain::ChainDataClient;
pub use coingecko::{CoinGeckoClient, COINGECKO_BASE_URL};
pub use explorer::ExplorerClient;
pub use gemini::{GeminiClient, GEMINI_BASE_URL};
