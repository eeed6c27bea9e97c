pub mod client;

pub use client::SolanaClient;
