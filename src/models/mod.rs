pub mod address;
pub mod assessment;
pub mod network;
pub mod score;
pub mod token;

// Re-export commonly used types
pub use address::{AddressInfo, AddressKind};
pub use assessment::{storage_key, AssessmentRecord, HistoryEntry};
pub use network::Network;
pub use score::{ScoreSet, Verdict};
pub use token::{TokenProfile, WalletActivity};
