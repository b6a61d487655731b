pub mod classifier;
pub mod settlement;
pub mod types;
pub mod wheel;

pub use classifier::classify;
pub use settlement::{settle, RoundSettlement};
pub use types::*;
