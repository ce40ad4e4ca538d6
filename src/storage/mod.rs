//! Small key-value persistence for the wallet picker's bookkeeping.

mod store;
mod used_wallets;

pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use used_wallets::UsedWalletsRegistry;
