mod manager;
mod token_store;

pub use manager::{SessionManager, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoreError, StoreResult, TokenStore};
