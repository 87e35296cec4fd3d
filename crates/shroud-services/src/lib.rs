//! Shroud Services Library
//!
//! Orchestration on top of the API client:
//! - `SessionManager`: acquires, holds, persists and relinquishes the bearer token
//! - `UploadController`: drives one image through validation, transfer and result
//!
//! Both are driven from a single task. The controller reads the session's token and
//! asks the session to tear down when the service rejects it; nothing else is shared.

pub mod session;
pub mod upload;

pub use session::{
    FileTokenStore, MemoryTokenStore, SessionManager, SessionState, StoreError, StoreResult,
    TokenStore,
};
pub use upload::{JobDisplay, SubmitOutcome, TransferOutcome, TransferTicket, UploadController};
