//! Shroud Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and local
//! validation shared by the Shroud client crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{AuthError, ClientError, LogLevel, TransportError, ValidationError};
pub use models::{
    AccessGrant, Credentials, JobId, JobStatus, ProcessedImage, Profile, RegistrationRequest,
    Session, SourceFile, UploadJob,
};
