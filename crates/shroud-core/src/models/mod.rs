pub mod session;
pub mod upload;

pub use session::{AccessGrant, Credentials, Profile, RegistrationRequest, Session};
pub use upload::{JobId, JobStatus, ProcessedImage, SourceFile, UploadJob};
