mod controller;
mod display;

pub use controller::{SubmitOutcome, TransferOutcome, TransferTicket, UploadController};
pub use display::JobDisplay;
