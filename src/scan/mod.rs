mod analysis;
pub mod commands;
pub mod controller;
pub mod error;
pub mod state;

pub use controller::{DismissOutcome, ScanOptions, ScanSession};
pub use error::ScanError;
pub use state::{ScanPhase, ScanSnapshot, ScanState};
