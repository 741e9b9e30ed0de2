pub mod calculator;
pub mod constants;
pub mod contracts;
pub mod errors;
pub mod progress;
pub mod reconcile;
pub mod types;

pub use calculator::*;
pub use constants::*;
pub use types::*;
