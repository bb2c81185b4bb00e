// Storage models
pub mod reading;

pub use reading::{CreateReadingRequest, Reading};
