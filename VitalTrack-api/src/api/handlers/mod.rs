pub mod health;
pub mod readings;
pub mod reports;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use readings::{
    average_takes, create_reading, delete_reading, get_reading, get_reading_history, update_reading,
};
pub use reports::{backup, export_csv, get_dashboard, get_report, get_thresholds, restore};
