// VitalTrack Domain
// Classification, windowed aggregation and reporting over vital-sign readings

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use vital_track_data::database;
