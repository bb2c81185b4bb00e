// VitalTrack Data
// This crate owns persistence of readings

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
