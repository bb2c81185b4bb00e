//! Domain layer health check functionality
//!
//! The reading store keeps working without a database by falling back to
//! memory, so a missing or in-memory database degrades the system instead of
//! taking it down.

use std::collections::HashMap;

use async_trait::async_trait;
use vital_track_data::database;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Health service backed by the global database pool
#[derive(Debug, Default)]
pub struct HealthService;

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        get_system_health().await
    }
}

/// Judge the database from the pool's self-description.
///
/// `None` means the pool was never initialized and readings live in memory.
pub fn evaluate_database(connection_info: Option<String>) -> HealthComponent {
    match connection_info {
        Some(info) if info.contains("error") => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(info),
        },
        Some(info) if info.contains("in-memory") => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(format!("{}; readings are not persisted", info)),
        },
        Some(info) if info.contains("healthy") => HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(info),
        },
        Some(info) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(info),
        },
        None => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Database pool not initialized; using in-memory storage".to_string()),
        },
    }
}

/// Check if the database is available and persisting readings
///
/// Returns:
/// - Ok(true) if the database is fully operational
/// - Ok(false) if readings are only kept in memory
/// - Err if the database is unreachable
pub async fn check_database_status() -> Result<bool, String> {
    let component = evaluate_database(database::get_connection_info());
    match component.status {
        ComponentStatus::Healthy => Ok(true),
        ComponentStatus::Degraded => Ok(false),
        ComponentStatus::Unhealthy => Err(component
            .details
            .unwrap_or_else(|| "Database connection error".to_string())),
    }
}

/// Overall status is the worst component status
fn overall_status(components: &HashMap<String, HealthComponent>) -> SystemStatus {
    let statuses = components.values().map(|c| c.status);
    let mut overall = SystemStatus::Healthy;
    for status in statuses {
        match status {
            ComponentStatus::Unhealthy => return SystemStatus::Unhealthy,
            ComponentStatus::Degraded => overall = SystemStatus::Degraded,
            ComponentStatus::Healthy => {}
        }
    }
    overall
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let database = evaluate_database(database::get_connection_info());

    let components: HashMap<String, HealthComponent> =
        vec![("database".to_string(), database)].into_iter().collect();

    SystemHealth {
        status: overall_status(&components),
        components,
    }
}
