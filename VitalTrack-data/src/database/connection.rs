//! Database connection module for the VitalTrack application
//!
//! Readings live in a single SQLite database reached through an r2d2 pool.
//! When the database file cannot be opened the pool falls back to an
//! in-memory SQLite database so the application keeps serving requests.

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;
use super::DatabaseError;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Default location of the SQLite database file
pub const DEFAULT_SQLITE_PATH: &str = "data/vitaltrack.db";

/// Database connection pool
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<SqliteConnectionManager>>),
}

impl DatabasePool {
    /// Check out a connection from the pool
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, DatabaseError> {
        match self {
            DatabasePool::SQLite(pool) => pool.get().map_err(DatabaseError::PoolError),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: Some(DEFAULT_SQLITE_PATH.to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let sqlite_path = env::var("DB_SQLITE_PATH").ok();

        if let Some(ref path) = sqlite_path {
            info!("Using SQLite database at: {}", path);
        } else {
            info!("No DB_SQLITE_PATH provided, will use default path: {}", DEFAULT_SQLITE_PATH);
        }

        let max_connections = parse_env_or("DB_MAX_CONNECTIONS", 10)?;
        let timeout_seconds = parse_env_or("DB_TIMEOUT_SECONDS", 30)?;

        if max_connections == 0 {
            return Err(DatabaseError::ConfigError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        info!("Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

/// Read a numeric environment variable, falling back to a default when unset
fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, DatabaseError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            DatabaseError::ConfigError(format!("{} must be a number, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Initialize the global database connection pool from the environment
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env()?;
    let pool = create_sqlite_pool(&config)?;

    run_migrations(&pool)?;

    DB_POOL
        .set(pool)
        .map_err(|_| DatabaseError::PoolAlreadyInitialized)
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get()
        .cloned()
        .ok_or(DatabaseError::PoolNotInitialized)
}

/// Create a file-backed SQLite connection pool, falling back to memory on failure
pub fn create_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let sqlite_path = config.sqlite_path.clone()
        .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return create_in_memory_pool(config);
            }
        }
    }

    let manager = SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
    {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            return create_in_memory_pool(config);
        }
    };

    // Test connection to make sure it works
    match pool.get() {
        Ok(_) => {
            info!("SQLite connection pool created successfully");
            Ok(DatabasePool::SQLite(Arc::new(pool)))
        }
        Err(e) => {
            error!("Failed to connect to SQLite database: {}", e);
            warn!("Falling back to in-memory SQLite database");
            create_in_memory_pool(config)
        }
    }
}

/// Create an in-memory SQLite pool with the schema already applied
///
/// Every connection to `:memory:` opens a distinct database, so the pool is
/// capped at a single connection.
pub fn create_in_memory_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    let pool = DatabasePool::SQLite(Arc::new(pool));
    run_migrations(&pool)?;

    info!("In-memory SQLite database initialized successfully");
    Ok(pool)
}

/// Run database migrations against a pool
pub fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    let conn = pool.connection()?;
    run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;
    Some(describe_pool(pool))
}

/// Describe a pool's backing database and connection counts
pub fn describe_pool(pool: &DatabasePool) -> String {
    let DatabasePool::SQLite(inner) = pool;

    let conn = match inner.get() {
        Ok(conn) => conn,
        Err(e) => {
            error!("Failed to get SQLite connection: {}", e);
            return format!("SQLite connection error: {}", e);
        }
    };

    let location = match conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2)) {
        Ok(path) if path.is_empty() || path == ":memory:" => "SQLite in-memory database".to_string(),
        Ok(path) => format!("SQLite database at {}", path),
        Err(_) => "SQLite database (path unknown)".to_string(),
    };
    drop(conn);

    let state = inner.state();
    format!("{} healthy (connections: active={}, idle={})",
        location,
        state.connections,
        state.idle_connections
    )
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.sqlite_path.as_deref(), Some(DEFAULT_SQLITE_PATH));
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_in_memory_pool_has_schema() {
        let pool = create_in_memory_pool(&DatabaseConfig::default()).unwrap();
        let conn = pool.connection().unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_describe_in_memory_pool() {
        let pool = create_in_memory_pool(&DatabaseConfig::default()).unwrap();
        let info = describe_pool(&pool);

        assert!(info.contains("in-memory"), "unexpected description: {}", info);
        assert!(info.contains("healthy"));
    }

    #[test]
    fn test_get_db_pool_before_initialization() {
        // Tests never initialize the global pool
        assert!(matches!(get_db_pool(), Err(DatabaseError::PoolNotInitialized)));
    }
}
