use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_readings_table(conn)?;
    create_readings_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the readings table
fn create_readings_table(conn: &Connection) -> Result<(), String> {
    info!("Creating readings table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            period TEXT,
            systolic INTEGER,
            diastolic INTEGER,
            pulse INTEGER,
            oxygen INTEGER,
            notes TEXT
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on date and time so newest-first listings stay cheap
fn create_readings_index(conn: &Connection) -> Result<(), String> {
    info!("Creating index on date, time");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_readings_date_time
        ON readings (date DESC, time DESC)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
