use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::reading::{CreateReadingRequest, Reading};
use super::errors::RepositoryError;

const SELECT_COLUMNS: &str =
    "SELECT id, date, time, period, systolic, diastolic, pulse, oxygen, notes FROM readings";

/// Database storage operations for readings
pub struct DatabaseStorage;

impl DatabaseStorage {
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Reading> {
        Ok(Reading {
            id: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
            period: row.get(3)?,
            systolic: row.get(4)?,
            diastolic: row.get(5)?,
            pulse: row.get(6)?,
            oxygen: row.get(7)?,
            notes: row.get(8)?,
        })
    }

    fn insert_row(conn: &Connection, request: &CreateReadingRequest) -> rusqlite::Result<i64> {
        conn.execute(
            "INSERT INTO readings (date, time, period, systolic, diastolic, pulse, oxygen, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                request.date,
                request.time,
                request.period,
                request.systolic,
                request.diastolic,
                request.pulse,
                request.oxygen,
                request.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a reading and return it with its assigned id
    pub async fn insert(pool: &DatabasePool, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
        let conn = pool.connection()?;

        let id = Self::insert_row(&conn, &request)?;
        debug!("Stored reading in database: id={}", id);
        Ok(request.into_reading(id))
    }

    /// Insert a batch of readings in one transaction; any failure rolls back the whole batch
    pub async fn insert_many(pool: &DatabasePool, requests: Vec<CreateReadingRequest>) -> Result<Vec<Reading>, RepositoryError> {
        let mut conn = pool.connection()?;
        let tx = conn.transaction()?;

        let mut readings = Vec::with_capacity(requests.len());
        for request in requests {
            let id = Self::insert_row(&tx, &request)?;
            readings.push(request.into_reading(id));
        }

        tx.commit()?;
        debug!("Stored {} readings in database", readings.len());
        Ok(readings)
    }

    /// Replace the values of an existing reading
    pub async fn update(pool: &DatabasePool, id: i64, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
        let conn = pool.connection()?;

        let changed = conn.execute(
            "UPDATE readings
             SET date = ?1, time = ?2, period = ?3, systolic = ?4, diastolic = ?5,
                 pulse = ?6, oxygen = ?7, notes = ?8
             WHERE id = ?9",
            params![
                request.date,
                request.time,
                request.period,
                request.systolic,
                request.diastolic,
                request.pulse,
                request.oxygen,
                request.notes,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        debug!("Updated reading in database: id={}", id);
        Ok(request.into_reading(id))
    }

    /// Delete a reading
    pub async fn delete(pool: &DatabasePool, id: i64) -> Result<(), RepositoryError> {
        let conn = pool.connection()?;

        let changed = conn.execute("DELETE FROM readings WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        debug!("Deleted reading from database: id={}", id);
        Ok(())
    }

    /// Get all readings, newest first
    pub async fn get_all(pool: &DatabasePool) -> Result<Vec<Reading>, RepositoryError> {
        let conn = pool.connection()?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY date DESC, time DESC, id DESC",
            SELECT_COLUMNS
        ))?;

        let readings = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} readings from database", readings.len());
        Ok(readings)
    }

    /// Get a reading by ID
    pub async fn get_by_id(pool: &DatabasePool, id: i64) -> Result<Option<Reading>, RepositoryError> {
        let conn = pool.connection()?;

        let reading = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::map_row,
            )
            .optional()?;

        Ok(reading)
    }
}
