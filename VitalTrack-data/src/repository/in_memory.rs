use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::models::reading::{sort_newest_first, CreateReadingRequest, Reading};
use super::errors::RepositoryError;

#[derive(Debug, Default)]
struct Inner {
    readings: BTreeMap<i64, Reading>,
    next_id: i64,
}

/// In-memory storage used when the database is unavailable
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, assigning it the next identifier
    pub async fn insert(&self, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
        let mut store = self.inner.lock()?;
        store.next_id += 1;
        let reading = request.into_reading(store.next_id);
        store.readings.insert(reading.id, reading.clone());
        Ok(reading)
    }

    /// Insert a batch of readings under a single lock
    pub async fn insert_many(&self, requests: Vec<CreateReadingRequest>) -> Result<Vec<Reading>, RepositoryError> {
        let mut store = self.inner.lock()?;
        let first_id = store.next_id + 1;

        let readings: Vec<Reading> = requests
            .into_iter()
            .zip(first_id..)
            .map(|(request, id)| request.into_reading(id))
            .collect();

        store.next_id += readings.len() as i64;
        for reading in &readings {
            store.readings.insert(reading.id, reading.clone());
        }
        Ok(readings)
    }

    /// Replace an existing reading
    pub async fn update(&self, id: i64, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
        let mut store = self.inner.lock()?;
        match store.readings.get_mut(&id) {
            Some(existing) => {
                *existing = request.into_reading(id);
                Ok(existing.clone())
            }
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }

    /// Remove a reading
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock()?;
        store.readings
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Get all readings, newest first
    pub async fn get_all(&self) -> Result<Vec<Reading>, RepositoryError> {
        let store = self.inner.lock()?;
        let mut readings: Vec<Reading> = store.readings.values().cloned().collect();
        sort_newest_first(&mut readings);
        Ok(readings)
    }

    /// Get a reading by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Reading>, RepositoryError> {
        let store = self.inner.lock()?;
        Ok(store.readings.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: &str, time: &str) -> CreateReadingRequest {
        CreateReadingRequest {
            date: date.to_string(),
            time: time.to_string(),
            period: None,
            systolic: Some(120),
            diastolic: Some(80),
            pulse: Some(70),
            oxygen: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_never_reused() {
        let storage = InMemoryStorage::new();
        let first = storage.insert(request("2024-01-01", "08:00")).await.unwrap();
        let second = storage.insert(request("2024-01-02", "08:00")).await.unwrap();
        storage.delete(second.id).await.unwrap();
        let third = storage.insert(request("2024-01-03", "08:00")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_insert_many_continues_the_id_sequence() {
        let storage = InMemoryStorage::new();
        storage.insert(request("2024-01-01", "08:00")).await.unwrap();

        let batch = storage
            .insert_many(vec![request("2024-01-02", "08:00"), request("2024-01-03", "08:00")])
            .await
            .unwrap();
        let ids: Vec<i64> = batch.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let next = storage.insert(request("2024-01-04", "08:00")).await.unwrap();
        assert_eq!(next.id, 4);
        assert_eq!(storage.get_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_get_all_is_newest_first() {
        let storage = InMemoryStorage::new();
        storage.insert(request("2024-01-02", "07:00")).await.unwrap();
        storage.insert(request("2024-01-03", "06:00")).await.unwrap();
        storage.insert(request("2024-01-02", "21:30")).await.unwrap();

        let all = storage.get_all().await.unwrap();
        let order: Vec<(&str, &str)> = all.iter().map(|r| (r.date.as_str(), r.time.as_str())).collect();
        assert_eq!(order, vec![
            ("2024-01-03", "06:00"),
            ("2024-01-02", "21:30"),
            ("2024-01-02", "07:00"),
        ]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_reading() {
        let storage = InMemoryStorage::new();

        let update = storage.update(42, request("2024-01-01", "08:00")).await;
        assert!(matches!(update, Err(RepositoryError::NotFound(_))));

        let delete = storage.delete(42).await;
        assert!(matches!(delete, Err(RepositoryError::NotFound(_))));
    }
}
