use async_trait::async_trait;
use tracing::{debug, error};

use crate::database::{get_db_pool, DatabasePool};
use crate::models::reading::{CreateReadingRequest, Reading};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for readings
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ReadingRepositoryTrait: Send + Sync {
    /// Create a new reading from a request
    async fn create(&self, request: CreateReadingRequest) -> Result<Reading, RepositoryError>;

    /// Create several readings at once; either all of them are stored or none
    async fn create_many(&self, requests: Vec<CreateReadingRequest>) -> Result<Vec<Reading>, RepositoryError>;

    /// Replace an existing reading
    async fn update(&self, id: i64, request: CreateReadingRequest) -> Result<Reading, RepositoryError>;

    /// Delete a reading
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Get all readings, newest first
    async fn get_all(&self) -> Result<Vec<Reading>, RepositoryError>;

    /// Get a reading by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Reading>, RepositoryError>;
}

/// Repository for readings.
/// Uses the SQLite pool when one is available and in-memory storage only when
/// no pool has been initialized. Database failures are returned, never hidden
/// behind the in-memory store, since its ids would collide with stored ones.
#[derive(Debug, Clone, Default)]
pub struct ReadingRepository {
    /// Pool used instead of the global one
    pool: Option<DatabasePool>,
    /// In-memory storage for when database is not available
    storage: InMemoryStorage,
}

impl ReadingRepository {
    /// Create a new repository over the global pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository bound to a specific pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            pool: Some(pool),
            storage: InMemoryStorage::new(),
        }
    }

    fn database(&self) -> Option<DatabasePool> {
        if let Some(pool) = &self.pool {
            return Some(pool.clone());
        }

        match get_db_pool() {
            Ok(pool) => Some(pool),
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                None
            }
        }
    }
}

fn log_failure<T>(action: &str, result: Result<T, RepositoryError>) -> Result<T, RepositoryError> {
    match &result {
        Err(RepositoryError::NotFound(_)) | Ok(_) => {}
        Err(e) => error!("Failed to {} in database: {}", action, e),
    }
    result
}

#[async_trait]
impl ReadingRepositoryTrait for ReadingRepository {
    async fn create(&self, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Storing reading in database for {} {}", request.date, request.time);
                log_failure("store reading", DatabaseStorage::insert(&pool, request).await)
            }
            None => self.storage.insert(request).await,
        }
    }

    async fn create_many(&self, requests: Vec<CreateReadingRequest>) -> Result<Vec<Reading>, RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Storing {} readings in database", requests.len());
                log_failure("store readings", DatabaseStorage::insert_many(&pool, requests).await)
            }
            None => self.storage.insert_many(requests).await,
        }
    }

    async fn update(&self, id: i64, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Updating reading in database: {}", id);
                log_failure("update reading", DatabaseStorage::update(&pool, id, request).await)
            }
            None => self.storage.update(id, request).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Deleting reading from database: {}", id);
                log_failure("delete reading", DatabaseStorage::delete(&pool, id).await)
            }
            None => self.storage.delete(id).await,
        }
    }

    async fn get_all(&self) -> Result<Vec<Reading>, RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Getting all readings from database");
                log_failure("get readings", DatabaseStorage::get_all(&pool).await)
            }
            None => self.storage.get_all().await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Reading>, RepositoryError> {
        match self.database() {
            Some(pool) => {
                debug!("Getting reading by ID from database: {}", id);
                log_failure("get reading by ID", DatabaseStorage::get_by_id(&pool, id).await)
            }
            None => self.storage.get_by_id(id).await,
        }
    }
}

/// Hand-written repository double for service and handler tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use std::sync::RwLock;

    use super::*;
    use crate::database::DatabaseError;
    use crate::models::reading::sort_newest_first;

    /// Mock implementation of the reading repository backed by a vector
    #[derive(Debug, Default)]
    pub struct MockReadingRepository {
        readings: RwLock<Vec<Reading>>,
        fail: bool,
    }

    impl MockReadingRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined readings
        pub fn with_readings(readings: Vec<Reading>) -> Self {
            Self {
                readings: RwLock::new(readings),
                fail: false,
            }
        }

        /// Create a mock repository whose every call fails with a database error
        pub fn failing() -> Self {
            Self {
                readings: RwLock::new(Vec::new()),
                fail: true,
            }
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.fail {
                Err(RepositoryError::Database(DatabaseError::GenericError(
                    "mock repository failure".to_string(),
                )))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ReadingRepositoryTrait for MockReadingRepository {
        async fn create(&self, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
            self.check()?;
            let mut readings = self.readings.write()?;
            let id = readings.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let reading = request.into_reading(id);
            readings.push(reading.clone());
            Ok(reading)
        }

        async fn create_many(&self, requests: Vec<CreateReadingRequest>) -> Result<Vec<Reading>, RepositoryError> {
            self.check()?;
            let mut readings = self.readings.write()?;
            let first_id = readings.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let created: Vec<Reading> = requests
                .into_iter()
                .zip(first_id..)
                .map(|(request, id)| request.into_reading(id))
                .collect();
            readings.extend(created.iter().cloned());
            Ok(created)
        }

        async fn update(&self, id: i64, request: CreateReadingRequest) -> Result<Reading, RepositoryError> {
            self.check()?;
            let mut readings = self.readings.write()?;
            let slot = readings
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
            *slot = request.into_reading(id);
            Ok(slot.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            self.check()?;
            let mut readings = self.readings.write()?;
            let before = readings.len();
            readings.retain(|r| r.id != id);
            if readings.len() == before {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Ok(())
        }

        async fn get_all(&self) -> Result<Vec<Reading>, RepositoryError> {
            self.check()?;
            let mut readings = self.readings.read()?.clone();
            sort_newest_first(&mut readings);
            Ok(readings)
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<Reading>, RepositoryError> {
            self.check()?;
            let readings = self.readings.read()?;
            Ok(readings.iter().find(|r| r.id == id).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_in_memory_pool, DatabaseConfig};

    fn request(date: &str) -> CreateReadingRequest {
        CreateReadingRequest {
            date: date.to_string(),
            time: "09:15".to_string(),
            period: None,
            systolic: Some(118),
            diastolic: Some(76),
            pulse: Some(64),
            oxygen: Some(98),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_repository_falls_back_to_memory_without_pool() {
        let repository = ReadingRepository::new();

        let created = repository.create(request("2024-05-01")).await.unwrap();
        let fetched = repository.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));

        repository.delete(created.id).await.unwrap();
        assert!(repository.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_failures_are_not_redirected_to_memory() {
        let pool = create_in_memory_pool(&DatabaseConfig::default()).unwrap();
        pool.connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_marked BEFORE INSERT ON readings
                 WHEN NEW.notes = 'reject'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();
        let repository = ReadingRepository::with_pool(pool);

        let first = repository.create(request("2024-05-01")).await.unwrap();

        let mut rejected = request("2024-05-02");
        rejected.notes = Some("reject".to_string());
        let result = repository.create(rejected).await;
        assert!(matches!(result, Err(RepositoryError::Sqlite(_))));

        let all = repository.get_all().await.unwrap();
        assert_eq!(all, vec![first.clone()]);
        assert_eq!(repository.get_by_id(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_create_many_with_pool() {
        let pool = create_in_memory_pool(&DatabaseConfig::default()).unwrap();
        let repository = ReadingRepository::with_pool(pool);

        let created = repository
            .create_many(vec![request("2024-05-01"), request("2024-05-02")])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(repository.get_all().await.unwrap()[0].id, created[1].id);
    }

    #[tokio::test]
    async fn test_mock_repository_crud() {
        let repository = mock::MockReadingRepository::new();

        let first = repository.create(request("2024-05-01")).await.unwrap();
        let second = repository.create(request("2024-05-02")).await.unwrap();
        assert_eq!(second.id, first.id + 1);

        let all = repository.get_all().await.unwrap();
        assert_eq!(all[0].id, second.id);

        let mut changed = request("2024-05-03");
        changed.pulse = Some(90);
        let updated = repository.update(first.id, changed).await.unwrap();
        assert_eq!(updated.pulse, Some(90));

        assert!(matches!(
            repository.delete(99).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_mock_repository() {
        let repository = mock::MockReadingRepository::failing();
        assert!(matches!(
            repository.get_all().await,
            Err(RepositoryError::Database(_))
        ));
    }
}
