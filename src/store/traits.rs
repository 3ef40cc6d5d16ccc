//! Storage trait — the seam between HTTP handlers and the database.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::routines::Routine;

/// Async storage interface for routines.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new routine with default counters and return the stored row.
    async fn create_routine(&self, title: &str) -> Result<Routine, DatabaseError>;

    /// Fetch a routine by id, `None` when the id is unknown.
    async fn get_routine(&self, id: i64) -> Result<Option<Routine>, DatabaseError>;

    /// All routines ordered by ascending id.
    async fn list_routines(&self) -> Result<Vec<Routine>, DatabaseError>;

    /// Persist title and streak fields of an existing routine.
    async fn update_routine(&self, routine: &Routine) -> Result<(), DatabaseError>;
}
