//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work with different
//! backends (CSV files today, a database later) without modification. All
//! operations are synchronous; repositories are cheap to clone and safe to
//! share.

use anyhow::Result;

use crate::backend::domain::models::flock::Flock;
use crate::backend::domain::models::laying::LayingRecord;
use crate::backend::domain::models::record::DailyRecord;
use crate::backend::domain::models::session::LoginAttempt;

/// Interface for flock storage operations.
pub trait FlockStore: Send + Sync {
    /// Store a new flock.
    fn store_flock(&self, flock: &Flock) -> Result<()>;

    /// Retrieve a flock by ID.
    fn get_flock(&self, flock_id: &str) -> Result<Option<Flock>>;

    /// Retrieve a flock by its slug.
    fn get_flock_by_slug(&self, slug: &str) -> Result<Option<Flock>>;

    /// List all flocks ordered by name.
    fn list_flocks(&self) -> Result<Vec<Flock>>;

    /// Update an existing flock.
    fn update_flock(&self, flock: &Flock) -> Result<()>;

    /// Delete a flock and all of its stored records.
    /// Returns true if the flock was found and deleted.
    fn delete_flock(&self, flock_id: &str) -> Result<bool>;
}

/// Interface for daily record storage operations.
///
/// The record chain for a flock is always written as a whole: every mutation
/// (create, edit, delete) first re-derives the population chain in memory and
/// then atomically replaces the stored sequence, so a reader never observes a
/// half-reconciled chain.
pub trait RecordStore: Send + Sync {
    /// List a flock's records in chronological order (oldest first).
    fn list_records(&self, flock_slug: &str) -> Result<Vec<DailyRecord>>;

    /// Retrieve a specific record by ID.
    fn get_record(&self, flock_slug: &str, record_id: &str) -> Result<Option<DailyRecord>>;

    /// Atomically replace a flock's whole record sequence.
    fn replace_records(&self, flock_slug: &str, records: &[DailyRecord]) -> Result<()>;
}

/// Interface for egg-production record storage. Laying records are
/// append-only.
pub trait LayingStore: Send + Sync {
    /// List a flock's laying records in chronological order (oldest first).
    fn list_laying_records(&self, flock_slug: &str) -> Result<Vec<LayingRecord>>;

    /// Append a new laying record.
    fn store_laying_record(&self, flock_slug: &str, record: &LayingRecord) -> Result<()>;
}

/// Interface for recording sign-in attempts.
pub trait LoginAttemptStore: Send + Sync {
    /// Record a sign-in attempt. Returns the attempt id.
    fn record_attempt(&self, username: &str, success: bool) -> Result<i64>;

    /// Get recent attempts, most recent first, with an optional limit.
    fn list_attempts(&self, limit: Option<u32>) -> Result<Vec<LoginAttempt>>;
}
