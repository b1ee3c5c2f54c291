//! # CSV Storage Module
//!
//! File-based storage for the flock tracker. The data directory holds a
//! `flocks.csv` index, a `login_attempts.csv` log, and one directory per
//! flock (named by slug) containing that flock's `records.csv` and, for
//! layer flocks, `laying.csv`.
//!
//! All writes go through a temp file followed by an atomic rename, so a
//! crashed write never leaves a half-written file behind. Daily record
//! sequences are always rewritten whole: population reconciliation happens
//! in memory first and the result replaces the file in one step.

pub mod connection;
pub mod flock_repository;
pub mod laying_repository;
pub mod login_attempt_repository;
pub mod record_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use flock_repository::FlockRepository;
pub use laying_repository::LayingRepository;
pub use login_attempt_repository::LoginAttemptRepository;
pub use record_repository::RecordRepository;
