//! Storage layer: trait seams plus the CSV implementation.

pub mod csv;
pub mod traits;

pub use traits::{FlockStore, LayingStore, LoginAttemptStore, RecordStore};
