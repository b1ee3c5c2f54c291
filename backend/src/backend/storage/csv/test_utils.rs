//! Shared helpers for CSV repository tests.

use tempfile::TempDir;

use super::connection::CsvConnection;

/// A connection rooted in a fresh temporary directory. Keep the `TempDir`
/// alive for the duration of the test; the directory is removed on drop.
pub fn temp_connection() -> (CsvConnection, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
    (connection, temp_dir)
}
