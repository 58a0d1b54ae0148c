//! Row store integration tests
//!
//! In-memory tests always run. SQL tests use an in-memory or file-backed
//! SQLite database and need the `sqlite` feature.

mod in_memory;
