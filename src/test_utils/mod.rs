//! Test utilities: an in-memory stand-in for the serverless endpoint.
//!
//! Enabled with the `test-utils` feature.

pub mod memory;

pub use memory::{
    CannedResult, MemoryConnection, MemoryConnector, MemoryDatabase, MemoryStats,
    RecordedStatement, RecordingLog, UserRow,
};
