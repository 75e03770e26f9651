//! Persisted login state and backend selection.

pub mod storage;
mod types;

pub use types::CliSession;
