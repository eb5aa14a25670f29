//! # Canvasboard I/O
//!
//! Local persistence for the editor: a small key-value storage abstraction
//! (in-memory or one JSON file per key) and the adapter that stores the shape
//! list and flow diagram in it, falling back to defaults on missing or
//! malformed data.

pub mod storage;
pub mod persistence;

pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistenceError};
pub use persistence::{Persistence, FLOW_KEY, SHAPES_KEY};
