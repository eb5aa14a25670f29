//! # Canvasboard Sync
//!
//! One-shot load/save of the shape list against the shapes API. Without a
//! configured endpoint the client answers from a built-in dataset after a
//! short simulated delay, so the editor works with no backend running.

pub mod client;
pub mod config;
pub mod error;

pub use client::{Ack, SyncClient};
pub use config::SyncConfig;
pub use error::SyncError;
