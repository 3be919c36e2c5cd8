//! Storage module for the sync marker and the cached directory payload
//!
//! Everything durable lives in one local directory; the remote server stays
//! the source of truth and this cache only saves a download on restart.

mod local;

pub use local::{LocalStore, StoreError};
