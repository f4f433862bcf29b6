//! Key-value persistence for the Skydeck dashboard.
//!
//! The hosting environment supplies the durable backend; this crate
//! defines the capability trait, two reference implementations, the
//! well-known key names, and the JSON codec with its
//! treat-failure-as-absent read policy.

pub mod codec;
pub mod keys;
pub mod store;

pub use codec::{get_json, put_json};
pub use store::{FileStore, KeyValueStore, MemoryStore};
