//! Embedded container app store.
//!
//! Backed by [redb](https://docs.rs/redb), holds the container apps whose
//! scale templates the wizards read and rewrite. It is the local stand-in
//! for the remote management API.
//!
//! # Architecture
//!
//! Container apps are JSON-serialized into redb's `&[u8]` value column,
//! keyed by `{resource_group}/{name}`. Every mutation is a read-modify-write
//! inside one write transaction, so a rule update either lands whole or not
//! at all.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use store::StateStore;
