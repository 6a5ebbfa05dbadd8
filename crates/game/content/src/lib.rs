//! Data-driven content definitions and loaders.
//!
//! This crate reads the static balance data the character rules consult:
//! - Item types (data-driven via RON)
//! - Vocation tables (data-driven via RON)
//! - Server configuration (data-driven via TOML)
//!
//! Content is consumed through the core oracles and never appears in
//! character state. All loaders use character-core types directly with serde
//! for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, Content, ContentFactory, ItemLoader, LoadResult, VocationLoader};
