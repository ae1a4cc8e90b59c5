//! Local key-value storage abstraction.
//!
//! The client persists every piece of local state (auth token, cached balance,
//! transcripts, flags) in one shared key-value namespace. Each logical entity
//! uses a distinct key or key prefix; see [`keys`].

pub mod keys;
mod key_value;

pub use key_value::{KeyValueStore, KeyValueStoreExt};

#[cfg(test)]
pub(crate) use key_value::test_support;
