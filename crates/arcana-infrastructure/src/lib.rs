//! Infrastructure layer of the Arcana client.
//!
//! Implements the storage traits of `arcana-core` on top of the local file
//! system and resolves where configuration, data and logs live.

pub mod config_service;
pub mod kv_transcript_repository;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use kv_transcript_repository::KvTranscriptRepository;
pub use paths::{ArcanaPaths, PathError};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
