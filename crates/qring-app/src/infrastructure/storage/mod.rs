//! Storage infrastructure: [`BlobStorage`] backends.
//!
//! - `file` keeps one JSON file per key inside a data directory.  This is the
//!   backend the CLI uses.
//! - `memory` keeps blobs in a map.  Used by tests and by hosts that provide
//!   their own persistence and only need a cache.
//!
//! [`BlobStorage`]: crate::application::config_store::BlobStorage

pub mod file;
pub mod memory;

pub use file::FileBlobStorage;
pub use memory::InMemoryBlobStorage;
