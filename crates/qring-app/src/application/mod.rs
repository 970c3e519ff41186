//! Application layer use cases for QRing.
//!
//! Use cases in this layer orchestrate domain rules from `qring-core` and
//! depend only on traits (`BlobStorage`, `DeviceCapabilities`, `LabelSink`,
//! `CodeRenderer`).  Concrete implementations live in `infrastructure` and are
//! injected at construction time.
//!
//! # Sub-modules
//!
//! - **`config_store`** – The single source of truth for the persisted
//!   configuration record, with an in-memory cache.
//!
//! - **`launch`** – Loads the store once at startup and decides the landing
//!   screen.
//!
//! - **`edit_config`** – Validates a submitted form, merges it with the
//!   current preferences and saves it.
//!
//! - **`export_label`** – Builds the printable label and hands it to the
//!   gallery after a permission check.

pub mod config_store;
pub mod edit_config;
pub mod export_label;
pub mod launch;
