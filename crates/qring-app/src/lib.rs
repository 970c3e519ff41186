//! qring-app library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does qring-app do? (for beginners)
//!
//! `qring-core` knows how to turn a configuration record into a URI and an
//! address line.  This crate adds everything around it:
//!
//! 1. Persists the single configuration record as a JSON blob and keeps an
//!    in-memory copy consistent with it ([`application::config_store`]).
//! 2. Runs the startup decision and the edit/save flow
//!    ([`application::launch`], [`application::edit_config`]).
//! 3. Renders the label as a QR code and exports it behind a permission check
//!    ([`application::export_label`], [`infrastructure::label`]).
//! 4. Exposes all of it to a host UI as plain commands
//!    ([`infrastructure::ui_bridge`]) and to the terminal as the `qring` CLI.

/// Application layer: use cases and the capability traits they depend on.
pub mod application;

/// Infrastructure layer: storage backends, settings file, label rendering, UI bridge.
pub mod infrastructure;
