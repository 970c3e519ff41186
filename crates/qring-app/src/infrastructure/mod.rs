//! Infrastructure layer for QRing.
//!
//! Contains the adapters the application layer's traits are implemented by:
//! blob storage backends, the settings file, QR rendering and label export,
//! and the command bridge a host UI calls into.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `qring_core`, but MUST NOT be imported by the `application` or domain layers.

pub mod label;
pub mod settings;
pub mod storage;
pub mod ui_bridge;
