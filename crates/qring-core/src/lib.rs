//! # qring-core
//!
//! Shared library for QRing containing the configuration record, the
//! contact-number dialing plan, form validation and the pure derivations that
//! turn a configuration into something a label can show.
//!
//! This crate has zero dependencies on storage, UI frameworks, or the OS.
//!
//! # Architecture overview (for beginners)
//!
//! QRing prints a "smart doorbell label": a QR code stuck next to the front
//! door.  A visitor scans it and their phone either starts a call or opens a
//! WhatsApp chat with the resident.  The resident configures a contact number
//! and an address once; everything else is derived from that record.
//!
//! - **`domain::record`** – The single persisted entity, [`ConfigRecord`], and
//!   the raw [`ConfigForm`] a user types into.
//!
//! - **`domain::phone`** – The [`DialingPlan`] that normalizes any typed phone
//!   number into international form (`549...`).
//!
//! - **`domain::validation`** – Field-level checks run before every save.
//!
//! - **`domain::derive`** – [`PayloadDeriver`]: action URI for the QR code and
//!   the address line printed under it.
//!
//! - **`domain::route`** – Which screen the user lands on at startup, and the
//!   one-shot startup state machine.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `qring_core::ConfigRecord` instead of `qring_core::domain::record::ConfigRecord`.
pub use domain::derive::{
    derive_action_uri, format_address_display, PayloadDeriver, DEFAULT_ADDRESS_PLACEHOLDER,
    DEFAULT_FALLBACK_URI,
};
pub use domain::phone::{normalize_phone_number, strip_non_digits, DialingPlan};
pub use domain::record::{
    Address, CommunicationMode, ConfigForm, ConfigRecord, CONFIG_SCHEMA_VERSION,
    CONFIG_STORAGE_KEY,
};
pub use domain::route::{decide_initial_route, InitialRoute, LaunchState, StartupError, StartupFlow};
pub use domain::validation::{validate_config, FormField, ValidationErrors};
