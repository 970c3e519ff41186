//! Domain entities and pure rules for QRing.
//!
//! Nothing in here performs I/O or holds hidden state: every function returns
//! the same output for the same input.  Storage and rendering live in the
//! `qring-app` crate and depend on this module, never the other way round.

pub mod derive;
pub mod phone;
pub mod record;
pub mod route;
pub mod validation;
