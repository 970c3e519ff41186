//! Derived values shown on the label: the QR action URI and the address line.
//!
//! [`PayloadDeriver`] bundles the dialing plan and the two placeholders so
//! settings can override them; the free functions use the defaults.
//!
//! # Address visibility contract
//!
//! [`PayloadDeriver::format_address_display`] checks
//! `record.show_address_on_label` itself and returns an empty string when the
//! flag is off.  Callers never gate the call.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::phone::DialingPlan;
use super::record::{CommunicationMode, ConfigRecord};

/// URI encoded into the QR code when no contact number is configured.
pub const DEFAULT_FALLBACK_URI: &str = "https://qring.app";

/// Address line shown when no usable address is configured.
pub const DEFAULT_ADDRESS_PLACEHOLDER: &str = "address not configured";

/// Pure derivations from a [`ConfigRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadDeriver {
    pub plan: DialingPlan,
    pub fallback_uri: String,
    pub address_placeholder: String,
}

impl Default for PayloadDeriver {
    fn default() -> Self {
        Self {
            plan: DialingPlan::default(),
            fallback_uri: DEFAULT_FALLBACK_URI.to_string(),
            address_placeholder: DEFAULT_ADDRESS_PLACEHOLDER.to_string(),
        }
    }
}

impl PayloadDeriver {
    pub fn new(plan: DialingPlan, fallback_uri: String, address_placeholder: String) -> Self {
        Self {
            plan,
            fallback_uri,
            address_placeholder,
        }
    }

    /// Stored contact number, or `None` when nothing is configured.
    ///
    /// Numbers are normalized once, when the form is saved; the stored value
    /// is used as-is so a later change of dialing plan cannot re-prefix it.
    pub fn contact_identifier(&self, record: &ConfigRecord) -> Option<String> {
        record.contact().map(str::to_string)
    }

    /// URI the QR code points at.
    ///
    /// - `DirectCall` → `tel:+5491112345678`
    /// - `WhatsApp`   → `https://wa.me/5491112345678`
    /// - no number    → the fallback URI
    pub fn derive_action_uri(&self, record: &ConfigRecord) -> String {
        let Some(number) = self.contact_identifier(record) else {
            trace!("no contact number configured, using fallback URI");
            return self.fallback_uri.clone();
        };

        match record.communication_mode {
            CommunicationMode::DirectCall => format!("tel:+{number}"),
            CommunicationMode::WhatsApp => format!("https://wa.me/{number}"),
        }
    }

    /// Address line printed under the QR code.
    ///
    /// Empty when `show_address_on_label` is off; the placeholder when the
    /// address is absent or has neither street nor number.
    pub fn format_address_display(&self, record: &ConfigRecord) -> String {
        if !record.show_address_on_label {
            return String::new();
        }

        let Some(address) = record.address.as_ref() else {
            return self.address_placeholder.clone();
        };

        let street = address.street.trim();
        let number = address.number.trim();
        if street.is_empty() && number.is_empty() {
            return self.address_placeholder.clone();
        }

        let mut line = [street, number]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(unit) = address.unit() {
            line.push_str(" - ");
            line.push_str(unit);
        }
        line
    }
}

/// [`PayloadDeriver::derive_action_uri`] with default settings.
pub fn derive_action_uri(record: &ConfigRecord) -> String {
    PayloadDeriver::default().derive_action_uri(record)
}

/// [`PayloadDeriver::format_address_display`] with default settings.
pub fn format_address_display(record: &ConfigRecord) -> String {
    PayloadDeriver::default().format_address_display(record)
}
