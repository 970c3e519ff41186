//! The configuration record: the one entity QRing persists.
//!
//! Serialised field names are camelCase so the stored JSON document reads:
//!
//! ```json
//! {
//!   "version": 1,
//!   "contactNumber": "5491112345678",
//!   "address": { "street": "Main", "number": "10", "unit": "B" },
//!   "showAddressOnLabel": true,
//!   "communicationMode": "WhatsApp"
//! }
//! ```
//!
//! The `version` key belongs to the storage envelope, not to this struct.
//!
//! # Serde default values
//!
//! `showAddressOnLabel` and `communicationMode` fall back to `true` and
//! `DirectCall` when absent, so every record that parses has every field.

use serde::{Deserialize, Serialize};

use super::phone::DialingPlan;

/// Fixed key under which the single configuration blob is stored.
pub const CONFIG_STORAGE_KEY: &str = "@QRing_WS:config";

/// Schema version written into every stored document.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// What happens when a visitor scans the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommunicationMode {
    /// Start a regular phone call (`tel:` URI).
    #[default]
    DirectCall,
    /// Open a WhatsApp chat (`https://wa.me/` deep link).
    WhatsApp,
}

impl CommunicationMode {
    /// Short lowercase name used by the CLI and the UI bridge.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectCall => "call",
            Self::WhatsApp => "whatsapp",
        }
    }

    /// Parses the short name produced by [`CommunicationMode::as_str`].
    ///
    /// Matching is case-insensitive; unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "call" | "directcall" | "tel" => Some(Self::DirectCall),
            "whatsapp" | "wa" => Some(Self::WhatsApp),
            _ => None,
        }
    }
}

/// Street address printed under the QR code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    /// House number (the "altura" in Argentine addresses).
    pub number: String,
    /// Apartment or unit designation, e.g. `"4B"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Address {
    /// Returns `true` when both street and house number are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.street.trim().is_empty() && !self.number.trim().is_empty()
    }

    /// Unit designation, if present and non-blank.
    pub fn unit(&self) -> Option<&str> {
        self.unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// The single persisted configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    /// Contact number in normalized international form (digits only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default = "default_true")]
    pub show_address_on_label: bool,
    #[serde(default)]
    pub communication_mode: CommunicationMode,
}

fn default_true() -> bool {
    true
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            contact_number: None,
            address: None,
            show_address_on_label: default_true(),
            communication_mode: CommunicationMode::default(),
        }
    }
}

impl ConfigRecord {
    /// The configured contact number, or `None` when absent or empty.
    pub fn contact(&self) -> Option<&str> {
        self.contact_number.as_deref().filter(|n| !n.is_empty())
    }

    /// Builds a record from validated form input.
    ///
    /// The contact number is normalized with `plan`; an empty result is stored
    /// as `None`.  Street, number and unit are trimmed, and a blank unit
    /// becomes `None`.  A form with neither street nor number yields no
    /// address at all.
    pub fn from_form(
        form: &ConfigForm,
        plan: &DialingPlan,
        communication_mode: CommunicationMode,
        show_address_on_label: bool,
    ) -> Self {
        let normalized = plan.normalize(&form.contact_number);
        let street = form.street.trim().to_string();
        let number = form.number.trim().to_string();
        let unit = Some(form.unit.trim().to_string()).filter(|u| !u.is_empty());

        let address = if street.is_empty() && number.is_empty() && unit.is_none() {
            None
        } else {
            Some(Address {
                street,
                number,
                unit,
            })
        };

        Self {
            contact_number: Some(normalized).filter(|n| !n.is_empty()),
            address,
            show_address_on_label,
            communication_mode,
        }
    }
}

/// Raw, user-typed configuration input, before validation and normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigForm {
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub unit: String,
}

impl ConfigForm {
    /// Pre-fills a form from an existing record so the user edits in place.
    pub fn from_record(record: &ConfigRecord) -> Self {
        let address = record.address.clone().unwrap_or_default();
        Self {
            contact_number: record.contact_number.clone().unwrap_or_default(),
            street: address.street,
            number: address.number,
            unit: address.unit.unwrap_or_default(),
        }
    }
}
