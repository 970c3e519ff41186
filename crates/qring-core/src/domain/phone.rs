//! Contact-number normalization.
//!
//! WhatsApp deep links and `tel:` URIs both need the number in full
//! international form without punctuation.  Users type numbers every way
//! imaginable (`011 15-1234-5678`, `+54 9 11 ...`, `91112345678`), so the
//! [`DialingPlan`] reduces every input to digits and then fixes up the prefix.
//!
//! # Prefix rules
//!
//! With the default plan (country code `54`, mobile indicator `9`) the first
//! matching rule wins:
//!
//! | Input digits start with | Action                          | Example                        |
//! |-------------------------|---------------------------------|--------------------------------|
//! | `549`                   | unchanged                       | `5491112345678` → same         |
//! | `54`                    | insert `9` after the `54`       | `541112345678` → `5491112345678` |
//! | `9`                     | prepend `54`                    | `91112345678` → `5491112345678` |
//! | anything else           | prepend `549`                   | `1112345678` → `5491112345678` |
//!
//! Every output of the last three rules starts with `549`, so normalizing an
//! already-normalized number is a no-op.

use serde::{Deserialize, Serialize};

/// Minimum number of digits a contact number must have to be accepted.
pub const DEFAULT_MIN_DIGITS: usize = 10;

/// Country and mobile prefixes used to normalize contact numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialingPlan {
    /// International country calling code, digits only (e.g. `"54"`).
    pub country_code: String,
    /// Digit inserted after the country code for mobile lines (e.g. `"9"`).
    pub mobile_indicator: String,
    /// Minimum digit count accepted by validation.
    pub min_digits: usize,
}

impl Default for DialingPlan {
    fn default() -> Self {
        Self {
            country_code: "54".to_string(),
            mobile_indicator: "9".to_string(),
            min_digits: DEFAULT_MIN_DIGITS,
        }
    }
}

impl DialingPlan {
    /// The full prefix every normalized number starts with (`"549"`).
    pub fn full_prefix(&self) -> String {
        format!("{}{}", self.country_code, self.mobile_indicator)
    }

    /// Normalizes `raw` into international mobile form.
    ///
    /// Returns an empty string when `raw` contains no digits; callers treat
    /// that as "not configured".
    pub fn normalize(&self, raw: &str) -> String {
        let digits = strip_non_digits(raw);
        if digits.is_empty() {
            return digits;
        }

        let full_prefix = self.full_prefix();
        if digits.starts_with(&full_prefix) {
            digits
        } else if let Some(rest) = digits.strip_prefix(self.country_code.as_str()) {
            format!("{full_prefix}{rest}")
        } else if digits.starts_with(self.mobile_indicator.as_str()) {
            format!("{}{digits}", self.country_code)
        } else {
            format!("{full_prefix}{digits}")
        }
    }
}

/// Removes every character that is not an ASCII digit.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes `raw` with the default (Argentine) dialing plan.
///
/// `91112345678` becomes `5491112345678` (the `9` rule prepends only `54`),
/// not `54911112345678`; keeping every output on the `549` prefix is what
/// makes normalization idempotent.  See [`DialingPlan::normalize`].
pub fn normalize_phone_number(raw: &str) -> String {
    DialingPlan::default().normalize(raw)
}
