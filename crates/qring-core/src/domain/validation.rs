//! Form validation run before every save attempt.
//!
//! Validation never fails with an error: it returns a [`ValidationErrors`]
//! map from field to message, and an empty map means the form can be saved.
//! The UI keeps the save action disabled while the map is non-empty.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::phone::{strip_non_digits, DialingPlan};
use super::record::ConfigForm;

/// A field of [`ConfigForm`] that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    ContactNumber,
    Street,
    Number,
    Unit,
}

impl FormField {
    /// The camelCase field name used in the UI bridge.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContactNumber => "contactNumber",
            Self::Street => "street",
            Self::Number => "number",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field → message map.  Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Records a message for `field`; an existing message is kept.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validates `form` against the default dialing plan.
pub fn validate_config(form: &ConfigForm) -> ValidationErrors {
    validate_config_with(form, &DialingPlan::default())
}

/// Validates `form`, using `plan.min_digits` as the contact-number threshold.
pub fn validate_config_with(form: &ConfigForm, plan: &DialingPlan) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let digits = strip_non_digits(&form.contact_number);
    if digits.is_empty() {
        errors.insert(FormField::ContactNumber, "contact number is required");
    } else if digits.len() < plan.min_digits {
        errors.insert(
            FormField::ContactNumber,
            format!("contact number must have at least {} digits", plan.min_digits),
        );
    }

    if form.street.trim().is_empty() {
        errors.insert(FormField::Street, "street is required");
    }
    if form.number.trim().is_empty() {
        errors.insert(FormField::Number, "house number is required");
    }

    errors
}
