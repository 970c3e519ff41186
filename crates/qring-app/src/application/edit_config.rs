//! EditConfigUseCase: validate, merge and persist user edits.
//!
//! The storage layer only ever sees whole records, so merging happens here:
//! a submitted [`ConfigForm`] replaces the contact number and address, while
//! the display preferences (communication mode, address visibility) come from
//! the explicit [`Preferences`] if given, otherwise from the current record.
//!
//! Validation errors are data, not failures: an invalid form returns
//! [`EditOutcome::Invalid`] and nothing is written.

use std::sync::Arc;

use qring_core::domain::validation::validate_config_with;
use qring_core::{CommunicationMode, ConfigForm, ConfigRecord, PayloadDeriver, ValidationErrors};
use thiserror::Error;
use tracing::{debug, info};

use super::config_store::{ConfigStore, StorageError};

/// Error type for the edit use case.
#[derive(Debug, Error)]
pub enum EditError {
    /// The previous save has not finished; the UI should keep its edits.
    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("storage failed: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for EditError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::SaveInProgress => Self::SaveInProgress,
            other => Self::Storage(other),
        }
    }
}

/// Display preferences that can accompany an edit.
///
/// `None` keeps the value from the current record (or the default when
/// nothing is configured yet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub communication_mode: Option<CommunicationMode>,
    pub show_address_on_label: Option<bool>,
}

/// Result of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The normalized record that was persisted.
    Saved(ConfigRecord),
    /// The form did not validate; nothing was written.
    Invalid(ValidationErrors),
}

/// Validates and saves configuration edits.
pub struct EditConfigUseCase {
    store: Arc<ConfigStore>,
    deriver: PayloadDeriver,
}

impl EditConfigUseCase {
    pub fn new(store: Arc<ConfigStore>, deriver: PayloadDeriver) -> Self {
        Self { store, deriver }
    }

    /// Validates `form` and, if valid, saves it merged with `preferences`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SaveInProgress`] when another save is pending and
    /// [`EditError::Storage`] when the write fails.  In both cases the store's
    /// cached record is unchanged.
    pub async fn apply(
        &self,
        form: &ConfigForm,
        preferences: Preferences,
    ) -> Result<EditOutcome, EditError> {
        if self.store.is_saving() {
            return Err(EditError::SaveInProgress);
        }

        let errors = validate_config_with(form, &self.deriver.plan);
        if !errors.is_empty() {
            debug!(fields = errors.len(), "configuration form rejected");
            return Ok(EditOutcome::Invalid(errors));
        }

        let current = self.store.snapshot().await.unwrap_or_default();
        let record = ConfigRecord::from_form(
            form,
            &self.deriver.plan,
            preferences
                .communication_mode
                .unwrap_or(current.communication_mode),
            preferences
                .show_address_on_label
                .unwrap_or(current.show_address_on_label),
        );

        self.store.save(record.clone()).await?;
        info!(
            mode = record.communication_mode.as_str(),
            "configuration updated from form"
        );
        Ok(EditOutcome::Saved(record))
    }

    /// Changes only the display preferences of the current record.
    ///
    /// Works on an unconfigured store too: the preferences are saved on an
    /// otherwise empty record.
    ///
    /// # Errors
    ///
    /// Same as [`EditConfigUseCase::apply`].
    pub async fn update_preferences(
        &self,
        preferences: Preferences,
    ) -> Result<ConfigRecord, EditError> {
        if self.store.is_saving() {
            return Err(EditError::SaveInProgress);
        }

        let mut record = self.store.snapshot().await.unwrap_or_default();
        if let Some(mode) = preferences.communication_mode {
            record.communication_mode = mode;
        }
        if let Some(show) = preferences.show_address_on_label {
            record.show_address_on_label = show;
        }

        self.store.save(record.clone()).await?;
        Ok(record)
    }

    /// Returns the store to the unconfigured state.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Storage`] if the backend delete fails.
    pub async fn reset(&self) -> Result<(), EditError> {
        self.store.clear().await?;
        Ok(())
    }
}
