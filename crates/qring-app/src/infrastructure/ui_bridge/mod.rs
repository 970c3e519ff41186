//! Command bridge: exposes application-layer operations to a UI front-end.
//!
//! Every command is an `async fn` taking the shared [`AppState`] and returning
//! a [`CommandResult`].  The CLI in `main.rs` is one consumer; a webview
//! front-end would register the same functions as IPC handlers.
//!
//! # Data Transfer Objects (DTOs)
//!
//! The DTOs contain only JSON-friendly fields and use camelCase names, the
//! same convention as the persisted configuration blob.  Enums travel as their
//! short names (`"call"`, `"whatsapp"`, `"needs-config"`, `"ready"`).
//!
//! # `CommandResult<T>` wrapper
//!
//! Every response has the shape
//! `{ success: bool, data: T | null, error: string | null }`.  A rejected form
//! is the one case with both an `error` and `data`: the field errors travel in
//! `data.errors` so the UI can show them next to the inputs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use qring_core::{
    CommunicationMode, ConfigForm, ConfigRecord, InitialRoute, PayloadDeriver, StartupError,
    ValidationErrors,
};

use crate::application::{
    config_store::{BlobStorage, ConfigStore},
    edit_config::{EditConfigUseCase, EditError, EditOutcome, Preferences},
    export_label::{CodeRenderer, DeviceCapabilities, ExportLabelUseCase, LabelSink},
    launch::{LaunchError, LaunchUseCase},
};
use crate::infrastructure::{
    label::{
        sink::{DirectoryPermissions, FileLabelSink},
        QrCodeRenderer,
    },
    settings::{AppSettings, SettingsError},
    storage::FileBlobStorage,
};

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between commands.
///
/// Built once at process start and passed around as `Arc<AppState>`; nothing
/// in the crate keeps a global copy.
pub struct AppState {
    pub settings: AppSettings,
    pub store: Arc<ConfigStore>,
    pub deriver: PayloadDeriver,
    launch: LaunchUseCase,
    editor: EditConfigUseCase,
    exporter: ExportLabelUseCase,
}

impl AppState {
    /// Wires the use cases around the given adapters.
    pub fn new(
        settings: AppSettings,
        storage: Arc<dyn BlobStorage>,
        renderer: Arc<dyn CodeRenderer>,
        capabilities: Arc<dyn DeviceCapabilities>,
        sink: Arc<dyn LabelSink>,
    ) -> Arc<Self> {
        let deriver = settings.deriver();
        let store = Arc::new(ConfigStore::new(storage));
        Arc::new(Self {
            launch: LaunchUseCase::new(Arc::clone(&store)),
            editor: EditConfigUseCase::new(Arc::clone(&store), deriver.clone()),
            exporter: ExportLabelUseCase::new(
                Arc::clone(&store),
                deriver.clone(),
                renderer,
                capabilities,
                sink,
            ),
            settings,
            store,
            deriver,
        })
    }

    /// Builds the desktop wiring: file storage in the data directory and
    /// label export into the export directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the settings are invalid or a directory
    /// cannot be resolved.
    pub fn from_settings(settings: AppSettings) -> Result<Arc<Self>, SettingsError> {
        settings.validate()?;
        let data_dir = settings.data_dir()?;
        let export_dir = settings.export_dir()?;
        debug!(
            data_dir = %data_dir.display(),
            export_dir = %export_dir.display(),
            "wiring file adapters"
        );

        let renderer = QrCodeRenderer::new(settings.label.qr_size);
        Ok(Self::new(
            settings,
            Arc::new(FileBlobStorage::new(data_dir)),
            Arc::new(renderer),
            Arc::new(DirectoryPermissions::new(&export_dir)),
            Arc::new(FileLabelSink::new(export_dir)),
        ))
    }

    /// Loads the store on first use so read commands work before `launch`.
    async fn ensure_loaded(&self) -> Result<(), String> {
        if self.store.is_loading() {
            self.store
                .load()
                .await
                .map_err(|e| format!("could not read configuration: {e}"))?;
        }
        Ok(())
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// The configuration plus the values derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    pub contact_number: Option<String>,
    pub street: String,
    pub number: String,
    pub unit: Option<String>,
    pub show_address_on_label: bool,
    pub communication_mode: String,
    pub action_uri: String,
    pub address_display: String,
}

impl ConfigDto {
    fn from_record(record: &ConfigRecord, deriver: &PayloadDeriver) -> Self {
        let (street, number, unit) = match &record.address {
            Some(a) => (a.street.clone(), a.number.clone(), a.unit().map(str::to_string)),
            None => (String::new(), String::new(), None),
        };
        Self {
            contact_number: record.contact().map(str::to_string),
            street,
            number,
            unit,
            show_address_on_label: record.show_address_on_label,
            communication_mode: record.communication_mode.as_str().to_string(),
            action_uri: deriver.derive_action_uri(record),
            address_display: deriver.format_address_display(record),
        }
    }
}

/// Form submitted by the UI.
///
/// `communicationMode` and `showAddressOnLabel` are optional; omitted values
/// keep what is currently saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFormDto {
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_address_on_label: Option<bool>,
}

impl ConfigFormDto {
    fn split(&self) -> Result<(ConfigForm, Preferences), String> {
        let communication_mode = match self.communication_mode.as_deref() {
            None => None,
            Some(name) => Some(
                CommunicationMode::parse(name)
                    .ok_or_else(|| format!("unknown communication mode {name:?}"))?,
            ),
        };
        let form = ConfigForm {
            contact_number: self.contact_number.clone(),
            street: self.street.clone(),
            number: self.number.clone(),
            unit: self.unit.clone(),
        };
        Ok((
            form,
            Preferences {
                communication_mode,
                show_address_on_label: self.show_address_on_label,
            },
        ))
    }
}

/// Response to `save_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigDto {
    /// The saved configuration, `None` when the form was rejected.
    pub config: Option<ConfigDto>,
    /// Field errors; empty when saved.
    pub errors: ValidationErrors,
}

/// Response to `launch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchDto {
    pub route: String,
    pub config: Option<ConfigDto>,
}

/// What the label shows, with a terminal rendering of the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDto {
    pub action_uri: String,
    pub address_line: Option<String>,
    pub qr_text: String,
}

/// Response to `export_label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDto {
    pub location: String,
    pub action_uri: String,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
    /// A failure that still carries data for the UI.
    pub fn rejected(data: T, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Loads the configuration and decides the landing screen.
///
/// Calling it again after a successful launch returns the same route.
///
/// # Example (frontend)
/// ```ts
/// const { data } = await invoke<CommandResult<LaunchDto>>('launch');
/// if (data.route === 'needs-config') navigate('/config');
/// ```
pub async fn launch(state: Arc<AppState>) -> CommandResult<LaunchDto> {
    let route = match state.launch.run().await {
        Ok(route) => route,
        Err(LaunchError::Startup(StartupError::AlreadyResolved(route))) => route,
        Err(e) => {
            error!("launch failed: {e}");
            return CommandResult::err(e.to_string());
        }
    };
    let config = state
        .store
        .snapshot()
        .await
        .map(|r| ConfigDto::from_record(&r, &state.deriver));
    CommandResult::ok(LaunchDto {
        route: route.as_str().to_string(),
        config,
    })
}

/// Returns the current configuration, `None` when nothing is configured.
pub async fn get_config(state: Arc<AppState>) -> CommandResult<Option<ConfigDto>> {
    if let Err(msg) = state.ensure_loaded().await {
        return CommandResult::err(msg);
    }
    let record = state.store.snapshot().await;
    CommandResult::ok(record.map(|r| ConfigDto::from_record(&r, &state.deriver)))
}

/// Validates and saves a submitted form.
///
/// A form rejected by validation returns `success: false` with the field
/// errors in `data.errors`.  A save submitted while another is pending is
/// refused and nothing is written.
pub async fn save_config(state: Arc<AppState>, form: ConfigFormDto) -> CommandResult<SaveConfigDto> {
    let (form, preferences) = match form.split() {
        Ok(parts) => parts,
        Err(msg) => return CommandResult::err(msg),
    };
    if let Err(msg) = state.ensure_loaded().await {
        return CommandResult::err(msg);
    }

    match state.editor.apply(&form, preferences).await {
        Ok(EditOutcome::Saved(record)) => CommandResult::ok(SaveConfigDto {
            config: Some(ConfigDto::from_record(&record, &state.deriver)),
            errors: ValidationErrors::new(),
        }),
        Ok(EditOutcome::Invalid(errors)) => {
            let msg = format!("configuration is invalid: {errors}");
            CommandResult::rejected(
                SaveConfigDto {
                    config: None,
                    errors,
                },
                msg,
            )
        }
        Err(EditError::SaveInProgress) => {
            warn!("save refused, previous save still pending");
            CommandResult::err(EditError::SaveInProgress.to_string())
        }
        Err(e) => {
            error!("save failed: {e}");
            CommandResult::err(e.to_string())
        }
    }
}

/// Deletes the saved configuration.
pub async fn reset_config(state: Arc<AppState>) -> CommandResult<()> {
    match state.editor.reset().await {
        Ok(()) => CommandResult::ok(()),
        Err(e) => {
            error!("reset failed: {e}");
            CommandResult::err(e.to_string())
        }
    }
}

/// Returns the label content with a terminal rendering of the QR code.
pub async fn get_label(state: Arc<AppState>) -> CommandResult<LabelDto> {
    if let Err(msg) = state.ensure_loaded().await {
        return CommandResult::err(msg);
    }
    match state.exporter.preview().await {
        Ok(preview) => CommandResult::ok(LabelDto {
            action_uri: preview.label.action_uri,
            address_line: preview.label.address_line,
            qr_text: preview.qr_text,
        }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Renders the label as SVG and saves it through the label sink.
pub async fn export_label(state: Arc<AppState>) -> CommandResult<ExportDto> {
    if let Err(msg) = state.ensure_loaded().await {
        return CommandResult::err(msg);
    }
    match state.exporter.export().await {
        Ok(receipt) => CommandResult::ok(ExportDto {
            location: receipt.location,
            action_uri: receipt.label.action_uri,
        }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Route the UI would land on for the cached record, without driving startup.
pub async fn current_route(state: Arc<AppState>) -> InitialRoute {
    let record = state.store.snapshot().await;
    qring_core::decide_initial_route(record.as_ref())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
