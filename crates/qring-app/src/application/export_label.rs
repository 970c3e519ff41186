//! ExportLabelUseCase: build the printable label and hand it to the gallery.
//!
//! The label is the QR code for the derived action URI plus, when enabled,
//! the address line underneath.  Three capabilities are injected:
//!
//! - [`CodeRenderer`] turns a URI into QR artwork (terminal text or SVG).
//! - [`DeviceCapabilities`] asks the device for gallery access.
//! - [`LabelSink`] stores the finished SVG (gallery, files folder, ...).
//!
//! A denied permission is reported as [`ExportError::PermissionDenied`] and
//! is never retried automatically; the UI turns it into an actionable message.

use std::sync::Arc;

use async_trait::async_trait;
use qring_core::{ConfigRecord, PayloadDeriver};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::config_store::ConfigStore;

/// File stem used for exported labels.
pub const LABEL_FILE_STEM: &str = "qring-label";

/// Error type for QR rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    /// The payload could not be encoded as a QR code (e.g. too long).
    #[error("failed to encode QR code: {0}")]
    Encode(String),
}

/// Error type for label export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The user refused gallery access.
    #[error("gallery access was denied; allow it in the device settings to save the label")]
    PermissionDenied,

    #[error(transparent)]
    Label(#[from] LabelError),

    /// The sink could not store the artwork.
    #[error("could not save label: {0}")]
    Sink(#[source] std::io::Error),
}

/// Outcome of a device permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Device capabilities the label export needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceCapabilities: Send + Sync {
    /// Requests permission to write to the photo gallery.
    async fn request_gallery_access(&self) -> PermissionStatus;
}

/// Renders a payload string as a scannable code.
pub trait CodeRenderer: Send + Sync {
    /// Renders for a character terminal.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::Encode`] if the payload cannot be encoded.
    fn render_text(&self, data: &str) -> Result<String, LabelError>;

    /// Renders a complete SVG document, with `caption` printed under the code.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::Encode`] if the payload cannot be encoded.
    fn render_svg(&self, data: &str, caption: Option<&str>) -> Result<String, LabelError>;
}

/// Destination for finished label artwork.
#[async_trait]
pub trait LabelSink: Send + Sync {
    /// Stores `svg` under `name` and returns a human-readable location.
    async fn save_label(&self, name: &str, svg: &str) -> std::io::Result<String>;
}

/// What is printed on the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub action_uri: String,
    /// `None` when the address is hidden on the label.
    pub address_line: Option<String>,
}

impl Label {
    /// Derives the label for `record`; an absent record yields the fallback
    /// URI and the address placeholder.
    pub fn derive(record: Option<&ConfigRecord>, deriver: &PayloadDeriver) -> Self {
        let default_record = ConfigRecord::default();
        let record = record.unwrap_or(&default_record);
        let address = deriver.format_address_display(record);
        Self {
            action_uri: deriver.derive_action_uri(record),
            address_line: Some(address).filter(|a| !a.is_empty()),
        }
    }
}

/// A label with its terminal QR rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLabel {
    pub label: Label,
    pub qr_text: String,
}

/// Where an exported label ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub location: String,
    pub label: Label,
}

pub struct ExportLabelUseCase {
    store: Arc<ConfigStore>,
    deriver: PayloadDeriver,
    renderer: Arc<dyn CodeRenderer>,
    capabilities: Arc<dyn DeviceCapabilities>,
    sink: Arc<dyn LabelSink>,
}

impl ExportLabelUseCase {
    pub fn new(
        store: Arc<ConfigStore>,
        deriver: PayloadDeriver,
        renderer: Arc<dyn CodeRenderer>,
        capabilities: Arc<dyn DeviceCapabilities>,
        sink: Arc<dyn LabelSink>,
    ) -> Self {
        Self {
            store,
            deriver,
            renderer,
            capabilities,
            sink,
        }
    }

    /// Label for the currently cached record.
    pub async fn current_label(&self) -> Label {
        let record = self.store.snapshot().await;
        Label::derive(record.as_ref(), &self.deriver)
    }

    /// Label plus its terminal rendering.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError`] if the URI cannot be encoded.
    pub async fn preview(&self) -> Result<RenderedLabel, LabelError> {
        let label = self.current_label().await;
        let qr_text = self.renderer.render_text(&label.action_uri)?;
        Ok(RenderedLabel { label, qr_text })
    }

    /// Requests gallery access, renders the SVG label and saves it.
    ///
    /// # Errors
    ///
    /// - [`ExportError::PermissionDenied`] if access is refused (nothing is rendered).
    /// - [`ExportError::Label`] if the URI cannot be encoded.
    /// - [`ExportError::Sink`] if the artwork cannot be stored.
    pub async fn export(&self) -> Result<ExportReceipt, ExportError> {
        if self.capabilities.request_gallery_access().await == PermissionStatus::Denied {
            warn!("gallery access denied, label not exported");
            return Err(ExportError::PermissionDenied);
        }

        let label = self.current_label().await;
        let svg = self
            .renderer
            .render_svg(&label.action_uri, label.address_line.as_deref())?;
        let location = self
            .sink
            .save_label(LABEL_FILE_STEM, &svg)
            .await
            .map_err(ExportError::Sink)?;

        info!(%location, "label exported");
        Ok(ExportReceipt { location, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config_store::{BlobStorage, StorageError};
    use qring_core::{Address, CommunicationMode, DEFAULT_ADDRESS_PLACEHOLDER, DEFAULT_FALLBACK_URI};
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    struct NullStorage;

    #[async_trait]
    impl BlobStorage for NullStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    /// Echoes the payload so assertions can see what was rendered.
    struct EchoRenderer;

    impl CodeRenderer for EchoRenderer {
        fn render_text(&self, data: &str) -> Result<String, LabelError> {
            Ok(format!("[qr:{data}]"))
        }

        fn render_svg(&self, data: &str, caption: Option<&str>) -> Result<String, LabelError> {
            Ok(format!("<svg>{data}|{}</svg>", caption.unwrap_or("")))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<(String, String)>>,
        should_fail: bool,
    }

    #[async_trait]
    impl LabelSink for RecordingSink {
        async fn save_label(&self, name: &str, svg: &str) -> std::io::Result<String> {
            if self.should_fail {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "no space"));
            }
            self.saved
                .lock()
                .unwrap()
                .push((name.to_string(), svg.to_string()));
            Ok(format!("/gallery/{name}.svg"))
        }
    }

    fn whatsapp_record(show_address: bool) -> ConfigRecord {
        ConfigRecord {
            contact_number: Some("5491112345678".to_string()),
            address: Some(Address {
                street: "Main".to_string(),
                number: "10".to_string(),
                unit: None,
            }),
            show_address_on_label: show_address,
            communication_mode: CommunicationMode::WhatsApp,
        }
    }

    async fn make_use_case(
        record: Option<ConfigRecord>,
        permission: PermissionStatus,
        sink: Arc<RecordingSink>,
    ) -> ExportLabelUseCase {
        let store = Arc::new(ConfigStore::new(Arc::new(NullStorage)));
        if let Some(record) = record {
            store.save(record).await.expect("seed store");
        }

        let mut capabilities = MockDeviceCapabilities::new();
        capabilities
            .expect_request_gallery_access()
            .returning(move || permission);

        ExportLabelUseCase::new(
            store,
            PayloadDeriver::default(),
            Arc::new(EchoRenderer),
            Arc::new(capabilities),
            sink,
        )
    }

    // ── Label derivation ──────────────────────────────────────────────────────

    #[test]
    fn test_label_for_absent_record_uses_fallbacks() {
        let label = Label::derive(None, &PayloadDeriver::default());
        assert_eq!(label.action_uri, DEFAULT_FALLBACK_URI);
        assert_eq!(label.address_line.as_deref(), Some(DEFAULT_ADDRESS_PLACEHOLDER));
    }

    #[test]
    fn test_label_hides_address_line_when_disabled() {
        let record = whatsapp_record(false);
        let label = Label::derive(Some(&record), &PayloadDeriver::default());
        assert_eq!(label.action_uri, "https://wa.me/5491112345678");
        assert_eq!(label.address_line, None);
    }

    // ── Preview ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preview_renders_action_uri() {
        let sink = Arc::new(RecordingSink::default());
        let use_case =
            make_use_case(Some(whatsapp_record(true)), PermissionStatus::Granted, sink).await;

        let preview = use_case.preview().await.expect("preview");

        assert_eq!(preview.qr_text, "[qr:https://wa.me/5491112345678]");
        assert_eq!(preview.label.address_line.as_deref(), Some("Main 10"));
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_export_with_permission_saves_svg_with_caption() {
        // Arrange
        let sink = Arc::new(RecordingSink::default());
        let use_case = make_use_case(
            Some(whatsapp_record(true)),
            PermissionStatus::Granted,
            Arc::clone(&sink),
        )
        .await;

        // Act
        let receipt = use_case.export().await.expect("export");

        // Assert
        assert_eq!(receipt.location, "/gallery/qring-label.svg");
        let saved = sink.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, LABEL_FILE_STEM);
        assert_eq!(saved[0].1, "<svg>https://wa.me/5491112345678|Main 10</svg>");
    }

    #[tokio::test]
    async fn test_export_denied_saves_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let use_case = make_use_case(
            Some(whatsapp_record(true)),
            PermissionStatus::Denied,
            Arc::clone(&sink),
        )
        .await;

        let result = use_case.export().await;

        assert!(matches!(result, Err(ExportError::PermissionDenied)));
        assert!(sink.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_requests_permission_exactly_once() {
        let store = Arc::new(ConfigStore::new(Arc::new(NullStorage)));
        let mut capabilities = MockDeviceCapabilities::new();
        capabilities
            .expect_request_gallery_access()
            .times(1)
            .returning(|| PermissionStatus::Granted);
        let use_case = ExportLabelUseCase::new(
            store,
            PayloadDeriver::default(),
            Arc::new(EchoRenderer),
            Arc::new(capabilities),
            Arc::new(RecordingSink::default()),
        );

        let receipt = use_case.export().await.expect("export");

        assert_eq!(receipt.label.action_uri, DEFAULT_FALLBACK_URI);
    }

    #[tokio::test]
    async fn test_sink_failure_surfaces_as_sink_error() {
        let sink = Arc::new(RecordingSink {
            should_fail: true,
            ..RecordingSink::default()
        });
        let use_case = make_use_case(None, PermissionStatus::Granted, sink).await;

        let result = use_case.export().await;

        assert!(matches!(result, Err(ExportError::Sink(_))));
    }
}
