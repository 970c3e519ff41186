//! TOML-based application settings.
//!
//! Settings are install-wide knobs that are not part of the user's
//! configuration record: the dialing plan, label text, where data and
//! exports live, and the log level.  They are read from the
//! platform-appropriate file:
//! - Windows:  `%APPDATA%\QRing\settings.toml`
//! - Linux:    `~/.config/qring/settings.toml`
//! - macOS:    `~/Library/Application Support/QRing/settings.toml`
//!
//! Example:
//!
//! ```toml
//! log_level = "debug"
//!
//! [dialing]
//! country_code = "54"
//! mobile_indicator = "9"
//! min_digits = 10
//!
//! [label]
//! fallback_uri = "https://qring.app"
//! qr_size = 320
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default = ...)]`, so a missing file, an empty
//! file, or a file from an older version all produce usable settings.

use std::path::{Path, PathBuf};

use qring_core::domain::phone::DEFAULT_MIN_DIGITS;
use qring_core::{DialingPlan, PayloadDeriver, DEFAULT_ADDRESS_PLACEHOLDER, DEFAULT_FALLBACK_URI};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but makes no sense (e.g. a non-digit country code).
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub dialing: DialingSettings,
    #[serde(default)]
    pub label: LabelSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialingSettings {
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_mobile_indicator")]
    pub mobile_indicator: String,
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelSettings {
    /// URI encoded when no contact number is configured.
    #[serde(default = "default_fallback_uri")]
    pub fallback_uri: String,
    #[serde(default = "default_address_placeholder")]
    pub address_placeholder: String,
    /// Approximate side length of the exported QR code in pixels.
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Directory for the configuration blob.  Defaults to the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Directory exported labels are written to.  Defaults to `<data_dir>/labels`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_country_code() -> String {
    DialingPlan::default().country_code
}
fn default_mobile_indicator() -> String {
    DialingPlan::default().mobile_indicator
}
fn default_min_digits() -> usize {
    DEFAULT_MIN_DIGITS
}
fn default_fallback_uri() -> String {
    DEFAULT_FALLBACK_URI.to_string()
}
fn default_address_placeholder() -> String {
    DEFAULT_ADDRESS_PLACEHOLDER.to_string()
}
fn default_qr_size() -> u32 {
    320
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dialing: DialingSettings::default(),
            label: LabelSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for DialingSettings {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            mobile_indicator: default_mobile_indicator(),
            min_digits: default_min_digits(),
        }
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            fallback_uri: default_fallback_uri(),
            address_placeholder: default_address_placeholder(),
            qr_size: default_qr_size(),
        }
    }
}

impl AppSettings {
    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] for an empty or non-digit country
    /// code or mobile indicator, or a zero `min_digits`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let digits_only = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !digits_only(&self.dialing.country_code) {
            return Err(SettingsError::Invalid {
                field: "dialing.country_code",
                reason: format!("{:?} is not a digit string", self.dialing.country_code),
            });
        }
        if !digits_only(&self.dialing.mobile_indicator) {
            return Err(SettingsError::Invalid {
                field: "dialing.mobile_indicator",
                reason: format!("{:?} is not a digit string", self.dialing.mobile_indicator),
            });
        }
        if self.dialing.min_digits == 0 {
            return Err(SettingsError::Invalid {
                field: "dialing.min_digits",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the domain deriver from these settings.
    pub fn deriver(&self) -> PayloadDeriver {
        PayloadDeriver::new(
            DialingPlan {
                country_code: self.dialing.country_code.clone(),
                mobile_indicator: self.dialing.mobile_indicator.clone(),
                min_digits: self.dialing.min_digits,
            },
            self.label.fallback_uri.clone(),
            self.label.address_placeholder.clone(),
        )
    }

    /// Directory holding the configuration blob.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoPlatformConfigDir`] when no directory is
    /// configured and the platform default cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => config_dir(),
        }
    }

    /// Directory exported labels are written to.
    ///
    /// # Errors
    ///
    /// Same as [`AppSettings::data_dir`].
    pub fn export_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.storage.export_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join("labels")),
        }
    }
}

// ── Settings file ─────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for QRing files.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

/// Resolves the full path to the default settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not found",
/// [`SettingsError::Parse`] if the TOML is malformed, and
/// [`SettingsError::Invalid`] if a value fails [`AppSettings::validate`].
pub fn load_settings_from(path: &Path) -> Result<AppSettings, SettingsError> {
    let settings = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<AppSettings>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppSettings::default(),
        Err(e) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `path` if given, otherwise from the platform location.
///
/// # Errors
///
/// See [`load_settings_from`].  When no platform directory exists and no
/// path is given, defaults are returned.
pub fn load_settings(path: Option<&Path>) -> Result<AppSettings, SettingsError> {
    match path {
        Some(path) => load_settings_from(path),
        None => match settings_file_path() {
            Ok(path) => load_settings_from(&path),
            Err(SettingsError::NoPlatformConfigDir) => Ok(AppSettings::default()),
            Err(e) => Err(e),
        },
    }
}

/// Directory holding `settings.toml` and, unless overridden, the saved label
/// configuration.
///
/// | Platform | Location                                   |
/// |----------|--------------------------------------------|
/// | Windows  | `%APPDATA%\QRing`                           |
/// | macOS    | `~/Library/Application Support/QRing`      |
/// | other    | `$XDG_CONFIG_HOME/qring` or `~/.config/qring` |
///
/// A relative `XDG_CONFIG_HOME` is ignored.
fn platform_config_dir() -> Option<PathBuf> {
    let env_dir = |name: &str| std::env::var_os(name).map(PathBuf::from);

    if cfg!(target_os = "windows") {
        env_dir("APPDATA").map(|appdata| appdata.join("QRing"))
    } else if cfg!(target_os = "macos") {
        env_dir("HOME").map(|home| home.join("Library/Application Support/QRing"))
    } else if cfg!(unix) {
        env_dir("XDG_CONFIG_HOME")
            .filter(|dir| dir.is_absolute())
            .or_else(|| env_dir("HOME").map(|home| home.join(".config")))
            .map(|base| base.join("qring"))
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
