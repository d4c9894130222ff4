//! Configuration for settings-sync
//!
//! - **document**: the persisted settings shape (structured TOML)
//! - **form**: the editable projection of that document
//!
//! [`AppPaths`] resolves where the settings file and profile directory live.

pub mod document;
pub mod form;

use std::path::PathBuf;

use crate::constants::config::{APP_DIR, FILENAME, PROFILE_DIR};

// Re-export commonly used types
pub use document::SettingsDocument;
pub use form::{to_document, to_form, FormModel};

/// Storage locations used by the file-backed store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub settings_file: PathBuf,
    pub profile_dir: PathBuf,
}

impl AppPaths {
    /// Platform config dir, falling back to the working directory
    pub fn config_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path
    }

    /// Resolve paths, preferring explicit overrides
    pub fn resolve(settings_file: Option<PathBuf>, profile_dir: Option<PathBuf>) -> Self {
        let base = Self::config_dir();
        Self {
            settings_file: settings_file.unwrap_or_else(|| base.join(FILENAME)),
            profile_dir: profile_dir.unwrap_or_else(|| base.join(PROFILE_DIR)),
        }
    }
}
