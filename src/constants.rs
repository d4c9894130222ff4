//! Application-wide constants
//!
//! Single source of truth for file names, encodings and fixed messages.

/// Config file locations
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "settings-sync";

    /// Settings document file name
    pub const FILENAME: &str = "settings.toml";

    /// Profile directory name (next to the settings file)
    pub const PROFILE_DIR: &str = "profiles";

    /// Env override for the settings file path
    pub const FILE_ENV: &str = "SETTINGS_SYNC_FILE";

    /// Env override for the profile directory
    pub const PROFILE_DIR_ENV: &str = "SETTINGS_SYNC_PROFILES";
}

/// Persisted encoding of the profile list
pub mod profiles {
    /// Separator used when the ordered id list is stored as one string
    pub const SEPARATOR: char = ',';

    /// Suffixes stripped from profile filenames (longest first)
    pub const FILE_SUFFIXES: [&str; 2] = [".yaml", ".yml"];
}

/// User-facing prompts
pub mod prompts {
    /// Shown before default settings overwrite the settings file
    pub const RESET_CONFIRM_MESSAGE: &str = "Are you sure you want to load the default settings?";
}

/// Logging
pub mod logging {
    /// Env var read for the max trace level
    pub const LEVEL_ENV: &str = "LOG_LEVEL";
}
