//! Persisted settings document
//!
//! Canonical shape written to the settings file. Three groups of plain
//! string values; the only structured field is `general.profiles`, stored
//! as the comma-joined form of the ordered profile id list.

use serde::{Deserialize, Serialize};

/// Top-level persisted settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(rename = "char", default)]
    pub character: CharSettings,
    #[serde(default)]
    pub advanced_options: AdvancedOptions,
}

/// `general` group as persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Comma-joined profile ids, first one is active
    pub profiles: String,
    pub run_vision_mode_on_startup: String,
    pub check_chest_tabs: String,
    pub hidden_transparency: String,
    pub local_prefs_path: String,
}

/// `char` group: character key bindings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharSettings {
    pub inventory: String,
    pub skill4: String,
    pub skill3: String,
    pub health_pot: String,
}

/// `advanced_options` group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedOptions {
    pub run_scripts: String,
    pub run_filter: String,
    pub exit_key: String,
    pub log_lvl: String,
    pub scripts: String,
}
