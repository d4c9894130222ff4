//! Editable form model and its projection to/from the persisted document
//!
//! The form mirrors [`SettingsDocument`] group for group. The one difference
//! is `general.profiles`: an ordered `Vec<String>` a list control can edit
//! directly, instead of the comma-joined string kept on disk.

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::debug;

use crate::config::document::{AdvancedOptions, CharSettings, GeneralSettings, SettingsDocument};
use crate::constants::profiles::SEPARATOR;

/// Live, user-editable settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormModel {
    pub general: GeneralForm,
    #[serde(rename = "char")]
    pub character: CharSettings,
    pub advanced_options: AdvancedOptions,
}

/// `general` group with the profile list expanded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralForm {
    pub profiles: Vec<String>,
    pub run_vision_mode_on_startup: String,
    pub check_chest_tabs: String,
    pub hidden_transparency: String,
    pub local_prefs_path: String,
}

/// Every plain string field, addressed as `group.key`
pub const FIELD_PATHS: [&str; 13] = [
    "general.run_vision_mode_on_startup",
    "general.check_chest_tabs",
    "general.hidden_transparency",
    "general.local_prefs_path",
    "char.inventory",
    "char.skill4",
    "char.skill3",
    "char.health_pot",
    "advanced_options.run_scripts",
    "advanced_options.run_filter",
    "advanced_options.exit_key",
    "advanced_options.log_lvl",
    "advanced_options.scripts",
];

/// Project a persisted document into an editable form.
///
/// Profile ids are split verbatim; no trimming or validation.
pub fn to_form(doc: &SettingsDocument) -> FormModel {
    let profiles = if doc.general.profiles.is_empty() {
        Vec::new()
    } else {
        doc.general.profiles.split(SEPARATOR).map(str::to_string).collect()
    };

    FormModel {
        general: GeneralForm {
            profiles,
            run_vision_mode_on_startup: doc.general.run_vision_mode_on_startup.clone(),
            check_chest_tabs: doc.general.check_chest_tabs.clone(),
            hidden_transparency: doc.general.hidden_transparency.clone(),
            local_prefs_path: doc.general.local_prefs_path.clone(),
        },
        character: doc.character.clone(),
        advanced_options: doc.advanced_options.clone(),
    }
}

/// Project an edited form back into the persisted document shape
pub fn to_document(form: &FormModel) -> SettingsDocument {
    // empty list encodes as ""
    let profiles = if form.general.profiles.is_empty() {
        String::new()
    } else {
        form.general.profiles.join(SEPARATOR.to_string().as_str())
    };

    SettingsDocument {
        general: GeneralSettings {
            profiles,
            run_vision_mode_on_startup: form.general.run_vision_mode_on_startup.clone(),
            check_chest_tabs: form.general.check_chest_tabs.clone(),
            hidden_transparency: form.general.hidden_transparency.clone(),
            local_prefs_path: form.general.local_prefs_path.clone(),
        },
        character: form.character.clone(),
        advanced_options: form.advanced_options.clone(),
    }
}

impl FormModel {
    /// Read a string field by `group.key` path
    pub fn field(&self, path: &str) -> Option<&str> {
        let value = match path {
            "general.run_vision_mode_on_startup" => &self.general.run_vision_mode_on_startup,
            "general.check_chest_tabs" => &self.general.check_chest_tabs,
            "general.hidden_transparency" => &self.general.hidden_transparency,
            "general.local_prefs_path" => &self.general.local_prefs_path,
            "char.inventory" => &self.character.inventory,
            "char.skill4" => &self.character.skill4,
            "char.skill3" => &self.character.skill3,
            "char.health_pot" => &self.character.health_pot,
            "advanced_options.run_scripts" => &self.advanced_options.run_scripts,
            "advanced_options.run_filter" => &self.advanced_options.run_filter,
            "advanced_options.exit_key" => &self.advanced_options.exit_key,
            "advanced_options.log_lvl" => &self.advanced_options.log_lvl,
            "advanced_options.scripts" => &self.advanced_options.scripts,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, path: &str) -> Option<&mut String> {
        let value = match path {
            "general.run_vision_mode_on_startup" => &mut self.general.run_vision_mode_on_startup,
            "general.check_chest_tabs" => &mut self.general.check_chest_tabs,
            "general.hidden_transparency" => &mut self.general.hidden_transparency,
            "general.local_prefs_path" => &mut self.general.local_prefs_path,
            "char.inventory" => &mut self.character.inventory,
            "char.skill4" => &mut self.character.skill4,
            "char.skill3" => &mut self.character.skill3,
            "char.health_pot" => &mut self.character.health_pot,
            "advanced_options.run_scripts" => &mut self.advanced_options.run_scripts,
            "advanced_options.run_filter" => &mut self.advanced_options.run_filter,
            "advanced_options.exit_key" => &mut self.advanced_options.exit_key,
            "advanced_options.log_lvl" => &mut self.advanced_options.log_lvl,
            "advanced_options.scripts" => &mut self.advanced_options.scripts,
            _ => return None,
        };
        Some(value)
    }

    /// Overwrite a string field by `group.key` path
    pub fn set_field(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        if path == "general.profiles" {
            bail!("general.profiles is a list; use the profile add/remove operations");
        }
        let Some(slot) = self.field_mut(path) else {
            bail!("Unknown settings field '{path}'");
        };
        *slot = value.into();
        debug!(field = %path, "Form field updated");
        Ok(())
    }

    /// First profile in the list, treated as active downstream
    pub fn active_profile(&self) -> Option<&str> {
        self.general.profiles.first().map(String::as_str)
    }

    /// Append a profile id to the ordered list
    ///
    /// Ids must be non-empty and comma-free, otherwise the next load would
    /// split them apart.
    pub fn add_profile(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if id.is_empty() {
            bail!("Profile id must not be empty");
        }
        if id.contains(SEPARATOR) {
            bail!("Profile id '{id}' contains '{SEPARATOR}', which is the list separator");
        }
        if self.general.profiles.contains(&id) {
            bail!("Profile '{id}' is already selected");
        }
        self.general.profiles.push(id);
        Ok(())
    }

    /// Remove a profile id; returns false if it was not in the list
    pub fn remove_profile(&mut self, id: &str) -> bool {
        let before = self.general.profiles.len();
        self.general.profiles.retain(|p| p != id);
        before != self.general.profiles.len()
    }

    /// Move the profile at `from` to position `to`
    pub fn move_profile(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.general.profiles.len();
        if from >= len || to >= len {
            bail!("Profile position out of range (from={from}, to={to}, len={len})");
        }
        let id = self.general.profiles.remove(from);
        self.general.profiles.insert(to, id);
        Ok(())
    }

    /// Move an already selected profile to the front
    pub fn activate_profile(&mut self, id: &str) -> Result<()> {
        let Some(pos) = self.general.profiles.iter().position(|p| p == id) else {
            bail!("Profile '{id}' is not selected");
        };
        self.move_profile(pos, 0)
    }
}
