//! Profile descriptors derived from the profile directory listing

use serde::Serialize;

use crate::constants::profiles::FILE_SUFFIXES;

/// One selectable profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDescriptor {
    pub id: String,
    /// Display name, currently always equal to `id`
    pub name: String,
}

impl ProfileDescriptor {
    /// Strip a trailing `.yml`/`.yaml`; other names pass through whole
    pub fn from_filename(filename: &str) -> Self {
        let id = FILE_SUFFIXES
            .iter()
            .find_map(|suffix| filename.strip_suffix(suffix))
            .unwrap_or(filename)
            .to_string();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// Map a listing to descriptors, keeping order and duplicates
pub fn descriptors_from_listing(filenames: &[String]) -> Vec<ProfileDescriptor> {
    filenames
        .iter()
        .map(|f| ProfileDescriptor::from_filename(f))
        .collect()
}
