// src/persistence/mod.rs

//! Saves and restores the raw form state between sessions.

use crate::boundary::{BoundaryAssignment, BoundaryConfiguration, Face, PatchType};
use crate::form::FormFields;
use crate::GeneratorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default name of the state file.
pub const STATE_FILE_NAME: &str = "responses.json";

/// Everything the form shows, stored verbatim. Nothing derived is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub fields: FormFields,
    pub boundaries: BoundaryConfiguration,
    pub save_responses: bool,
}

/// On-disk shape of a face entry. Older files stored only the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredAssignment {
    Current(BoundaryAssignment),
    Legacy(String),
}

impl From<StoredAssignment> for BoundaryAssignment {
    fn from(stored: StoredAssignment) -> Self {
        match stored {
            StoredAssignment::Current(assignment) => assignment,
            StoredAssignment::Legacy(name) => BoundaryAssignment::new(PatchType::Patch, name),
        }
    }
}

/// The state file record. Missing keys take their form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub xmin: String,
    #[serde(default)]
    pub ymin: String,
    #[serde(default)]
    pub zmin: String,
    #[serde(default)]
    pub length_x: String,
    #[serde(default)]
    pub length_y: String,
    #[serde(default)]
    pub length_z: String,
    #[serde(default)]
    pub cells_x: String,
    #[serde(default)]
    pub cells_y: String,
    #[serde(default)]
    pub cells_z: String,
    #[serde(default = "default_unit")]
    pub scale_unit: String,
    #[serde(default = "default_sign")]
    pub custom_sign: String,
    #[serde(default = "default_exp")]
    pub custom_exp: String,
    #[serde(default, deserialize_with = "deserialize_patch_names")]
    patch_names: BTreeMap<Face, StoredAssignment>,
    #[serde(default)]
    pub save_responses: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Reads the face entries one at a time; an unknown face or an unreadable
/// entry is dropped with a warning instead of failing the whole file.
fn deserialize_patch_names<'de, D>(deserializer: D) -> Result<BTreeMap<Face, StoredAssignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut entries = BTreeMap::new();
    for (label, value) in raw {
        let face: Face = match label.parse() {
            Ok(face) => face,
            Err(e) => {
                log::warn!("Ignoring saved boundary: {}", e);
                continue;
            }
        };
        match serde_json::from_value::<StoredAssignment>(value) {
            Ok(stored) => {
                entries.insert(face, stored);
            }
            Err(e) => log::warn!("Ignoring saved boundary for '{}': {}", face, e),
        }
    }
    Ok(entries)
}

fn default_unit() -> String {
    FormFields::default().scale_unit
}

fn default_sign() -> String {
    FormFields::default().custom_sign
}

fn default_exp() -> String {
    FormFields::default().custom_exp
}

impl PersistedState {
    /// Snapshot of the form, stamped with the current time.
    pub fn capture(state: &FormState) -> Self {
        let f = &state.fields;
        PersistedState {
            xmin: f.xmin.clone(),
            ymin: f.ymin.clone(),
            zmin: f.zmin.clone(),
            length_x: f.length_x.clone(),
            length_y: f.length_y.clone(),
            length_z: f.length_z.clone(),
            cells_x: f.cells_x.clone(),
            cells_y: f.cells_y.clone(),
            cells_z: f.cells_z.clone(),
            scale_unit: f.scale_unit.clone(),
            custom_sign: f.custom_sign.clone(),
            custom_exp: f.custom_exp.clone(),
            patch_names: state
                .boundaries
                .iter()
                .map(|(face, a)| (face, StoredAssignment::Current(a.clone())))
                .collect(),
            save_responses: state.save_responses,
            saved_at: Some(Utc::now()),
        }
    }

    /// Converts to form state. Legacy name-only entries become unnamed-type
    /// patches carrying that name; absent faces become unnamed patches.
    pub fn into_form_state(self) -> FormState {
        let mut boundaries = BoundaryConfiguration::default();
        for (face, stored) in self.patch_names {
            boundaries.set(face, stored.into());
        }
        FormState {
            fields: FormFields {
                xmin: self.xmin,
                ymin: self.ymin,
                zmin: self.zmin,
                length_x: self.length_x,
                length_y: self.length_y,
                length_z: self.length_z,
                cells_x: self.cells_x,
                cells_y: self.cells_y,
                cells_z: self.cells_z,
                scale_unit: self.scale_unit,
                custom_sign: self.custom_sign,
                custom_exp: self.custom_exp,
            },
            boundaries,
            save_responses: self.save_responses,
        }
    }

    pub fn to_json(&self) -> Result<String, GeneratorError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GeneratorError::Persistence(format!("Failed to serialize responses: {}", e)))
    }

    pub fn from_json(json_str: &str) -> Result<Self, GeneratorError> {
        serde_json::from_str(json_str)
            .map_err(|e| GeneratorError::Persistence(format!("Failed to deserialize responses: {}", e)))
    }
}

/// Reads the state file.
///
/// A missing, unreadable or corrupt file yields `None`; the caller falls
/// back to defaults and startup continues.
pub fn load_state(path: &Path) -> Option<(FormState, Option<DateTime<Utc>>)> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No saved responses at {}", path.display());
            return None;
        }
        Err(e) => {
            log::warn!("Ignoring unreadable responses file {}: {}", path.display(), e);
            return None;
        }
    };
    match PersistedState::from_json(&text) {
        Ok(persisted) => {
            let saved_at = persisted.saved_at;
            log::info!("Loaded previous responses from {}", path.display());
            Some((persisted.into_form_state(), saved_at))
        }
        Err(e) => {
            log::warn!("Ignoring corrupt responses file {}: {}", path.display(), e);
            None
        }
    }
}

/// Writes the state file, replacing the previous one only on success.
pub fn save_state(path: &Path, state: &FormState) -> Result<(), GeneratorError> {
    let json = PersistedState::capture(state).to_json()?;
    crate::io::write_atomic(path, json.as_bytes())
        .map_err(|e| GeneratorError::Persistence(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Saved responses to {}", path.display());
    Ok(())
}
