pub mod boundary;
pub mod form;
pub mod geometry;
pub mod io;
pub mod kernel;
pub mod meshing;
pub mod persistence;
pub mod scale;

// Re-exporting the types most callers need.
pub use boundary::{BoundaryAssignment, BoundaryConfiguration, BoundaryEditor, EditorState, Face, PatchType};
pub use form::FormFields;
pub use geometry::{BoxGeometry, CellStats};
pub use kernel::{Extents, Point};
pub use meshing::GenerationReport;
pub use persistence::FormState;
pub use scale::ScalePolicy;

use boundary::{group_by_name, validate_for_generation, BoundaryGroup, ValidationReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// --- Errors ---

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("One or more field(s) were not entered: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("Please enter valid numbers ({field} = '{value}')")]
    Parse { field: &'static str, value: String },

    #[error("Cells in {axis} direction must be greater than zero")]
    Division { axis: char },

    #[error("Invalid scale: {0}")]
    Scale(String),

    #[error("{0}")]
    Boundary(#[from] ValidationReport),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Output failed: {0}")]
    Output(String),
}

// --- Configuration ---

/// Paths and policies for a generator session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub output_path: PathBuf,
    pub state_path: PathBuf,
    pub scale_policy: ScalePolicy,
    pub uniformity_tolerance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_path: PathBuf::from(meshing::DICT_FILE_NAME),
            state_path: PathBuf::from(persistence::STATE_FILE_NAME),
            scale_policy: ScalePolicy::Lenient,
            uniformity_tolerance: geometry::UNIFORMITY_TOLERANCE,
        }
    }
}

impl GeneratorConfig {
    /// Reads a JSON config file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, GeneratorError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GeneratorError::Persistence(format!("Failed to read config {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| GeneratorError::Persistence(format!("Failed to parse config {}: {}", path.display(), e)))
    }
}

// --- Form Controller ---

/// A rendered document, not yet written.
#[derive(Debug, Clone)]
pub struct RenderedDict {
    pub document: String,
    pub scale: f64,
    pub groups: Vec<BoundaryGroup>,
    pub cell_stats: CellStats,
}

/// Result of `FormController::generate`.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub report: GenerationReport,
    /// Outcome of the auto-save, or `None` when auto-save is off.
    pub responses_saved: Option<Result<(), GeneratorError>>,
}

/// Owns the form state and runs every user action against it.
///
/// Field edits go straight to `fields_mut`. Boundary edits go through the
/// `BoundaryEditor` draft and only land once they validate.
pub struct FormController {
    config: GeneratorConfig,
    fields: FormFields,
    editor: BoundaryEditor,
    save_responses: bool,
    loaded_previous: bool,
    loaded_saved_at: Option<DateTime<Utc>>,
}

impl FormController {
    /// A controller with a blank form.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::from_state(config, FormState::default())
    }

    pub fn from_state(config: GeneratorConfig, state: FormState) -> Self {
        FormController {
            config,
            fields: state.fields,
            editor: BoundaryEditor::new(state.boundaries),
            save_responses: state.save_responses,
            loaded_previous: false,
            loaded_saved_at: None,
        }
    }

    /// A controller seeded from the state file, or blank when there is none.
    pub fn load(config: GeneratorConfig) -> Self {
        match persistence::load_state(&config.state_path) {
            Some((state, saved_at)) => {
                let mut controller = Self::from_state(config, state);
                controller.loaded_previous = true;
                controller.loaded_saved_at = saved_at;
                controller
            }
            None => Self::new(config),
        }
    }

    /// Whether previous responses were restored at startup.
    pub fn loaded_previous(&self) -> bool {
        self.loaded_previous
    }

    /// When the restored responses were saved, if the file recorded it.
    pub fn loaded_saved_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_saved_at
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub fn editor(&self) -> &BoundaryEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut BoundaryEditor {
        &mut self.editor
    }

    pub fn boundaries(&self) -> &BoundaryConfiguration {
        self.editor.committed()
    }

    pub fn save_responses(&self) -> bool {
        self.save_responses
    }

    pub fn set_save_responses(&mut self, enabled: bool) {
        self.save_responses = enabled;
    }

    /// Snapshot of everything the form holds.
    pub fn state(&self) -> FormState {
        FormState {
            fields: self.fields.clone(),
            boundaries: self.editor.committed().clone(),
            save_responses: self.save_responses,
        }
    }

    /// Validates and commits the boundary draft, then auto-saves if enabled.
    ///
    /// A rejected draft leaves the committed configuration and the state
    /// file untouched.
    pub fn commit_boundaries(&mut self) -> Result<(), GeneratorError> {
        self.editor.commit()?;
        log::info!("Boundary types/names updated.");
        if self.save_responses {
            self.save()?;
        }
        Ok(())
    }

    /// Cell sizes and the cubic-cell verdict for the current fields.
    pub fn cell_stats(&self) -> Result<CellStats, GeneratorError> {
        let geometry = self.fields.parse_box()?;
        CellStats::new(&geometry, &self.fields.unit_label(), self.config.uniformity_tolerance)
    }

    /// Builds the document from the current fields and committed boundaries
    /// without touching the file system.
    pub fn render(&self) -> Result<RenderedDict, GeneratorError> {
        let geometry = self.fields.parse_box()?;
        let cell_stats = CellStats::new(&geometry, &self.fields.unit_label(), self.config.uniformity_tolerance)?;
        let scale = self.fields.scale(self.config.scale_policy)?;

        let boundaries = self.editor.committed().trimmed();
        validate_for_generation(&boundaries)?;
        let groups = group_by_name(&boundaries);

        log::debug!(
            "Rendering {:?} cells, scale {}, {} boundary groups ({})",
            geometry.cells,
            scale,
            groups.len(),
            cell_stats.form()
        );
        let document = meshing::serialize(&geometry, &groups, scale);
        Ok(RenderedDict {
            document,
            scale,
            groups,
            cell_stats,
        })
    }

    /// Renders and writes the blockMeshDict, then auto-saves if enabled.
    ///
    /// Nothing is written unless every check passes.
    pub fn generate(&mut self) -> Result<GenerationOutcome, GeneratorError> {
        let rendered = self.render()?;
        let report = meshing::write_block_mesh_dict(
            &self.config.output_path,
            &rendered.document,
            rendered.scale,
            &rendered.groups,
        )?;
        let responses_saved = if self.save_responses {
            let saved = self.save();
            if let Err(e) = &saved {
                log::warn!("blockMeshDict was written but responses were not saved: {}", e);
            }
            Some(saved)
        } else {
            None
        };
        Ok(GenerationOutcome { report, responses_saved })
    }

    /// Writes the state file now, regardless of the auto-save flag.
    pub fn save(&self) -> Result<(), GeneratorError> {
        persistence::save_state(&self.config.state_path, &self.state())
    }

    /// True when every field, face and flag is at its default.
    pub fn is_pristine(&self) -> bool {
        self.state() == FormState::default()
    }

    /// Clears the form, resets every face and turns auto-save off.
    pub fn reset(&mut self) {
        self.fields = FormFields::default();
        self.editor = BoundaryEditor::new(BoundaryConfiguration::default());
        self.save_responses = false;
        log::info!("All responses have been cleared.");
    }
}
