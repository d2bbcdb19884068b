// src/boundary/mod.rs

//! Boundary faces of the box, the patch assigned to each, and the editor
//! that turns user edits into a validated configuration.

pub mod grouping;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use grouping::{group_by_name, BoundaryGroup};
pub use validation::{
    validate_boundary_configuration, validate_for_generation, validate_name, NameError, ValidationError,
    ValidationReport,
};

/// One of the six faces of the hex block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    #[serde(rename = "bottom (zmin)")]
    BottomZmin,
    #[serde(rename = "top (zmax)")]
    TopZmax,
    #[serde(rename = "front (ymax)")]
    FrontYmax,
    #[serde(rename = "back (ymin)")]
    BackYmin,
    #[serde(rename = "left (xmin)")]
    LeftXmin,
    #[serde(rename = "right (xmax)")]
    RightXmax,
}

impl Face {
    /// Every face, in the order boundaries are grouped and written.
    pub const ALL: [Face; 6] = [
        Face::BottomZmin,
        Face::TopZmax,
        Face::FrontYmax,
        Face::BackYmin,
        Face::LeftXmin,
        Face::RightXmax,
    ];

    /// The quad bounding this face, as indices into `geometry::compute_vertices`.
    pub fn vertex_indices(self) -> [usize; 4] {
        match self {
            Face::BottomZmin => [0, 1, 2, 3],
            Face::TopZmax => [4, 5, 6, 7],
            Face::FrontYmax => [2, 3, 7, 6],
            Face::BackYmin => [0, 1, 5, 4],
            Face::LeftXmin => [0, 3, 7, 4],
            Face::RightXmax => [1, 2, 6, 5],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Face::BottomZmin => "bottom (zmin)",
            Face::TopZmax => "top (zmax)",
            Face::FrontYmax => "front (ymax)",
            Face::BackYmin => "back (ymin)",
            Face::LeftXmin => "left (xmin)",
            Face::RightXmax => "right (xmax)",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Face {
    type Err = String;

    /// Accepts the full label ("bottom (zmin)"), the bare side ("bottom")
    /// or the bound ("zmin").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Face::ALL
            .iter()
            .copied()
            .find(|face| {
                let label = face.label();
                let (side, bound) = label.split_once(' ').unwrap_or((label, ""));
                wanted == label || wanted == side || wanted == bound.trim_matches(|c| c == '(' || c == ')')
            })
            .ok_or_else(|| format!("unknown face '{}'", s))
    }
}

/// Boundary condition type written verbatim into the `type` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatchType {
    #[default]
    Patch,
    Wall,
    SymmetryPlane,
    Empty,
    Wedge,
    Cyclic,
}

impl PatchType {
    pub const ALL: [PatchType; 6] = [
        PatchType::Patch,
        PatchType::Wall,
        PatchType::SymmetryPlane,
        PatchType::Empty,
        PatchType::Wedge,
        PatchType::Cyclic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PatchType::Patch => "patch",
            PatchType::Wall => "wall",
            PatchType::SymmetryPlane => "symmetryPlane",
            PatchType::Empty => "empty",
            PatchType::Wedge => "wedge",
            PatchType::Cyclic => "cyclic",
        }
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatchType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown patch type '{}'", s))
    }
}

/// Type and user-supplied name for one face. An empty name means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryAssignment {
    #[serde(rename = "type")]
    pub patch_type: PatchType,
    pub name: String,
}

impl BoundaryAssignment {
    pub fn new(patch_type: PatchType, name: impl Into<String>) -> Self {
        BoundaryAssignment {
            patch_type,
            name: name.into(),
        }
    }

    /// The name this face is written under: its own name, or its type when unnamed.
    pub fn effective_name(&self) -> &str {
        match self.name.trim() {
            "" => self.patch_type.as_str(),
            name => name,
        }
    }
}

/// An assignment for each of the six faces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundaryConfiguration {
    assignments: [BoundaryAssignment; 6],
}

impl BoundaryConfiguration {
    /// Every face set to the same type and name.
    pub fn uniform(patch_type: PatchType, name: &str) -> Self {
        let mut config = BoundaryConfiguration::default();
        for face in Face::ALL {
            config.set(face, BoundaryAssignment::new(patch_type, name));
        }
        config
    }

    pub fn get(&self, face: Face) -> &BoundaryAssignment {
        &self.assignments[face.index()]
    }

    pub fn set(&mut self, face: Face, assignment: BoundaryAssignment) {
        self.assignments[face.index()] = assignment;
    }

    /// Returns a copy with one face replaced.
    pub fn with(mut self, face: Face, patch_type: PatchType, name: &str) -> Self {
        self.set(face, BoundaryAssignment::new(patch_type, name));
        self
    }

    /// Faces and assignments in `Face::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Face, &BoundaryAssignment)> {
        Face::ALL.iter().map(move |&face| (face, self.get(face)))
    }

    /// True when every face carries a non-blank name.
    pub fn is_complete(&self) -> bool {
        self.assignments.iter().all(|a| !a.name.trim().is_empty())
    }

    /// Copy with surrounding whitespace removed from every name.
    pub fn trimmed(&self) -> Self {
        let mut config = self.clone();
        for assignment in config.assignments.iter_mut() {
            assignment.name = assignment.name.trim().to_string();
        }
        config
    }
}

/// Where the boundary configuration is in its edit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// No configuration has been validated yet.
    Unconfigured,
    /// A draft is open and has not passed validation.
    Editing,
    /// The committed configuration passed validation.
    Valid,
}

/// Owns the committed configuration and an optional working draft.
///
/// Edits go to the draft; the committed value is only replaced, never
/// mutated, and only after the whole draft validates.
#[derive(Debug, Clone)]
pub struct BoundaryEditor {
    committed: BoundaryConfiguration,
    draft: Option<BoundaryConfiguration>,
    state: EditorState,
}

impl BoundaryEditor {
    /// Starts from a configuration loaded elsewhere. It counts as `Valid`
    /// only if it passes the save-flow validation.
    pub fn new(committed: BoundaryConfiguration) -> Self {
        let state = settled_state(&committed);
        BoundaryEditor {
            committed,
            draft: None,
            state,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn committed(&self) -> &BoundaryConfiguration {
        &self.committed
    }

    pub fn draft(&self) -> Option<&BoundaryConfiguration> {
        self.draft.as_ref()
    }

    /// Opens a draft seeded from the committed configuration, or returns the open one.
    pub fn begin_edit(&mut self) -> &mut BoundaryConfiguration {
        self.state = EditorState::Editing;
        let committed = &self.committed;
        self.draft.get_or_insert_with(|| committed.clone())
    }

    pub fn set_face(&mut self, face: Face, patch_type: PatchType, name: &str) {
        self.begin_edit().set(face, BoundaryAssignment::new(patch_type, name));
    }

    /// Puts every face of the draft back to an unnamed patch.
    pub fn reset_draft(&mut self) {
        *self.begin_edit() = BoundaryConfiguration::default();
    }

    /// Validates the draft and, on success, makes it the committed configuration.
    ///
    /// On failure the draft stays open and the editor remains `Editing`.
    pub fn commit(&mut self) -> Result<&BoundaryConfiguration, ValidationReport> {
        let draft = self.draft.as_ref().unwrap_or(&self.committed).trimmed();
        if let Err(report) = validate_boundary_configuration(&draft) {
            self.state = EditorState::Editing;
            if self.draft.is_none() {
                self.draft = Some(self.committed.clone());
            }
            log::debug!("Boundary draft rejected: {}", report);
            return Err(report);
        }
        self.committed = draft;
        self.draft = None;
        self.state = EditorState::Valid;
        Ok(&self.committed)
    }

    /// Drops the draft without touching the committed configuration.
    pub fn cancel(&mut self) {
        self.draft = None;
        self.state = settled_state(&self.committed);
    }
}

fn settled_state(config: &BoundaryConfiguration) -> EditorState {
    if validate_boundary_configuration(config).is_ok() {
        EditorState::Valid
    } else {
        EditorState::Unconfigured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_vertex_table() {
        assert_eq!(Face::BottomZmin.vertex_indices(), [0, 1, 2, 3]);
        assert_eq!(Face::TopZmax.vertex_indices(), [4, 5, 6, 7]);
        assert_eq!(Face::FrontYmax.vertex_indices(), [2, 3, 7, 6]);
        assert_eq!(Face::BackYmin.vertex_indices(), [0, 1, 5, 4]);
        assert_eq!(Face::LeftXmin.vertex_indices(), [0, 3, 7, 4]);
        assert_eq!(Face::RightXmax.vertex_indices(), [1, 2, 6, 5]);
    }

    #[test]
    fn test_face_parsing() {
        assert_eq!("bottom (zmin)".parse::<Face>().unwrap(), Face::BottomZmin);
        assert_eq!("Top".parse::<Face>().unwrap(), Face::TopZmax);
        assert_eq!("ymin".parse::<Face>().unwrap(), Face::BackYmin);
        assert!("middle".parse::<Face>().is_err());
    }

    #[test]
    fn test_patch_type_round_trips_through_strings() {
        for t in PatchType::ALL {
            assert_eq!(t.as_str().parse::<PatchType>().unwrap(), t);
        }
        assert!("Wall".parse::<PatchType>().is_err());
        assert_eq!(serde_json::to_string(&PatchType::SymmetryPlane).unwrap(), "\"symmetryPlane\"");
    }

    #[test]
    fn test_effective_name_falls_back_to_type() {
        assert_eq!(BoundaryAssignment::new(PatchType::Wall, "").effective_name(), "wall");
        assert_eq!(BoundaryAssignment::new(PatchType::Wall, "   ").effective_name(), "wall");
        assert_eq!(BoundaryAssignment::new(PatchType::Patch, " inlet ").effective_name(), "inlet");
    }

    #[test]
    fn test_configuration_completeness() {
        let mut config = BoundaryConfiguration::uniform(PatchType::Wall, "walls");
        assert!(config.is_complete());
        config.set(Face::LeftXmin, BoundaryAssignment::new(PatchType::Patch, " "));
        assert!(!config.is_complete());
        assert!(!BoundaryConfiguration::default().is_complete());
    }

    #[test]
    fn test_editor_commits_valid_draft() {
        let mut editor = BoundaryEditor::new(BoundaryConfiguration::default());
        assert_eq!(editor.state(), EditorState::Unconfigured);

        for face in Face::ALL {
            editor.set_face(face, PatchType::Wall, " walls ");
        }
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.committed(), &BoundaryConfiguration::default());

        let committed = editor.commit().unwrap().clone();
        assert_eq!(committed.get(Face::TopZmax).name, "walls");
        assert_eq!(editor.state(), EditorState::Valid);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_editor_keeps_committed_value_on_rejection() {
        let valid = BoundaryConfiguration::uniform(PatchType::Wall, "walls");
        let mut editor = BoundaryEditor::new(valid.clone());
        assert_eq!(editor.state(), EditorState::Valid);

        editor.set_face(Face::FrontYmax, PatchType::Patch, "3rd");
        let report = editor.commit().unwrap_err();
        assert_eq!(report.to_string(), "Error for 'front (ymax)': Boundary name cannot start with a number.");
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.committed(), &valid);
        assert_eq!(editor.draft().unwrap().get(Face::FrontYmax).name, "3rd");

        editor.cancel();
        assert_eq!(editor.state(), EditorState::Valid);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_editor_reset_draft() {
        let mut editor = BoundaryEditor::new(BoundaryConfiguration::uniform(PatchType::Wall, "walls"));
        editor.reset_draft();
        assert_eq!(editor.draft(), Some(&BoundaryConfiguration::default()));
        // An all-empty draft cannot be saved.
        assert!(editor.commit().is_err());
    }
}
