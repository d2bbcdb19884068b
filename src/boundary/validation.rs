// src/boundary/validation.rs

//! Name rules and name/type conflict detection for boundary configurations.

use super::{BoundaryConfiguration, Face, PatchType};
use std::fmt;
use thiserror::Error;

/// Why a boundary name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Boundary name cannot be empty.")]
    EmptyName,
    #[error("Boundary name cannot start with a number.")]
    LeadingDigit,
    #[error("Boundary name cannot contain '#' or '/'.")]
    ForbiddenCharacter,
    #[error("Boundary name can only contain alphanumeric characters and underscores.")]
    InvalidIdentifier,
}

/// Checks a user-entered name and returns it trimmed.
///
/// The checks run in a fixed order and the first failure wins, so a given
/// bad name always produces the same message.
pub fn validate_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();
    let first = name.chars().next().ok_or(NameError::EmptyName)?;
    if first.is_ascii_digit() {
        return Err(NameError::LeadingDigit);
    }
    if name.contains(['#', '/']) {
        return Err(NameError::ForbiddenCharacter);
    }
    if !is_identifier(name) {
        return Err(NameError::InvalidIdentifier);
    }
    Ok(name.to_string())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// A problem found in a boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error for '{face}': {error}")]
    Name { face: Face, error: NameError },

    #[error("Same boundary name '{name}' has different types!")]
    Conflict {
        name: String,
        first_face: Face,
        first_type: PatchType,
        face: Face,
        patch_type: PatchType,
    },
}

/// Every problem found in one validation pass, per-face name errors first
/// (in face order), then conflicts.
///
/// Displays as the first problem only; that is the one shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn first(&self) -> &ValidationError {
        // Reports are only built from a non-empty error list.
        &self.errors[0]
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_conflict(&self) -> bool {
        self.errors.iter().any(|e| matches!(e, ValidationError::Conflict { .. }))
    }

    /// The first error recorded against `face`.
    pub fn for_face(&self, face: Face) -> Option<&ValidationError> {
        self.errors.iter().find(|e| match e {
            ValidationError::Name { face: f, .. } => *f == face,
            ValidationError::Conflict { first_face, face: f, .. } => *f == face || *first_face == face,
        })
    }

    fn from_errors(errors: Vec<ValidationError>) -> Result<(), ValidationReport> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors })
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.first())
    }
}

impl std::error::Error for ValidationReport {}

/// Validation used when saving the configuration: every face must carry a
/// valid name, and faces sharing a name must share a type.
pub fn validate_boundary_configuration(config: &BoundaryConfiguration) -> Result<(), ValidationReport> {
    let mut errors: Vec<ValidationError> = config
        .iter()
        .filter_map(|(face, assignment)| {
            validate_name(&assignment.name)
                .err()
                .map(|error| ValidationError::Name { face, error })
        })
        .collect();
    errors.extend(detect_conflicts(config));
    ValidationReport::from_errors(errors)
}

/// Validation used before writing output. Unnamed faces are allowed since
/// they are written under their type name; named faces must still pass the
/// name rules, and the resolved names must not conflict.
pub fn validate_for_generation(config: &BoundaryConfiguration) -> Result<(), ValidationReport> {
    let mut errors: Vec<ValidationError> = config
        .iter()
        .filter(|(_, assignment)| !assignment.name.trim().is_empty())
        .filter_map(|(face, assignment)| {
            validate_name(&assignment.name)
                .err()
                .map(|error| ValidationError::Name { face, error })
        })
        .collect();
    errors.extend(detect_conflicts(config));
    ValidationReport::from_errors(errors)
}

/// Finds faces whose resolved name was already claimed by a face of another type.
///
/// Each face is compared with the first face seen under the same name. Any
/// disagreement within a name shows up against that first face, so every
/// conflicting pair is caught.
fn detect_conflicts(config: &BoundaryConfiguration) -> Vec<ValidationError> {
    let mut seen: Vec<(&str, Face, PatchType)> = Vec::with_capacity(Face::ALL.len());
    let mut conflicts = Vec::new();
    for (face, assignment) in config.iter() {
        let name = assignment.effective_name();
        match seen.iter().find(|(n, _, _)| *n == name) {
            Some(&(_, first_face, first_type)) if first_type != assignment.patch_type => {
                conflicts.push(ValidationError::Conflict {
                    name: name.to_string(),
                    first_face,
                    first_type,
                    face,
                    patch_type: assignment.patch_type,
                });
            }
            Some(_) => {}
            None => seen.push((name, face, assignment.patch_type)),
        }
    }
    conflicts
}
