// src/boundary/grouping.rs

//! Folds faces that share a name into one boundary entry.

use super::{BoundaryConfiguration, Face, PatchType};

/// One named entry of the `boundary` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryGroup {
    pub name: String,
    pub patch_type: PatchType,
    pub faces: Vec<Face>,
}

impl BoundaryGroup {
    /// Vertex quads of the member faces, in membership order.
    pub fn quads(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        self.faces.iter().map(|face| face.vertex_indices())
    }
}

/// Groups faces by their effective name, in `Face::ALL` order.
///
/// Groups appear in the order their name is first seen, so the output is
/// stable across runs. The group type is taken from its first member; type
/// agreement is the job of `validate_for_generation`, which must run first.
pub fn group_by_name(config: &BoundaryConfiguration) -> Vec<BoundaryGroup> {
    let mut groups: Vec<BoundaryGroup> = Vec::new();
    for (face, assignment) in config.iter() {
        let name = assignment.effective_name();
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.faces.push(face),
            None => groups.push(BoundaryGroup {
                name: name.to_string(),
                patch_type: assignment.patch_type,
                faces: vec![face],
            }),
        }
    }
    groups
}
