// src/meshing/mod.rs

//! Composes the blockMeshDict consumed by OpenFOAM's blockMesh utility.

use crate::boundary::BoundaryGroup;
use crate::geometry::BoxGeometry;
use crate::kernel::Point;
use crate::scale::format_scale;
use crate::GeneratorError;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Default name of the generated file.
pub const DICT_FILE_NAME: &str = "blockMeshDict";

const HEADER: &str = r#"/*--------------------------------*- C++ -*----------------------------------*\
| =========                               |                                 |
| \\      /  F ield        | OpenFOAM: The Open Source CFD Toolbox           |
|  \\    /   O peration    | Version:  v2312                                 |
|   \\  /    A nd          | Website:  www.openfoam.com                      |
|    \\/     M anipulation |                                                 |
\*---------------------------------------------------------------------------*/
FoamFile
{
    version     2.0;
    format      ascii;
    class       dictionary;
    object      blockMeshDict;
}
"#;

const FOOTER: &str = "// ************************************************************************* //\n";

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub path: PathBuf,
    /// SHA-256 of the document, hex encoded.
    pub digest: String,
    pub scale: f64,
    pub groups: Vec<String>,
}

/// Renders the box and its boundary groups as a blockMeshDict.
///
/// Vertices are written in input coordinates; the `scale` entry carries the
/// unit multiplier and blockMesh applies it to every vertex. The block always
/// uses uniform grading and there are no curved edges.
pub fn serialize(geometry: &BoxGeometry, groups: &[BoundaryGroup], scale: f64) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(HEADER);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "\nscale   {};\n", format_scale(scale));

    out.push_str("vertices\n(\n");
    for vertex in geometry.vertices().iter() {
        let _ = writeln!(out, "    {}", format_point(vertex));
    }
    out.push_str(");\n\n");

    let [nx, ny, nz] = geometry.cells;
    out.push_str("blocks\n(\n");
    let _ = writeln!(out, "    hex (0 1 2 3 4 5 6 7) ({} {} {}) simpleGrading (1 1 1)", nx, ny, nz);
    out.push_str(");\n\n");

    out.push_str("edges();\n\n");

    out.push_str(&serialize_boundary(groups));
    out.push('\n');
    out.push_str(FOOTER);
    out
}

/// The `boundary ( ... );` section on its own.
pub fn serialize_boundary(groups: &[BoundaryGroup]) -> String {
    let mut out = String::from("boundary\n(\n");
    for group in groups {
        let _ = write!(
            out,
            "    {}\n    {{\n        type {};\n        faces\n        (\n",
            group.name, group.patch_type
        );
        for [a, b, c, d] in group.quads() {
            let _ = writeln!(out, "            ({} {} {} {})", a, b, c, d);
        }
        out.push_str("        );\n    }\n");
    }
    out.push_str(");\n");
    out
}

/// Shortest round-trip form, always with a fraction or exponent (`0.0`, `2.5`, `1e-7`).
pub fn format_real(value: f64) -> String {
    format!("{:?}", value)
}

fn format_point(p: &Point) -> String {
    format!("({} {} {})", format_real(p.x), format_real(p.y), format_real(p.z))
}

/// Hex-encoded SHA-256 of the document.
pub fn document_digest(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Writes the document to `path`, replacing any previous file only once the
/// new contents are fully on disk.
pub fn write_block_mesh_dict(
    path: &Path,
    document: &str,
    scale: f64,
    groups: &[BoundaryGroup],
) -> Result<GenerationReport, GeneratorError> {
    crate::io::write_atomic(path, document.as_bytes())
        .map_err(|e| GeneratorError::Output(format!("Failed to write {}: {}", path.display(), e)))?;
    let report = GenerationReport {
        path: path.to_path_buf(),
        digest: document_digest(document),
        scale,
        groups: groups.iter().map(|g| g.name.clone()).collect(),
    };
    log::info!("Wrote {} ({} boundary groups, sha256 {})", path.display(), report.groups.len(), report.digest);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{group_by_name, BoundaryConfiguration, Face, PatchType};
    use crate::kernel::Extents;
    use tempfile::tempdir;

    fn cube(side: f64, cells: u32) -> BoxGeometry {
        BoxGeometry::new(Point::origin(), Extents::new(side, side, side), [cells, cells, cells])
    }

    #[test]
    fn test_document_layout() {
        let groups = group_by_name(&BoundaryConfiguration::uniform(PatchType::Wall, "walls"));
        let doc = serialize(&cube(2.0, 2), &groups, 1.0);

        assert!(doc.starts_with("/*--------------------------------*- C++ -*"));
        assert!(doc.contains("    object      blockMeshDict;\n}\n\nscale   1;\n\nvertices\n(\n"));
        assert!(doc.contains("    (0.0 0.0 0.0)\n    (2.0 0.0 0.0)\n    (2.0 2.0 0.0)\n    (0.0 2.0 0.0)\n"));
        assert!(doc.contains("    (0.0 0.0 2.0)\n    (2.0 0.0 2.0)\n    (2.0 2.0 2.0)\n    (0.0 2.0 2.0)\n);\n"));
        assert!(doc.contains("blocks\n(\n    hex (0 1 2 3 4 5 6 7) (2 2 2) simpleGrading (1 1 1)\n);\n\nedges();\n\nboundary\n"));
        assert!(doc.ends_with(");\n\n// ************************************************************************* //\n"));
    }

    #[test]
    fn test_boundary_section_nesting() {
        let config = BoundaryConfiguration::default()
            .with(Face::BottomZmin, PatchType::Wall, "floor")
            .with(Face::TopZmax, PatchType::Patch, "")
            .with(Face::FrontYmax, PatchType::Patch, "")
            .with(Face::BackYmin, PatchType::Patch, "")
            .with(Face::LeftXmin, PatchType::Patch, "")
            .with(Face::RightXmax, PatchType::Wall, "floor");
        let text = serialize_boundary(&group_by_name(&config));
        let expected = "boundary\n(\n\
            \x20   floor\n    {\n        type wall;\n        faces\n        (\n\
            \x20           (0 1 2 3)\n            (1 2 6 5)\n        );\n    }\n\
            \x20   patch\n    {\n        type patch;\n        faces\n        (\n\
            \x20           (4 5 6 7)\n            (2 3 7 6)\n            (0 1 5 4)\n            (0 3 7 4)\n        );\n    }\n\
            );\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_coordinates_keep_parsed_precision() {
        let geometry = BoxGeometry::new(Point::new(0.1, -0.5, 1e-7), Extents::new(0.2, 1.0, 1.0), [1, 1, 1]);
        let doc = serialize(&geometry, &[], 0.001);
        assert!(doc.contains("scale   0.001;"));
        assert!(doc.contains("    (0.1 -0.5 1e-7)\n"));
        // 0.1 + 0.2 is not 0.3 in binary; the exact sum is written.
        assert!(doc.contains("    (0.30000000000000004 -0.5 1e-7)\n"));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let groups = group_by_name(&BoundaryConfiguration::default());
        let a = serialize(&cube(1.0, 4), &groups, 1.0);
        let b = serialize(&cube(1.0, 4), &groups, 1.0);
        assert_eq!(document_digest(&a), document_digest(&b));
    }

    #[test]
    fn test_write_block_mesh_dict_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DICT_FILE_NAME);
        let groups = group_by_name(&BoundaryConfiguration::default());
        let doc = serialize(&cube(1.0, 1), &groups, 1.0);

        let report = write_block_mesh_dict(&path, &doc, 1.0, &groups).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), doc);
        assert_eq!(report.digest, document_digest(&doc));
        assert_eq!(report.digest.len(), 64);
        assert_eq!(report.groups, vec!["patch".to_string()]);
    }
}
