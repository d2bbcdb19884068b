// src/form/mod.rs

//! Raw form fields as typed by the user, and their conversion into a box.

use crate::geometry::BoxGeometry;
use crate::kernel::{Extents, Point};
use crate::scale::{resolve_scale, ScalePolicy, ScaleUnit};
use crate::GeneratorError;

/// Field names, in form order. Also the persistence keys.
pub const GEOMETRY_FIELDS: [&str; 9] = [
    "xmin", "ymin", "zmin", "length_x", "length_y", "length_z", "cells_x", "cells_y", "cells_z",
];

/// The unparsed contents of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub xmin: String,
    pub ymin: String,
    pub zmin: String,
    pub length_x: String,
    pub length_y: String,
    pub length_z: String,
    pub cells_x: String,
    pub cells_y: String,
    pub cells_z: String,
    pub scale_unit: String,
    pub custom_sign: String,
    pub custom_exp: String,
}

impl Default for FormFields {
    fn default() -> Self {
        FormFields {
            xmin: String::new(),
            ymin: String::new(),
            zmin: String::new(),
            length_x: String::new(),
            length_y: String::new(),
            length_z: String::new(),
            cells_x: String::new(),
            cells_y: String::new(),
            cells_z: String::new(),
            scale_unit: "m".to_string(),
            custom_sign: "+".to_string(),
            custom_exp: "1".to_string(),
        }
    }
}

impl FormFields {
    /// The nine geometry fields paired with their names.
    pub fn geometry_fields(&self) -> [(&'static str, &str); 9] {
        [
            (GEOMETRY_FIELDS[0], self.xmin.as_str()),
            (GEOMETRY_FIELDS[1], self.ymin.as_str()),
            (GEOMETRY_FIELDS[2], self.zmin.as_str()),
            (GEOMETRY_FIELDS[3], self.length_x.as_str()),
            (GEOMETRY_FIELDS[4], self.length_y.as_str()),
            (GEOMETRY_FIELDS[5], self.length_z.as_str()),
            (GEOMETRY_FIELDS[6], self.cells_x.as_str()),
            (GEOMETRY_FIELDS[7], self.cells_y.as_str()),
            (GEOMETRY_FIELDS[8], self.cells_z.as_str()),
        ]
    }

    /// Mutable access by field name, for front ends that set fields generically.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "xmin" => Some(&mut self.xmin),
            "ymin" => Some(&mut self.ymin),
            "zmin" => Some(&mut self.zmin),
            "length_x" => Some(&mut self.length_x),
            "length_y" => Some(&mut self.length_y),
            "length_z" => Some(&mut self.length_z),
            "cells_x" => Some(&mut self.cells_x),
            "cells_y" => Some(&mut self.cells_y),
            "cells_z" => Some(&mut self.cells_z),
            "scale_unit" => Some(&mut self.scale_unit),
            "custom_sign" => Some(&mut self.custom_sign),
            "custom_exp" => Some(&mut self.custom_exp),
            _ => None,
        }
    }

    /// Parses the geometry fields. Blank fields are reported before any
    /// field is parsed.
    pub fn parse_box(&self) -> Result<BoxGeometry, GeneratorError> {
        let fields = self.geometry_fields();
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(GeneratorError::MissingField(missing));
        }

        let origin = Point::new(
            parse_real("xmin", &self.xmin)?,
            parse_real("ymin", &self.ymin)?,
            parse_real("zmin", &self.zmin)?,
        );
        let extents = Extents::new(
            parse_real("length_x", &self.length_x)?,
            parse_real("length_y", &self.length_y)?,
            parse_real("length_z", &self.length_z)?,
        );
        let cells = [
            parse_count("cells_x", &self.cells_x)?,
            parse_count("cells_y", &self.cells_y)?,
            parse_count("cells_z", &self.cells_z)?,
        ];
        Ok(BoxGeometry::new(origin, extents, cells))
    }

    pub fn scale(&self, policy: ScalePolicy) -> Result<f64, GeneratorError> {
        resolve_scale(&self.scale_unit, &self.custom_sign, &self.custom_exp, policy)
    }

    /// Label used next to cell sizes: the unit, or `1e±N m` for custom scales.
    pub fn unit_label(&self) -> String {
        match ScaleUnit::parse(&self.scale_unit) {
            Some(ScaleUnit::Custom) => format!("1e{}{} m", self.custom_sign, self.custom_exp.trim()),
            _ => self.scale_unit.clone(),
        }
    }
}

fn parse_real(field: &'static str, value: &str) -> Result<f64, GeneratorError> {
    value.trim().parse().map_err(|_| GeneratorError::Parse {
        field,
        value: value.to_string(),
    })
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, GeneratorError> {
    value.trim().parse().map_err(|_| GeneratorError::Parse {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormFields {
        FormFields {
            xmin: "0".to_string(),
            ymin: "-1.5".to_string(),
            zmin: " 2 ".to_string(),
            length_x: "1".to_string(),
            length_y: "3".to_string(),
            length_z: "1e-1".to_string(),
            cells_x: "10".to_string(),
            cells_y: "30".to_string(),
            cells_z: "1".to_string(),
            ..FormFields::default()
        }
    }

    #[test]
    fn test_parse_box() {
        let geometry = filled().parse_box().unwrap();
        assert_eq!(geometry.origin, Point::new(0.0, -1.5, 2.0));
        assert_eq!(geometry.extents, Extents::new(1.0, 3.0, 0.1));
        assert_eq!(geometry.cells, [10, 30, 1]);
    }

    #[test]
    fn test_blank_fields_are_reported_together() {
        let mut fields = filled();
        fields.ymin.clear();
        fields.cells_z = "  ".to_string();
        match fields.parse_box().unwrap_err() {
            GeneratorError::MissingField(missing) => assert_eq!(missing, vec!["ymin", "cells_z"]),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_numbers() {
        let mut fields = filled();
        fields.length_y = "three".to_string();
        assert!(matches!(fields.parse_box(), Err(GeneratorError::Parse { field: "length_y", .. })));

        let mut fields = filled();
        fields.cells_x = "2.5".to_string();
        assert!(matches!(fields.parse_box(), Err(GeneratorError::Parse { field: "cells_x", .. })));

        let mut fields = filled();
        fields.cells_y = "-4".to_string();
        assert!(matches!(fields.parse_box(), Err(GeneratorError::Parse { field: "cells_y", .. })));
    }

    #[test]
    fn test_zero_cells_parse_but_cannot_be_spaced() {
        let mut fields = filled();
        fields.cells_x = "0".to_string();
        let geometry = fields.parse_box().unwrap();
        assert!(matches!(geometry.spacing(), Err(GeneratorError::Division { axis: 'x' })));
    }

    #[test]
    fn test_field_access_by_name() {
        let mut fields = FormFields::default();
        *fields.field_mut("length_z").unwrap() = "4".to_string();
        assert_eq!(fields.length_z, "4");
        assert!(fields.field_mut("volume").is_none());
    }

    #[test]
    fn test_unit_label() {
        let mut fields = FormFields::default();
        assert_eq!(fields.unit_label(), "m");
        fields.scale_unit = "custom..".to_string();
        fields.custom_sign = "-".to_string();
        fields.custom_exp = "6".to_string();
        assert_eq!(fields.unit_label(), "1e-6 m");
    }
}
