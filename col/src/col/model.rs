use glam::Vec3;

use super::consts::{
    MaterialKind, FOURCC_COL1, FOURCC_COL2, FOURCC_COL3, FOURCC_COL4, MODEL_NAME_SIZE,
};
use super::error::ColError;

/// COL format revision, taken from the chunk fourcc.
///
/// Version 1 shipped with GTA III and Vice City; 2 and 3 with San Andreas
/// (PS2 and PC/Xbox respectively); 4 appears in a handful of SA files.
/// Versions 2 through 4 share one field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Col1 = 1,
    Col2 = 2,
    Col3 = 3,
    Col4 = 4,
}

impl Version {
    pub fn from_fourcc(fourcc: [u8; 4]) -> Option<Self> {
        match fourcc {
            FOURCC_COL1 => Some(Version::Col1),
            FOURCC_COL2 => Some(Version::Col2),
            FOURCC_COL3 => Some(Version::Col3),
            FOURCC_COL4 => Some(Version::Col4),
            _ => None,
        }
    }

    pub fn fourcc(self) -> [u8; 4] {
        match self {
            Version::Col1 => FOURCC_COL1,
            Version::Col2 => FOURCC_COL2,
            Version::Col3 => FOURCC_COL3,
            Version::Col4 => FOURCC_COL4,
        }
    }
}

/// Surface material reference carried per element: an id into the material
/// catalogue plus a flag word. Versions 2+ drop the flag word on the wire
/// for spheres and boxes; it decodes as zero there.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Material {
    pub id: u32,
    pub flags: u32,
}

impl Material {
    /// Catalogue entry for this id, if it is one of the known materials.
    pub fn kind(&self) -> Option<MaterialKind> {
        num_traits::FromPrimitive::from_u32(self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

/// Axis-aligned collision box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColBox {
    pub min: Vec3,
    pub max: Vec3,
    pub material: Material,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
}

/// One collision triangle. Indices point into the owning model's vertex
/// array; decode does not range-check them (see [`Model::validate`]).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Face {
    pub indices: [u16; 3],
    pub material_id: u16,
    pub light: u16,
    /// Only stored on the wire for version 1; zero elsewhere.
    pub flags: u32,
}

/// Stored bounds. Decoded verbatim: files in the wild carry inconsistent
/// values and the codec does not second-guess them.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub center: Vec3,
    pub min: Vec3,
    pub max: Vec3,
    pub radius: f32,
}

/// Element counts for display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    pub spheres: usize,
    pub boxes: usize,
    pub vertices: usize,
    pub faces: usize,
}

impl ModelStats {
    pub fn total_elements(&self) -> usize {
        self.spheres + self.boxes + self.faces
    }
}

/// One collision model, as decoded from a single chunk. Owns all of its
/// element arrays outright; every field is always present (arrays may be
/// empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Up to 21 ASCII characters on the wire, usually the dff name.
    pub name: String,
    pub model_id: u16,
    pub version: Version,
    pub bounds: BoundingVolume,
    pub spheres: Vec<Sphere>,
    pub boxes: Vec<ColBox>,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Model {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            model_id: 0,
            version,
            bounds: BoundingVolume::default(),
            spheres: Vec::new(),
            boxes: Vec::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            spheres: self.spheres.len(),
            boxes: self.boxes.len(),
            vertices: self.vertices.len(),
            faces: self.faces.len(),
        }
    }

    /// Check that every face index lands inside the vertex array.
    ///
    /// Decode deliberately skips this: legacy files violate it and are still
    /// loadable. Run it before using the mesh for collision queries.
    pub fn validate(&self) -> Result<(), ColError> {
        for (face, f) in self.faces.iter().enumerate() {
            for &index in &f.indices {
                if index as usize >= self.vertices.len() {
                    return Err(ColError::InvalidFaceIndex {
                        face,
                        index,
                        vertex_count: self.vertices.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Recompute the bounding volume from the collision geometry. For use
    /// after editing elements; decode keeps whatever the file stored.
    pub fn recalculate_bounds(&mut self) {
        if self.vertices.is_empty() && self.spheres.is_empty() && self.boxes.is_empty() {
            self.bounds = BoundingVolume::default();
            return;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            min = min.min(v.position);
            max = max.max(v.position);
        }
        for s in &self.spheres {
            min = min.min(s.center - Vec3::splat(s.radius));
            max = max.max(s.center + Vec3::splat(s.radius));
        }
        for b in &self.boxes {
            min = min.min(b.min);
            max = max.max(b.max);
        }

        let center = (min + max) / 2.0;
        self.bounds = BoundingVolume {
            center,
            min,
            max,
            radius: (max - center).length(),
        };
    }

    /// Whether the name fits the wire field without truncation.
    pub fn name_fits(&self) -> bool {
        self.name.len() < MODEL_NAME_SIZE && self.name.is_ascii()
    }
}
