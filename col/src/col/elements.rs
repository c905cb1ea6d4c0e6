use std::mem;

use bytemuck::Pod;
use glam::Vec3;

use crate::binaries::ByteReader;

use super::model::{ColBox, Face, Material, Sphere};

/// Version 1 sphere record: center, radius, material id, flag word.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Sphere1 {
    pub center: Vec3,
    pub radius: f32,
    pub material_id: u32,
    pub flags: u32,
}

/// Version 2/3/4 sphere record. No flag word.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Sphere23 {
    pub center: Vec3,
    pub radius: f32,
    pub material_id: u32,
}

#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Box1 {
    pub min: Vec3,
    pub max: Vec3,
    pub material_id: u32,
    pub flags: u32,
}

#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Box23 {
    pub min: Vec3,
    pub max: Vec3,
    pub material_id: u32,
}

/// Version 1 face record. Two pad bytes close the record out to 16.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Face1 {
    pub indices: [u16; 3],
    pub material_id: u16,
    pub light: u16,
    pub flags: u32,
    pub pad: u16,
}

/// Version 2/3/4 face record: the flag word is gone, the padding stays.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Face23 {
    pub indices: [u16; 3],
    pub material_id: u16,
    pub light: u16,
    pub pad: u16,
}

// Vertices are a bare position in every version; the wire record is Vec3.

impl From<Sphere1> for Sphere {
    fn from(s: Sphere1) -> Self {
        Sphere {
            center: s.center,
            radius: s.radius,
            material: Material { id: s.material_id, flags: s.flags },
        }
    }
}

impl From<Sphere> for Sphere1 {
    fn from(s: Sphere) -> Self {
        Sphere1 {
            center: s.center,
            radius: s.radius,
            material_id: s.material.id,
            flags: s.material.flags,
        }
    }
}

impl From<Sphere23> for Sphere {
    fn from(s: Sphere23) -> Self {
        Sphere {
            center: s.center,
            radius: s.radius,
            material: Material { id: s.material_id, flags: 0 },
        }
    }
}

impl From<Sphere> for Sphere23 {
    fn from(s: Sphere) -> Self {
        Sphere23 {
            center: s.center,
            radius: s.radius,
            material_id: s.material.id,
        }
    }
}

impl From<Box1> for ColBox {
    fn from(b: Box1) -> Self {
        ColBox {
            min: b.min,
            max: b.max,
            material: Material { id: b.material_id, flags: b.flags },
        }
    }
}

impl From<ColBox> for Box1 {
    fn from(b: ColBox) -> Self {
        Box1 {
            min: b.min,
            max: b.max,
            material_id: b.material.id,
            flags: b.material.flags,
        }
    }
}

impl From<Box23> for ColBox {
    fn from(b: Box23) -> Self {
        ColBox {
            min: b.min,
            max: b.max,
            material: Material { id: b.material_id, flags: 0 },
        }
    }
}

impl From<ColBox> for Box23 {
    fn from(b: ColBox) -> Self {
        Box23 {
            min: b.min,
            max: b.max,
            material_id: b.material.id,
        }
    }
}

impl From<Face1> for Face {
    fn from(f: Face1) -> Self {
        Face {
            indices: f.indices,
            material_id: f.material_id,
            light: f.light,
            flags: f.flags,
        }
    }
}

impl From<Face> for Face1 {
    fn from(f: Face) -> Self {
        Face1 {
            indices: f.indices,
            material_id: f.material_id,
            light: f.light,
            flags: f.flags,
            pad: 0,
        }
    }
}

impl From<Face23> for Face {
    fn from(f: Face23) -> Self {
        Face {
            indices: f.indices,
            material_id: f.material_id,
            light: f.light,
            flags: 0,
        }
    }
}

impl From<Face> for Face23 {
    fn from(f: Face) -> Self {
        Face23 {
            indices: f.indices,
            material_id: f.material_id,
            light: f.light,
            pad: 0,
        }
    }
}

/// Read up to `count` fixed-size records, stopping early if the payload
/// runs out. Returns the records that fully fit; the caller compares the
/// length against `count` to report the shortfall. Capacity is clamped to
/// what the remaining bytes can hold, so a garbage count cannot force a
/// huge allocation.
pub fn read_records<T: Pod>(r: &mut ByteReader, count: u32) -> Vec<T> {
    let fit = (r.remaining() / mem::size_of::<T>()).min(count as usize);
    let mut out = Vec::with_capacity(fit);
    for _ in 0..count {
        match r.read::<T>() {
            Some(record) => out.push(record),
            None => break,
        }
    }
    out
}
