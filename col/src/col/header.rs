use std::mem;

use glam::Vec3;

use super::consts::{
    BOX_SIZE_COL1, FACE_COUNT_SLACK, FACE_SIZE_COL1, MAX_REASONABLE_FACES, MODEL_NAME_SIZE,
    SPHERE_SIZE_COL1, VERTEX_SIZE,
};

/// Fixed header of a version 1 payload: bounds as radius/center/min/max,
/// then five element counts.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Col1Header {
    pub name: [u8; MODEL_NAME_SIZE],
    pub model_id: u16,
    pub radius: f32,
    pub center: Vec3,
    pub min: Vec3,
    pub max: Vec3,
    pub num_spheres: u32,
    /// Count of an unidentified 4-byte record kind; `num_unknown * 4` bytes
    /// sit between the sphere and box arrays and are skipped.
    pub num_unknown: u32,
    pub num_boxes: u32,
    pub num_vertices: u32,
    pub num_faces: u32,
}

/// Fixed header of a version 2/3/4 payload. Same fields as version 1 minus
/// the unknown count, but the bounds come as min/max/center/radius and the
/// count order is spheres/boxes/faces/vertices. The reordering is format
/// history and is replicated exactly.
#[repr(C, packed)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Col23Header {
    pub name: [u8; MODEL_NAME_SIZE],
    pub model_id: u16,
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub radius: f32,
    pub num_spheres: u32,
    pub num_boxes: u32,
    pub num_faces: u32,
    pub num_vertices: u32,
}

/// Decode the fixed name field: bytes up to the first NUL, with non-ASCII
/// bytes replaced instead of rejected. Legacy tools wrote whatever was in
/// memory here, so this is lossy but total. The flag reports whether any
/// byte was replaced.
pub fn decode_name(raw: &[u8; MODEL_NAME_SIZE]) -> (String, bool) {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let mut clean = true;
    let name = raw[..end]
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                clean = false;
                '?'
            }
        })
        .collect();
    (name, clean)
}

/// Encode a name into the fixed field: at most 21 bytes, NUL padded,
/// non-ASCII characters replaced.
pub fn encode_name(name: &str) -> [u8; MODEL_NAME_SIZE] {
    let mut out = [0u8; MODEL_NAME_SIZE];
    for (slot, c) in out
        .iter_mut()
        .zip(name.chars().take(MODEL_NAME_SIZE - 1))
    {
        *slot = if c.is_ascii() { c as u8 } else { b'?' };
    }
    out
}

/// Garbage face-count recovery for version 1 payloads.
///
/// Some COL1 files in the wild store a junk 32-bit face count (values near
/// 3.2 billion have been observed), which taken at face value would mean an
/// enormous allocation and a read far past the payload. Back-compute how
/// many face records the bytes after the other element arrays can actually
/// hold, and flag the stored count as garbage when it is either absurd in
/// absolute terms or far beyond that capacity. Both checks matter: either
/// alone accepts edge-case files the other rejects.
///
/// Returns the replacement count, or `None` when the stored value is
/// plausible. Never applies to versions 2+, which use a different record
/// size and have not shown this corruption.
pub fn corrected_face_count(header: &Col1Header, payload_len: usize) -> Option<u32> {
    let data_used = header.num_spheres as u64 * SPHERE_SIZE_COL1 as u64
        + header.num_unknown as u64 * 4
        + header.num_boxes as u64 * BOX_SIZE_COL1 as u64
        + header.num_vertices as u64 * VERTEX_SIZE as u64;

    let header_end = mem::size_of::<Col1Header>() as u64;
    let remaining = (payload_len as u64).saturating_sub(header_end + data_used);
    let calculated = remaining / FACE_SIZE_COL1 as u64;

    let stored = header.num_faces as u64;
    if stored > MAX_REASONABLE_FACES || stored > calculated.saturating_mul(FACE_COUNT_SLACK) {
        // calculated <= payload_len / 16 and payloads are u32-sized.
        Some(calculated as u32)
    } else {
        None
    }
}
