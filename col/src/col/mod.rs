pub mod consts;
pub mod elements;
pub mod error;
pub mod header;
pub mod model;

pub use error::{ColError, DecodeWarning, ElementKind};
pub use model::{BoundingVolume, ColBox, Face, Material, Model, ModelStats, Sphere, Version, Vertex};

use std::fs;
use std::path::Path;

use glam::Vec3;

use crate::binaries::{ByteReader, ByteWriter};

use consts::{CHUNK_HEADER_SIZE, MAX_MODELS_PER_FILE};
use elements::{read_records, Box1, Box23, Face1, Face23, Sphere1, Sphere23};
use header::{corrected_face_count, decode_name, encode_name, Col1Header, Col23Header};

// https://gtamods.com/wiki/Collision_File
//
// A COL file holds the collision geometry the engine uses for physics
// queries: a bounding sphere and box per model, then optional collision
// spheres, boxes, and a triangle mesh. One file concatenates any number of
// models back to back with no file-level header, footer, or padding; each
// model is a self-contained chunk of `fourcc || u32 size || payload`, where
// the size excludes the 8 header bytes.
//
// "COLL" chunks (GTA III / Vice City) and the binary-versioned "COL\x02",
// "COL\x03", "COL\x04" chunks (San Andreas) differ in the fixed header field
// order and in the per-element record sizes; versions 2 through 4 share one
// layout. All multi-byte fields are little-endian. Like the game itself and
// the modding tools around it, this reader assumes a little-endian host and
// maps the wire records straight onto packed structs.
//
// Files in the wild are frequently damaged: garbage element counts (face
// counts in the billions), truncated element arrays, name fields holding
// raw memory. Decode therefore never gives up on the whole buffer because
// one value is implausible; it corrects or truncates what it can, reports
// each incident as a `DecodeWarning`, and returns every model that framed
// correctly.

/// Decode every COL chunk in `data`.
///
/// Partial success by design: models already decoded are returned even when
/// a later chunk is unreadable, and per-model corruption (garbage face
/// count, truncated arrays, dirty name bytes) degrades to a warning rather
/// than a failure. An unparseable buffer yields an empty model list, not an
/// error.
pub fn decode(data: &[u8]) -> (Vec<Model>, Vec<DecodeWarning>) {
    let mut models = Vec::new();
    let mut warnings = Vec::new();
    let mut r = ByteReader::new(data);

    while r.remaining() > 0 {
        if models.len() >= MAX_MODELS_PER_FILE {
            warnings.push(DecodeWarning::TooManyChunks { limit: MAX_MODELS_PER_FILE });
            break;
        }
        let chunk_start = r.pos();
        if r.remaining() < CHUNK_HEADER_SIZE {
            warnings.push(DecodeWarning::HeaderTruncated {
                offset: chunk_start,
                remaining: r.remaining(),
            });
            break;
        }

        let Some(fourcc) = r.read::<[u8; 4]>() else { break };
        let Some(declared) = r.read::<u32>() else { break };

        let Some(version) = Version::from_fourcc(fourcc) else {
            warnings.push(DecodeWarning::UnknownFourcc { offset: chunk_start, fourcc });
            break;
        };

        let Some(payload) = r.take(declared as usize) else {
            log::warn!(
                "chunk at {chunk_start} declares {declared} bytes, only {} remain",
                r.remaining()
            );
            warnings.push(DecodeWarning::ChunkTooLong {
                offset: chunk_start,
                declared,
                available: r.remaining(),
            });
            break;
        };
        // The fourcc and size reads above always advance the cursor.
        debug_assert!(r.pos() > chunk_start);

        let index = models.len();
        match decode_model(version, payload, index, &mut warnings) {
            Ok(model) => models.push(model),
            Err(e) => {
                // Framing was intact, so the next chunk is still reachable.
                log::warn!("model {index}: {e}");
                warnings.push(DecodeWarning::BadHeader { model: index, version });
            }
        }
    }

    (models, warnings)
}

/// Encode models back to a COL buffer, in input order. Deterministic: the
/// same models always produce the same bytes.
pub fn encode(models: &[Model]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    for model in models {
        let payload = match model.version {
            Version::Col1 => encode_col1(model),
            _ => encode_col23(model),
        };
        w.write_bytes(&model.version.fourcc());
        w.write(&(payload.len() as u32));
        w.write_bytes(&payload);
    }
    w.into_inner()
}

fn decode_model(
    version: Version,
    payload: &[u8],
    index: usize,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<Model, ColError> {
    match version {
        Version::Col1 => decode_col1(payload, index, warnings),
        _ => decode_col23(version, payload, index, warnings),
    }
}

fn decode_col1(
    payload: &[u8],
    index: usize,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<Model, ColError> {
    let mut r = ByteReader::new(payload);
    let header: Col1Header = r.read().ok_or(ColError::HeaderTooShort {
        version: Version::Col1,
        len: payload.len(),
    })?;

    let raw_name = header.name;
    let (name, clean) = decode_name(&raw_name);
    if !clean {
        warnings.push(DecodeWarning::LossyName { model: index });
    }

    let mut num_faces = header.num_faces;
    if let Some(calculated) = corrected_face_count(&header, payload.len()) {
        log::warn!(
            "model {index}: garbage face count {num_faces} (capacity {calculated}), correcting"
        );
        warnings.push(DecodeWarning::FaceCountCorrected {
            model: index,
            stored: num_faces,
            calculated,
        });
        num_faces = calculated;
    }

    let spheres: Vec<Sphere1> = read_records(&mut r, header.num_spheres);
    note_truncation(warnings, index, ElementKind::Spheres, header.num_spheres, spheres.len());

    // Unidentified 4-byte records between spheres and boxes; skipped on
    // read, written back as zero count.
    let unknown_bytes = (header.num_unknown as usize).saturating_mul(4);
    if !r.skip(unknown_bytes) {
        r.skip(r.remaining());
    }

    let boxes: Vec<Box1> = read_records(&mut r, header.num_boxes);
    note_truncation(warnings, index, ElementKind::Boxes, header.num_boxes, boxes.len());

    let vertices: Vec<Vec3> = read_records(&mut r, header.num_vertices);
    note_truncation(warnings, index, ElementKind::Vertices, header.num_vertices, vertices.len());

    let faces: Vec<Face1> = read_records(&mut r, num_faces);
    note_truncation(warnings, index, ElementKind::Faces, num_faces, faces.len());

    Ok(Model {
        name,
        model_id: header.model_id,
        version: Version::Col1,
        bounds: BoundingVolume {
            center: header.center,
            min: header.min,
            max: header.max,
            radius: header.radius,
        },
        spheres: spheres.into_iter().map(Sphere::from).collect(),
        boxes: boxes.into_iter().map(ColBox::from).collect(),
        vertices: vertices.into_iter().map(|position| Vertex { position }).collect(),
        faces: faces.into_iter().map(Face::from).collect(),
    })
}

fn decode_col23(
    version: Version,
    payload: &[u8],
    index: usize,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<Model, ColError> {
    let mut r = ByteReader::new(payload);
    let header: Col23Header = r.read().ok_or(ColError::HeaderTooShort {
        version,
        len: payload.len(),
    })?;

    let raw_name = header.name;
    let (name, clean) = decode_name(&raw_name);
    if !clean {
        warnings.push(DecodeWarning::LossyName { model: index });
    }

    // No face-count recovery here: the 12-byte record and the different
    // count order mean the COL1 corruption pattern does not apply.
    let spheres: Vec<Sphere23> = read_records(&mut r, header.num_spheres);
    note_truncation(warnings, index, ElementKind::Spheres, header.num_spheres, spheres.len());

    let boxes: Vec<Box23> = read_records(&mut r, header.num_boxes);
    note_truncation(warnings, index, ElementKind::Boxes, header.num_boxes, boxes.len());

    let vertices: Vec<Vec3> = read_records(&mut r, header.num_vertices);
    note_truncation(warnings, index, ElementKind::Vertices, header.num_vertices, vertices.len());

    let faces: Vec<Face23> = read_records(&mut r, header.num_faces);
    note_truncation(warnings, index, ElementKind::Faces, header.num_faces, faces.len());

    Ok(Model {
        name,
        model_id: header.model_id,
        version,
        bounds: BoundingVolume {
            center: header.center,
            min: header.min,
            max: header.max,
            radius: header.radius,
        },
        spheres: spheres.into_iter().map(Sphere::from).collect(),
        boxes: boxes.into_iter().map(ColBox::from).collect(),
        vertices: vertices.into_iter().map(|position| Vertex { position }).collect(),
        faces: faces.into_iter().map(Face::from).collect(),
    })
}

fn note_truncation(
    warnings: &mut Vec<DecodeWarning>,
    model: usize,
    kind: ElementKind,
    declared: u32,
    kept: usize,
) {
    if kept < declared as usize {
        log::warn!("model {model}: {kind} truncated, kept {kept} of {declared}");
        warnings.push(DecodeWarning::ElementsTruncated { model, kind, declared, kept });
    }
}

fn encode_col1(model: &Model) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write(&Col1Header {
        name: encode_name(&model.name),
        model_id: model.model_id,
        radius: model.bounds.radius,
        center: model.bounds.center,
        min: model.bounds.min,
        max: model.bounds.max,
        num_spheres: model.spheres.len() as u32,
        num_unknown: 0,
        num_boxes: model.boxes.len() as u32,
        num_vertices: model.vertices.len() as u32,
        num_faces: model.faces.len() as u32,
    });
    for &s in &model.spheres {
        w.write(&Sphere1::from(s));
    }
    for &b in &model.boxes {
        w.write(&Box1::from(b));
    }
    for v in &model.vertices {
        w.write(&v.position);
    }
    for &f in &model.faces {
        w.write(&Face1::from(f));
    }
    w.into_inner()
}

fn encode_col23(model: &Model) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write(&Col23Header {
        name: encode_name(&model.name),
        model_id: model.model_id,
        min: model.bounds.min,
        max: model.bounds.max,
        center: model.bounds.center,
        radius: model.bounds.radius,
        num_spheres: model.spheres.len() as u32,
        num_boxes: model.boxes.len() as u32,
        num_faces: model.faces.len() as u32,
        num_vertices: model.vertices.len() as u32,
    });
    for &s in &model.spheres {
        w.write(&Sphere23::from(s));
    }
    for &b in &model.boxes {
        w.write(&Box23::from(b));
    }
    for v in &model.vertices {
        w.write(&v.position);
    }
    for &f in &model.faces {
        w.write(&Face23::from(f));
    }
    w.into_inner()
}

/// An ordered collection of collision models, the in-memory form of one
/// .col file. The container owns its models outright.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColFile {
    pub models: Vec<Model>,
}

impl ColFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(data: &[u8]) -> (Self, Vec<DecodeWarning>) {
        let (models, warnings) = decode(data);
        (Self { models }, warnings)
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(&self.models)
    }

    /// Read and decode a .col file. I/O failures are hard errors; decode
    /// problems come back as warnings as usual.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, Vec<DecodeWarning>), ColError> {
        let data = fs::read(path)?;
        Ok(Self::decode(&data))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ColError> {
        fs::write(path, self.encode())?;
        Ok(())
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    /// Remove and return the model at `index`, if it exists.
    pub fn remove_model(&mut self, index: usize) -> Option<Model> {
        (index < self.models.len()).then(|| self.models.remove(index))
    }

    /// Summed element counts across all models, for display.
    pub fn total_stats(&self) -> ModelStats {
        let mut total = ModelStats::default();
        for m in &self.models {
            let s = m.stats();
            total.spheres += s.spheres;
            total.boxes += s.boxes;
            total.vertices += s.vertices;
            total.faces += s.faces;
        }
        total
    }
}

#[cfg(test)]
mod col_tests {
    use glam::Vec3;

    use super::consts::FACE_SIZE_COL1;
    use super::*;

    fn test_model(name: &str, version: Version) -> Model {
        let mut model = Model::new(name, version);
        model.model_id = 211;
        model.bounds = BoundingVolume {
            center: Vec3::new(0.5, 0.5, 0.5),
            min: Vec3::new(-1.0, -2.0, -3.0),
            max: Vec3::new(2.0, 3.0, 4.0),
            radius: 5.25,
        };
        model.spheres = vec![Sphere {
            center: Vec3::new(1.0, 2.0, 3.0),
            radius: 0.75,
            material: Material { id: 4, flags: 0 },
        }];
        model.boxes = vec![ColBox {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
            material: Material { id: 6, flags: 0 },
        }];
        model.vertices = vec![
            Vertex { position: Vec3::new(0.0, 0.0, 0.0) },
            Vertex { position: Vec3::new(1.0, 0.0, 0.0) },
            Vertex { position: Vec3::new(0.0, 1.0, 0.0) },
        ];
        model.faces = vec![Face {
            indices: [0, 1, 2],
            material_id: 1,
            light: 2,
            flags: 0,
        }];
        model
    }

    #[test]
    fn round_trip_col1() {
        let mut model = test_model("landstal", Version::Col1);
        // COL1 is the only version that keeps per-face flags and per-element
        // material flags on the wire.
        model.faces[0].flags = 0x10;
        model.spheres[0].material.flags = 1;
        model.boxes[0].material.flags = 2;

        let bytes = encode(std::slice::from_ref(&model));
        let (models, warnings) = decode(&bytes);
        assert_eq!(warnings, vec![]);
        assert_eq!(models, vec![model]);
    }

    #[test]
    fn round_trip_col23() {
        for version in [Version::Col2, Version::Col3, Version::Col4] {
            let model = test_model("bistro", version);
            let bytes = encode(std::slice::from_ref(&model));
            let (models, warnings) = decode(&bytes);
            assert_eq!(warnings, vec![]);
            assert_eq!(models, vec![model]);
        }
    }

    #[test]
    fn fourcc_selects_the_layout() {
        for version in [Version::Col1, Version::Col2, Version::Col3, Version::Col4] {
            let bytes = encode(&[test_model("any", version)]);
            assert_eq!(&bytes[..4], &version.fourcc());
            let (models, _) = decode(&bytes);
            assert_eq!(models[0].version, version);
        }
    }

    #[test]
    fn unknown_fourcc_stops_without_models() {
        let mut bytes = b"COLX".to_vec();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let (models, warnings) = decode(&bytes);
        assert!(models.is_empty());
        assert_eq!(
            warnings,
            vec![DecodeWarning::UnknownFourcc { offset: 0, fourcc: *b"COLX" }]
        );
    }

    #[test]
    fn garbage_face_count_is_corrected() {
        // Empty COL1 model, then a face count stamped to u32::MAX with only
        // three records' worth of payload behind it.
        let mut model = test_model("garbage", Version::Col1);
        model.spheres.clear();
        model.boxes.clear();
        model.vertices.clear();
        model.faces.clear();

        let mut bytes = encode(&[model]);
        // Payload offsets: fixed header is 84 bytes, face count is its last
        // field; the chunk header adds 8.
        let face_count_at = 8 + 84 - 4;
        bytes[face_count_at..face_count_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&vec![0u8; 3 * FACE_SIZE_COL1]);
        let size_at = 4;
        let new_size = (bytes.len() - 8) as u32;
        bytes[size_at..size_at + 4].copy_from_slice(&new_size.to_le_bytes());

        let (models, warnings) = decode(&bytes);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].faces.len(), 3);
        assert!(warnings.contains(&DecodeWarning::FaceCountCorrected {
            model: 0,
            stored: u32::MAX,
            calculated: 3,
        }));
    }

    #[test]
    fn oversized_chunk_is_dropped_but_earlier_models_survive() {
        let mut bytes = encode(&[test_model("ok", Version::Col1)]);
        let second_start = bytes.len();
        bytes.extend_from_slice(b"COL\x03");
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);

        let (models, warnings) = decode(&bytes);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "ok");
        assert_eq!(
            warnings,
            vec![DecodeWarning::ChunkTooLong {
                offset: second_start,
                declared: 1000,
                available: 16,
            }]
        );
    }

    #[test]
    fn mixed_versions_decode_in_order() {
        let input = vec![
            test_model("first", Version::Col1),
            test_model("second", Version::Col3),
            test_model("third", Version::Col2),
        ];
        let (models, warnings) = decode(&encode(&input));
        assert_eq!(warnings, vec![]);
        assert_eq!(models, input);
    }

    #[test]
    fn non_ascii_name_byte_is_replaced_not_fatal() {
        let mut bytes = encode(&[test_model("dirty", Version::Col2)]);
        // First name byte sits right after the chunk header.
        bytes[8] = 0xff;
        let (models, warnings) = decode(&bytes);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "?irty");
        assert!(warnings.contains(&DecodeWarning::LossyName { model: 0 }));
    }

    #[test]
    fn empty_and_sub_header_inputs_yield_no_models() {
        let (models, warnings) = decode(&[]);
        assert!(models.is_empty());
        assert!(warnings.is_empty());

        let (models, warnings) = decode(&[b'C', b'O', b'L', b'L', 0, 0, 0]);
        assert!(models.is_empty());
        assert_eq!(
            warnings,
            vec![DecodeWarning::HeaderTruncated { offset: 0, remaining: 7 }]
        );
    }

    #[test]
    fn truncated_element_arrays_are_partial_not_fatal() {
        let mut model = test_model("cut", Version::Col3);
        model.vertices.clear();
        model.faces.clear();
        let mut bytes = encode(&[model]);
        // Drop the last box record's final 8 bytes.
        bytes.truncate(bytes.len() - 8);
        let size_at = 4;
        let new_size = (bytes.len() - 8) as u32;
        bytes[size_at..size_at + 4].copy_from_slice(&new_size.to_le_bytes());

        let (models, warnings) = decode(&bytes);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].spheres.len(), 1);
        assert!(models[0].boxes.is_empty());
        assert!(warnings.contains(&DecodeWarning::ElementsTruncated {
            model: 0,
            kind: ElementKind::Boxes,
            declared: 1,
            kept: 0,
        }));
    }

    #[test]
    fn short_payload_skips_the_chunk_and_continues() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"COLL");
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 10]);
        bytes.extend_from_slice(&encode(&[test_model("after", Version::Col2)]));

        let (models, warnings) = decode(&bytes);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "after");
        assert!(warnings.contains(&DecodeWarning::BadHeader {
            model: 0,
            version: Version::Col1,
        }));
    }

    #[test]
    fn container_mutation_and_stats() {
        let mut file = ColFile::new();
        file.add_model(test_model("a", Version::Col1));
        file.add_model(test_model("b", Version::Col3));
        assert_eq!(file.total_stats().vertices, 6);
        assert_eq!(file.total_stats().total_elements(), 6);

        assert!(file.remove_model(5).is_none());
        let removed = file.remove_model(0).unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(file.models.len(), 1);

        let (decoded, _) = ColFile::decode(&file.encode());
        assert_eq!(decoded, file);
    }

    #[test]
    fn encode_is_deterministic() {
        let input = vec![
            test_model("det", Version::Col1),
            test_model("det2", Version::Col4),
        ];
        assert_eq!(encode(&input), encode(&input));
    }
}
