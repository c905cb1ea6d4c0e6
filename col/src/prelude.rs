pub use crate::binaries::{ByteReader, ByteWriter};
pub use crate::col::consts::MaterialKind;
pub use crate::col::{
    decode, encode, BoundingVolume, ColBox, ColError, ColFile, DecodeWarning, ElementKind, Face,
    Material, Model, ModelStats, Sphere, Version, Vertex,
};
