use std::fmt;
use std::io;

use thiserror::Error;

use super::model::Version;

/// Hard failures. Only the file helpers and per-chunk header decode produce
/// these; buffer-level decode reports problems through [`DecodeWarning`]
/// instead of aborting.
#[derive(Debug, Error)]
pub enum ColError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("payload too short for a {version:?} header ({len} bytes)")]
    HeaderTooShort { version: Version, len: usize },

    #[error("face {face} references vertex {index} but the model has {vertex_count} vertices")]
    InvalidFaceIndex {
        face: usize,
        index: u16,
        vertex_count: usize,
    },
}

/// Non-fatal decode events, returned alongside whatever decoded cleanly.
///
/// A file that produced warnings is still usable data; hosts should surface
/// these separately from "load failed".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeWarning {
    /// Trailing bytes too short to hold a chunk header.
    #[error("chunk header truncated at offset {offset} ({remaining} bytes remain)")]
    HeaderTruncated { offset: usize, remaining: usize },

    /// Unrecognized signature; everything from this offset on is abandoned.
    #[error("unrecognized fourcc {fourcc:?} at offset {offset}, decode stopped")]
    UnknownFourcc { offset: usize, fourcc: [u8; 4] },

    /// A chunk declared more payload than the buffer holds.
    #[error("chunk at offset {offset} declares {declared} payload bytes but only {available} remain")]
    ChunkTooLong {
        offset: usize,
        declared: u32,
        available: usize,
    },

    /// A chunk framed correctly but its payload could not hold the fixed
    /// header; the chunk was skipped.
    #[error("model {model}: {version:?} payload too short for its header, chunk skipped")]
    BadHeader { model: usize, version: Version },

    /// A COL1 stored face count failed the plausibility check and was
    /// replaced by the value back-computed from the remaining bytes.
    #[error("model {model}: garbage face count {stored}, using {calculated}")]
    FaceCountCorrected {
        model: usize,
        stored: u32,
        calculated: u32,
    },

    /// An element array ran out of payload before its declared count.
    #[error("model {model}: {kind} truncated, kept {kept} of {declared}")]
    ElementsTruncated {
        model: usize,
        kind: ElementKind,
        declared: u32,
        kept: usize,
    },

    /// The name field held non-ASCII bytes, which were replaced.
    #[error("model {model}: name contains non-ASCII bytes")]
    LossyName { model: usize },

    /// The safety bound on chunks per buffer was hit.
    #[error("stopped after {limit} chunks")]
    TooManyChunks { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Spheres,
    Boxes,
    Vertices,
    Faces,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Spheres => "spheres",
            ElementKind::Boxes => "boxes",
            ElementKind::Vertices => "vertices",
            ElementKind::Faces => "faces",
        };
        f.write_str(name)
    }
}
