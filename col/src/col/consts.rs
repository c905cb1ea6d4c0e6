use num_derive::FromPrimitive;

// Chunk signatures. "COLL" is the GTA III / Vice City format; San Andreas
// bumped the last byte to a binary version number.
pub const FOURCC_COL1: [u8; 4] = *b"COLL";
pub const FOURCC_COL2: [u8; 4] = *b"COL\x02";
pub const FOURCC_COL3: [u8; 4] = *b"COL\x03";
pub const FOURCC_COL4: [u8; 4] = *b"COL\x04";

/// Chunk header: fourcc + little-endian payload size.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// On-wire model name field, NUL padded. Usable length is one byte less.
pub const MODEL_NAME_SIZE: usize = 22;

// Fixed per-element record sizes. COL1 carries a flag word on spheres and
// boxes and on faces; COL2/3/4 dropped it.
pub const SPHERE_SIZE_COL1: usize = 24;
pub const SPHERE_SIZE_COL23: usize = 20;
pub const BOX_SIZE_COL1: usize = 32;
pub const BOX_SIZE_COL23: usize = 28;
pub const VERTEX_SIZE: usize = 12;
pub const FACE_SIZE_COL1: usize = 16;
pub const FACE_SIZE_COL23: usize = 12;

/// Upper bound on chunks decoded from a single buffer. Corrupted length
/// fields that still advance the cursor could otherwise spin for a very
/// long time on large garbage inputs.
pub const MAX_MODELS_PER_FILE: usize = 10_000;

/// Stored face counts above this are treated as garbage regardless of how
/// big the payload is. Real models top out well below it.
pub const MAX_REASONABLE_FACES: u64 = 1_000_000;

/// Stored face counts more than this factor over what the remaining payload
/// can actually hold are treated as garbage too.
pub const FACE_COUNT_SLACK: u64 = 10;

/// Known collision surface materials, for display and tooling. The id field
/// on elements is wider than this catalogue; unknown values are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum MaterialKind {
    Default = 0,
    Tarmac = 1,
    TarmacCracked = 2,
    RumbleStrip = 3,
    Concrete = 4,
    ConcreteDusty = 5,
    Metal = 6,
    Wood = 7,
    Gravel = 8,
    Water = 9,
    Glass = 10,
    Sand = 11,
    Pavement = 12,
    Cardboard = 13,
    Carpet = 14,
    Tile = 15,
    Hedge = 16,
    Container = 17,
}
