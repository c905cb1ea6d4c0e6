//! Decoder and encoder for GTA collision (.col) archives: COL1 through
//! COL4 chunks, the two header layouts, and the defensive handling the
//! format's long modding history requires.

pub mod binaries;
pub mod col;
pub mod prelude;
