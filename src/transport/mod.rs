//! Transport layer: multi-packet reassembly.
//!
//! Parameter groups longer than one frame (retarder and engine configuration)
//! arrive as consecutive PDUs whose first payload byte is a sequence number.

pub mod assembly;

pub use assembly::{assemble, FragmentBuffer, FIRST_SEQUENCE, FRAGMENT_DATA_BYTES};
