//! Pure-Rust PNG text-metadata reader.
//!
//! Extracts image dimensions and `tEXt` chunks from a PNG byte stream
//! **without** decoding any pixel data, then interprets the generation
//! parameters that Stable Diffusion front ends embed in those chunks.
//!
//! * **scan**: walks the chunk stream; never fails, degrading to empty or
//!   partial results on foreign or truncated input.
//! * **extract**: splits the `parameters` chunk into prompt, negative
//!   prompt and trailing parameters.
//! * **inspect**: runs both and builds a [`DisplayRecord`] for display.

pub mod params;
pub mod reader;
pub mod record;
pub mod types;

pub use params::extract;
pub use reader::{
    DEFAULT_MAX_BYTES, InspectOptions, inspect_bytes, inspect_file, inspect_reader, scan,
};
pub use record::{DisplayRecord, ErrorRecord, Outcome, file_name_from_source, format_bytes};
pub use types::{GenerationInfo, ImageHeader, PngInfoError, RawChunk, ScanResult};
