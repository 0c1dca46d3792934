//! PNG chunk constants and the records produced by scanning and extraction.

use serde::{Deserialize, Serialize};

/// The 8-byte PNG signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub const IHDR: &[u8; 4] = b"IHDR";
pub const TEXT: &[u8; 4] = b"tEXt";
pub const IEND: &[u8; 4] = b"IEND";

/// Keyword of the tEXt chunk the Stable Diffusion web UI writes its
/// generation description into.
pub const PARAMETERS_KEYWORD: &str = "parameters";
pub const PROMPT_KEYWORD: &str = "prompt";
pub const NEGATIVE_PROMPT_KEYWORD: &str = "negative prompt";

pub const NEGATIVE_PROMPT_MARKER: &str = "Negative prompt:";
pub const STEPS_MARKER: &str = "Steps:";
pub const PARAMETER_SEPARATOR: &str = ", ";

/// Marker used wherever a value could not be determined.
pub const UNKNOWN: &str = "unknown";

//  Raw chunk

/// One decoded `tEXt` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChunk {
    pub keyword: String,
    pub text: String,
}

impl RawChunk {
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }

    /// `[keyword]` on its own line, followed by the text.
    pub fn labeled(&self) -> String {
        format!("[{}]\n{}", self.keyword, self.text)
    }
}

//  Header

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHeader {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageHeader {
    /// `"{width} x {height}"`; a missing or zero side reads as `unknown`.
    pub fn dimensions(&self) -> String {
        let side = |v: Option<u32>| match v {
            Some(n) if n != 0 => n.to_string(),
            _ => UNKNOWN.to_string(),
        };
        format!("{} x {}", side(self.width), side(self.height))
    }
}

//  Scan result

/// Everything the chunk scanner pulled out of one byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Whether the buffer started with the PNG signature.
    pub is_png: bool,
    pub header: ImageHeader,
    /// `tEXt` chunks in file order.
    pub chunks: Vec<RawChunk>,
}

//  Generation info

/// The Stable Diffusion view of a set of `tEXt` chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub prompt: String,
    pub negative_prompt: String,
    /// One `key: value` entry per line.
    pub trailing_parameters: String,
    /// Chunks not consumed by the extractor, in scan order.
    pub others: Vec<RawChunk>,
}

impl GenerationInfo {
    pub fn is_empty(&self) -> bool {
        self.prompt.is_empty()
            && self.negative_prompt.is_empty()
            && self.trailing_parameters.is_empty()
            && self.others.is_empty()
    }

    /// Labeled blocks of [`Self::others`], separated by a blank line.
    pub fn others_text(&self) -> String {
        join_labeled(&self.others)
    }
}

pub(crate) fn join_labeled(chunks: &[RawChunk]) -> String {
    chunks
        .iter()
        .map(RawChunk::labeled)
        .collect::<Vec<_>>()
        .join("\n\n")
}

//  Error

#[derive(Debug, thiserror::Error)]
pub enum PngInfoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
}
