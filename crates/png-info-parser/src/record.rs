//! Display-ready records handed to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::extract;
use crate::types::{GenerationInfo, ScanResult, join_labeled};

const NO_TEXT_CHUNKS: &str = "(no tEXt chunks found)";
const UNKNOWN_FILE_NAME: &str = "unknown file name";

/// Everything shown for one successfully read image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// `"{width} x {height}"`, with `unknown` for missing sides.
    pub dimensions: String,
    pub file_size: String,
    pub file_name: String,
    /// Every `tEXt` chunk as a labeled block.
    pub general_info: String,
    pub generation: GenerationInfo,
}

impl DisplayRecord {
    pub fn build(scan: &ScanResult, byte_len: u64, source: &str, size_decimals: usize) -> Self {
        let general_info = if scan.chunks.is_empty() {
            NO_TEXT_CHUNKS.to_string()
        } else {
            join_labeled(&scan.chunks)
        };

        Self {
            dimensions: scan.header.dimensions(),
            file_size: format_bytes(byte_len, size_decimals),
            file_name: file_name_from_source(source),
            general_info,
            generation: extract(&scan.chunks),
        }
    }
}

/// Why an image could not be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    pub source: String,
}

impl ErrorRecord {
    pub fn new(source: &str, error: impl fmt::Display) -> Self {
        Self {
            message: format!(
                "Failed to read or parse image info.\n\nSource: {source}\nError: {error}"
            ),
            source: source.to_string(),
        }
    }
}

/// Result of inspecting one input: either a record to display or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Display(DisplayRecord),
    Error(ErrorRecord),
}

impl Outcome {
    pub fn from_result<E: fmt::Display>(source: &str, result: Result<DisplayRecord, E>) -> Self {
        match result {
            Ok(record) => Self::Display(record),
            Err(e) => Self::Error(ErrorRecord::new(source, e)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Human-readable size in 1024-based units, e.g. `1.5 KB`.
///
/// Trailing zeros after the decimal point are dropped.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".into();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let mut number = format!("{size:.decimals$}");
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }
    format!("{number} {}", UNITS[unit])
}

/// Last path segment of a URL or file path, without query or fragment.
pub fn file_name_from_source(source: &str) -> String {
    let tail = source
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(source);
    let name = tail
        .split('?')
        .next()
        .unwrap_or_default()
        .split('#')
        .next()
        .unwrap_or_default();

    if name.is_empty() {
        UNKNOWN_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}
