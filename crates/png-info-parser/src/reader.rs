//! PNG chunk reader — walks the chunk stream and collects the header and
//! `tEXt` metadata.

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::record::DisplayRecord;
use crate::types::*;

/// Refuse inputs larger than this unless told otherwise.
pub const DEFAULT_MAX_BYTES: u64 = 256 * 1024 * 1024;

/// Length + type prefix and trailing CRC around every chunk payload.
const CHUNK_PREFIX_LEN: usize = 8;
const CHUNK_CRC_LEN: usize = 4;

/// Knobs for [`inspect_file`] / [`inspect_reader`].
#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub max_bytes: u64,
    /// Decimal places in the human-readable file size.
    pub size_decimals: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            size_decimals: 2,
        }
    }
}

//  Scan

/// Walk the chunks of `bytes` and collect the image header and `tEXt`
/// chunks.
///
/// Never fails: a missing signature yields an empty result, a truncated
/// stream yields whatever was read before the cut.
pub fn scan(bytes: &[u8]) -> ScanResult {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        debug!(len = bytes.len(), "PNG signature not found");
        return ScanResult::default();
    }

    let mut result = ScanResult {
        is_png: true,
        ..Default::default()
    };
    let mut seen_header = false;

    let mut offset = PNG_SIGNATURE.len();
    while offset < bytes.len() {
        let Some((chunk_type, data, complete)) = read_chunk(bytes, offset) else {
            debug!(offset, len = bytes.len(), "truncated chunk header, stopping scan");
            break;
        };

        match &chunk_type {
            IHDR => {
                if !seen_header {
                    seen_header = true;
                    if let (Some(width), Some(height)) = (read_u32(data, 0), read_u32(data, 4)) {
                        result.header = ImageHeader {
                            width: Some(width),
                            height: Some(height),
                        };
                    }
                }
            }
            TEXT => match decode_text(data) {
                Some(chunk) => result.chunks.push(chunk),
                None => debug!(offset, "dropping tEXt chunk without keyword"),
            },
            IEND => break,
            _ => {}
        }

        if !complete {
            debug!(offset, len = bytes.len(), "chunk runs past end of input, stopping scan");
            break;
        }

        // `data` lies inside `bytes`, so this cannot overflow.
        offset += CHUNK_PREFIX_LEN + data.len() + CHUNK_CRC_LEN;
    }

    debug!(
        width = ?result.header.width,
        height = ?result.header.height,
        text_chunks = result.chunks.len(),
        "scan complete"
    );
    result
}

//  Inspection

/// Scan `bytes` and build the display record for them.
pub fn inspect_bytes(bytes: &[u8], source: &str, options: &InspectOptions) -> DisplayRecord {
    let scan = scan(bytes);
    DisplayRecord::build(&scan, bytes.len() as u64, source, options.size_decimals)
}

/// Read at most `options.max_bytes` from `reader` and inspect them.
pub fn inspect_reader(
    reader: impl Read,
    source: &str,
    options: &InspectOptions,
) -> Result<DisplayRecord, PngInfoError> {
    let mut bytes = Vec::new();
    reader
        .take(options.max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)?;
    let size = bytes.len() as u64;
    if size > options.max_bytes {
        return Err(PngInfoError::TooLarge {
            size,
            limit: options.max_bytes,
        });
    }
    Ok(inspect_bytes(&bytes, source, options))
}

/// Inspect the file at `path`.
pub fn inspect_file(path: &Path, options: &InspectOptions) -> Result<DisplayRecord, PngInfoError> {
    let file = fs::File::open(path)?;
    let size = file.metadata()?.len();
    if size > options.max_bytes {
        return Err(PngInfoError::TooLarge {
            size,
            limit: options.max_bytes,
        });
    }
    inspect_reader(file, &path.to_string_lossy(), options)
}

//  Internal helpers

/// Chunk type, payload and whether the payload is complete, or `None` if
/// the length/type prefix runs past the end of `bytes`.
///
/// A payload cut off by the end of `bytes` is clamped to what is present.
/// The CRC is allowed to be missing.
fn read_chunk(bytes: &[u8], offset: usize) -> Option<([u8; 4], &[u8], bool)> {
    let prefix = bytes.get(offset..offset.checked_add(CHUNK_PREFIX_LEN)?)?;
    let length = read_u32(prefix, 0)? as usize;
    let chunk_type: [u8; 4] = prefix[4..8].try_into().ok()?;

    let rest = &bytes[offset + CHUNK_PREFIX_LEN..];
    let data = &rest[..rest.len().min(length)];
    Some((chunk_type, data, data.len() == length))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let buf: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(buf))
}

/// Split a `tEXt` payload at its first NUL. An empty keyword or a missing
/// separator yields `None`.
fn decode_text(data: &[u8]) -> Option<RawChunk> {
    let sep = data.iter().position(|&b| b == 0)?;
    if sep == 0 {
        return None;
    }
    Some(RawChunk {
        keyword: decode_latin1(&data[..sep]),
        text: decode_latin1(&data[sep + 1..]),
    })
}

/// ISO-8859-1: every byte maps to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(payload);
        out.extend_from_slice(&[0; 4]);
        out
    }

    fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        for c in chunks {
            out.extend_from_slice(c);
        }
        out
    }

    fn ihdr(width: u32, height: u32) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&width.to_be_bytes());
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&[8, 6, 0, 0, 0]);
        chunk(IHDR, &payload)
    }

    #[test]
    fn short_or_foreign_input_is_empty() {
        assert_eq!(scan(&[]), ScanResult::default());
        assert_eq!(scan(&PNG_SIGNATURE[..7]), ScanResult::default());
        assert_eq!(scan(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0]), ScanResult::default());
    }

    #[test]
    fn signature_only() {
        let result = scan(&PNG_SIGNATURE);
        assert!(result.is_png);
        assert_eq!(result.header, ImageHeader::default());
        assert!(result.chunks.is_empty());
    }

    #[test]
    fn reads_header() {
        let result = scan(&png(&[ihdr(512, 768), chunk(IEND, &[])]));
        assert_eq!(result.header.width, Some(512));
        assert_eq!(result.header.height, Some(768));
    }

    #[test]
    fn keeps_first_header() {
        let result = scan(&png(&[ihdr(1, 2), ihdr(3, 4)]));
        assert_eq!(result.header.width, Some(1));
        assert_eq!(result.header.height, Some(2));
    }

    #[test]
    fn short_header_payload_is_ignored() {
        let result = scan(&png(&[chunk(IHDR, &[0, 0, 1])]));
        assert!(result.is_png);
        assert_eq!(result.header, ImageHeader::default());
    }

    #[test]
    fn text_chunks_in_order() {
        let result = scan(&png(&[
            ihdr(8, 8),
            chunk(TEXT, b"foo\0bar"),
            chunk(b"IDAT", &[1, 2, 3]),
            chunk(TEXT, b"Comment\0"),
            chunk(IEND, &[]),
        ]));
        assert_eq!(
            result.chunks,
            vec![RawChunk::new("foo", "bar"), RawChunk::new("Comment", "")]
        );
    }

    #[test]
    fn malformed_text_chunks_are_dropped() {
        let result = scan(&png(&[
            chunk(TEXT, b"\0bar"),
            chunk(TEXT, b"foo"),
            chunk(TEXT, b"ok\0yes"),
        ]));
        assert_eq!(result.chunks, vec![RawChunk::new("ok", "yes")]);
    }

    #[test]
    fn text_splits_at_first_nul_only() {
        let result = scan(&png(&[chunk(TEXT, b"k\0a\0b")]));
        assert_eq!(result.chunks[0].text, "a\0b");
    }

    #[test]
    fn latin1_bytes_map_one_to_one() {
        let result = scan(&png(&[chunk(TEXT, b"Title\0caf\xE9 \x85\xFF")]));
        let text = &result.chunks[0].text;
        assert_eq!(text, "caf\u{e9} \u{85}\u{ff}");
        let back: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
        assert_eq!(back, b"caf\xE9 \x85\xFF");
    }

    #[test]
    fn stops_at_iend() {
        let result = scan(&png(&[
            chunk(TEXT, b"a\01"),
            chunk(IEND, &[]),
            chunk(TEXT, b"b\02"),
            ihdr(9, 9),
        ]));
        assert_eq!(result.chunks, vec![RawChunk::new("a", "1")]);
        assert_eq!(result.header, ImageHeader::default());
    }

    #[test]
    fn truncated_payload_is_clamped() {
        let mut bytes = png(&[ihdr(4, 4), chunk(TEXT, b"a\01")]);
        let tail = chunk(TEXT, b"b\0long text");
        bytes.extend_from_slice(&tail[..tail.len() - 8]);
        let result = scan(&bytes);
        assert_eq!(result.header.width, Some(4));
        assert_eq!(
            result.chunks,
            vec![RawChunk::new("a", "1"), RawChunk::new("b", "long ")]
        );
    }

    #[test]
    fn declared_length_past_end_keeps_present_text() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&20u32.to_be_bytes());
        bytes.extend_from_slice(TEXT);
        bytes.extend_from_slice(b"parameters\0a cat");
        let result = scan(&bytes);
        assert_eq!(result.chunks, vec![RawChunk::new("parameters", "a cat")]);
    }

    #[test]
    fn truncated_header_still_gives_dimensions() {
        let full = ihdr(512, 768);
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&full[..8 + 8]);
        let result = scan(&bytes);
        assert_eq!(result.header.width, Some(512));
        assert_eq!(result.header.height, Some(768));
    }

    #[test]
    fn nothing_is_read_after_a_truncated_chunk() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&100u32.to_be_bytes());
        bytes.extend_from_slice(b"zzZz");
        bytes.extend_from_slice(&chunk(TEXT, b"hidden\0x"));
        assert!(scan(&bytes).chunks.is_empty());
    }

    #[test]
    fn missing_final_crc_is_tolerated() {
        let mut bytes = png(&[]);
        let tail = chunk(TEXT, b"a\01");
        bytes.extend_from_slice(&tail[..tail.len() - 4]);
        assert_eq!(scan(&bytes).chunks, vec![RawChunk::new("a", "1")]);
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(TEXT);
        bytes.extend_from_slice(b"k\0v");
        let result = scan(&bytes);
        assert!(result.is_png);
        assert_eq!(result.chunks, vec![RawChunk::new("k", "v")]);
    }

    #[test]
    fn inspect_reader_enforces_limit() {
        let bytes = png(&[ihdr(1, 1)]);
        let options = InspectOptions {
            max_bytes: 10,
            ..Default::default()
        };
        let err = inspect_reader(bytes.as_slice(), "mem", &options).unwrap_err();
        assert!(matches!(err, PngInfoError::TooLarge { limit: 10, .. }));
    }

    #[test]
    fn inspect_bytes_builds_record() {
        let bytes = png(&[ihdr(640, 480), chunk(TEXT, b"parameters\0a cat"), chunk(IEND, &[])]);
        let record = inspect_bytes(&bytes, "https://x.test/img/cat.png?w=1", &InspectOptions::default());
        assert_eq!(record.dimensions, "640 x 480");
        assert_eq!(record.file_name, "cat.png");
        assert_eq!(record.generation.prompt, "a cat");
    }
}
