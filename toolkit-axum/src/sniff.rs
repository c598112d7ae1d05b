//! Content sniffing for uploads.
//!
//! Only the leading [`SNIFF_LEN`] bytes are inspected. UTF-16 text is
//! recognised by its byte-order mark, binary formats and HTML by `infer`;
//! anything else is plain text or `application/octet-stream`.

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 512;

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_PLAIN_UTF16BE: &str = "text/plain; charset=utf-16be";
const TEXT_PLAIN_UTF16LE: &str = "text/plain; charset=utf-16le";

/// Classifies `data` into a MIME type string.
///
/// Falls back to `application/octet-stream` when no signature matches and the
/// data contains control bytes that never appear in text.
pub fn sniff_content_type(data: &[u8]) -> String {
    let data = &data[..data.len().min(SNIFF_LEN)];

    // UTF-16 text is full of NUL bytes, so the BOM has to win over the binary check.
    if data.starts_with(&[0xFE, 0xFF]) {
        return TEXT_PLAIN_UTF16BE.to_string();
    }
    if data.starts_with(&[0xFF, 0xFE]) {
        return TEXT_PLAIN_UTF16LE.to_string();
    }
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    if !data.iter().copied().any(is_binary_byte) {
        return TEXT_PLAIN.to_string();
    }
    OCTET_STREAM.to_string()
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
