//! Byte-to-character column translation.

/// Translate a byte offset into `line` to a character offset.
///
/// Offsets landing past the end of the line, or inside a multi-byte
/// sequence, clamp to the nearest valid boundary at or before the
/// requested byte.
pub fn byte_offset_to_char_offset(line: &str, byte_offset: usize) -> usize {
    let bytes = line.as_bytes();
    let end = byte_offset.min(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).chars().count()
}
