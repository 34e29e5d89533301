//! Text slicing helpers
//!
//! Byte offsets reported by the parser are trusted to sit on UTF-8
//! boundaries, but a malformed offset must never panic the builder.

/// Largest char boundary `<= offset`
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    let mut offset = offset;
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// `text[start..end]` with both ends clamped onto char boundaries
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(text, start);
    let end = floor_char_boundary(text, end.max(start));
    &text[start..end]
}
