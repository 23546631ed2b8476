//! UTF-16 <-> character offset conversion.
//!
//! LSP positions count UTF-16 code units; `revis-core` counts characters.

/// Convert a UTF-16 code unit offset within `text` to a character offset.
///
/// Offsets past the end clamp to the character count.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut current_utf16 = 0;
    let mut char_count = 0;

    for ch in text.chars() {
        if current_utf16 >= utf16_offset {
            break;
        }
        current_utf16 += ch.len_utf16();
        char_count += 1;
    }

    char_count
}

/// Convert a character offset within `text` to UTF-16 code units.
pub fn char_offset_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}
