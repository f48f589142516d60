//! Windows-1252 encoding utilities for Spanish-market thermal printers
//!
//! Receipt printers sold in Spain ship with the WPC1252 code page, which
//! covers the characters this product needs (€, ñ, á/é/í/ó/ú, ¿, ¡).
//! This module provides utilities for:
//! - Calculating printable string widths
//! - Truncating/padding strings to column widths
//! - Converting UTF-8 to Windows-1252 while preserving ESC/POS commands

/// ESC t 16 - select the WPC1252 code page
const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 0x10];

/// Get the printed width of a string in Windows-1252 columns
///
/// Every encodable character occupies exactly one column; characters outside
/// the code page are replaced during encoding and still occupy one column.
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within a column width
pub fn truncate_1252(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_1252(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate_1252(s, width);
    }
    let spaces = width - current;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1252
///
/// ASCII bytes (0x00-0x7F) are passed through exactly as is, which protects
/// ESC/POS commands from being corrupted. Only bytes >= 0x80 are treated as
/// UTF-8 sequences and re-encoded.
///
/// Also re-selects the WPC1252 code page after any INIT command (ESC @),
/// since INIT resets the printer back to its default page.
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + 16);

    // Select the code page at the start
    result.extend_from_slice(&SELECT_CP1252);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // INIT command (ESC @ = 0x1B 0x40) resets the code page;
        // re-select WPC1252 right after it
        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_utf8(&mut result, &mut buffer);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&SELECT_CP1252);
            i += 2;
            continue;
        }

        if b < 0x80 {
            flush_utf8(&mut result, &mut buffer);
            result.push(b);
        } else {
            buffer.push(b);
        }
        i += 1;
    }
    flush_utf8(&mut result, &mut buffer);

    result
}

/// Encode and append a pending UTF-8 run
fn flush_utf8(result: &mut Vec<u8>, buffer: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }
    let text = String::from_utf8_lossy(buffer);
    let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(&text);
    if had_errors {
        tracing::warn!(text = %text, "Characters outside Windows-1252, replaced in ticket output");
    }
    result.extend_from_slice(&encoded);
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_counts_columns() {
        assert_eq!(text_width("Mesa 4"), 6);
        assert_eq!(text_width("Jamón"), 5);
        assert_eq!(text_width("12,50 €"), 7);
    }

    #[test]
    fn test_pad_left_and_right() {
        assert_eq!(pad_1252("ab", 5, false), "ab   ");
        assert_eq!(pad_1252("ab", 5, true), "   ab");
        assert_eq!(pad_1252("abcdef", 4, false), "abcd");
    }

    #[test]
    fn test_spanish_text_encodes_single_byte() {
        let out = convert_to_cp1252("Jamón €".as_bytes());
        // code page prefix + 7 single-byte characters
        assert_eq!(out.len(), SELECT_CP1252.len() + 7);
        // € is 0x80 in Windows-1252
        assert_eq!(*out.last().unwrap(), 0x80);
    }

    #[test]
    fn test_escpos_commands_preserved() {
        let mut input = vec![0x1B, 0x61, 0x01]; // center
        input.extend_from_slice("ñ".as_bytes());
        let out = convert_to_cp1252(&input);
        assert_eq!(&out[SELECT_CP1252.len()..SELECT_CP1252.len() + 3], &[0x1B, 0x61, 0x01]);
        assert_eq!(*out.last().unwrap(), 0xF1); // ñ in cp1252
    }

    #[test]
    fn test_init_reselects_code_page() {
        let input = vec![0x1B, 0x40, b'A'];
        let out = convert_to_cp1252(&input);
        // prefix, then INIT, then the code page again, then 'A'
        let expected: Vec<u8> = [
            &SELECT_CP1252[..],
            &[0x1B, 0x40],
            &SELECT_CP1252[..],
            &[b'A'],
        ]
        .concat();
        assert_eq!(out, expected);
    }
}
