//! PDF text strings (ISO 32000-1:2008, Section 7.9.2.2).

/// Decode a PDF text string.
///
/// - Bytes starting with `0xFE 0xFF` are UTF-16BE with BOM
/// - Bytes starting with `0xEF 0xBB 0xBF` are UTF-8 with BOM (PDF 2.0)
/// - Anything else is PDFDocEncoding, read here as Latin-1
///
/// # Examples
///
/// ```
/// use pdf_formkit::pdf::decode_text_string;
///
/// assert_eq!(decode_text_string(b"Buyer Name"), "Buyer Name");
/// assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
/// ```
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a string as a PDF text string.
///
/// Latin-1 text is written as single bytes; anything else is written as
/// UTF-16BE with a BOM.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    if text.chars().all(|c| (c as u32) < 0x100) {
        return text.chars().map(|c| c as u8).collect();
    }

    let mut out = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_text_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn test_decode_utf8_bom() {
        assert_eq!(decode_text_string("\u{FEFF}Straße".as_bytes()), "Straße");
    }

    #[test]
    fn test_encode_ascii_stays_single_byte() {
        assert_eq!(encode_text_string("Yes"), b"Yes".to_vec());
    }

    #[test]
    fn test_encode_wide_uses_utf16() {
        let encoded = encode_text_string("Łódź");
        assert_eq!(&encoded[..2], &[0xFE, 0xFF]);
        assert_eq!(decode_text_string(&encoded), "Łódź");
    }
}
