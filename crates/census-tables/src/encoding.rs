//! Strict text decoders for legacy single-byte encodings.
//!
//! Government flat files predate UTF-8 and arrive in one of a few Latin
//! encodings. Each decoder here either maps every byte of the input or fails
//! at the first byte it has no character for, so a chain of decoders can be
//! tried in order until one accepts the whole file.

use std::fmt;

use thiserror::Error;

/// Windows-1252 assignments for 0x80..=0x9F. `None` marks the five undefined bytes.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None,             Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None,             Some('\u{017D}'), None,
    None,             Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None,             Some('\u{017E}'), Some('\u{0178}'),
];

/// ISO-8859-15 positions that differ from ISO-8859-1.
const LATIN9_OVERRIDES: [(u8, char); 8] = [
    (0xA4, '\u{20AC}'),
    (0xA6, '\u{0160}'),
    (0xA8, '\u{0161}'),
    (0xB4, '\u{017D}'),
    (0xB8, '\u{017E}'),
    (0xBC, '\u{0152}'),
    (0xBD, '\u{0153}'),
    (0xBE, '\u{0178}'),
];

/// A supported text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1, rejecting the C1 control range
    Latin1,
    /// ISO-8859-15, rejecting the C1 control range
    Latin9,
    /// Windows-1252, rejecting its undefined bytes
    Windows1252,
}

/// Failure to decode a buffer with one encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("byte 0x{byte:02X} at offset {offset} is not valid {encoding}")]
pub struct DecodeError {
    pub encoding: TextEncoding,
    pub offset: usize,
    pub byte: u8,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "iso-8859-1",
            TextEncoding::Latin9 => "iso-8859-15",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Decode the whole buffer or fail at the first unmappable byte.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).map(str::to_owned).map_err(|e| {
                let offset = e.valid_up_to();
                DecodeError {
                    encoding: *self,
                    offset,
                    byte: bytes[offset],
                }
            }),
            _ => self.decode_single_byte(bytes),
        }
    }

    fn decode_single_byte(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let mut out = String::with_capacity(bytes.len());
        for (offset, &byte) in bytes.iter().enumerate() {
            match self.map_byte(byte) {
                Some(ch) => out.push(ch),
                None => {
                    return Err(DecodeError {
                        encoding: *self,
                        offset,
                        byte,
                    })
                }
            }
        }
        Ok(out)
    }

    fn map_byte(&self, byte: u8) -> Option<char> {
        if byte < 0x80 {
            return Some(byte as char);
        }
        match self {
            TextEncoding::Latin1 => latin1_char(byte),
            TextEncoding::Latin9 => LATIN9_OVERRIDES
                .iter()
                .find(|(b, _)| *b == byte)
                .map(|(_, ch)| *ch)
                .or_else(|| latin1_char(byte)),
            TextEncoding::Windows1252 => {
                if byte < 0xA0 {
                    WINDOWS_1252_HIGH[(byte - 0x80) as usize]
                } else {
                    Some(byte as char)
                }
            }
            TextEncoding::Utf8 => None,
        }
    }
}

fn latin1_char(byte: u8) -> Option<char> {
    if (0x80..0xA0).contains(&byte) {
        None
    } else {
        Some(byte as char)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered list of encodings tried until one decodes the whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingChain {
    candidates: Vec<TextEncoding>,
}

impl EncodingChain {
    pub fn new(candidates: Vec<TextEncoding>) -> Self {
        Self { candidates }
    }

    /// The three legacy single-byte encodings used by census flat files.
    ///
    /// ISO-8859-1 and ISO-8859-15 accept the same bytes and differ only in
    /// eight characters, so ISO-8859-15 never decodes a file ISO-8859-1
    /// rejected. It stays in the chain to keep the documented order.
    pub fn legacy() -> Self {
        Self::new(vec![
            TextEncoding::Latin1,
            TextEncoding::Latin9,
            TextEncoding::Windows1252,
        ])
    }

    /// UTF-8 first, then Windows-1252; for hand-edited CSV files.
    pub fn unicode_first() -> Self {
        Self::new(vec![TextEncoding::Utf8, TextEncoding::Windows1252])
    }

    pub fn candidates(&self) -> &[TextEncoding] {
        &self.candidates
    }

    /// Decode with the first encoding that accepts every byte.
    ///
    /// On failure every candidate's error is returned, in chain order.
    pub fn decode(&self, bytes: &[u8]) -> Result<(String, TextEncoding), Vec<DecodeError>> {
        let mut failures = Vec::with_capacity(self.candidates.len());
        for encoding in &self.candidates {
            match encoding.decode(bytes) {
                Ok(text) => return Ok((text, *encoding)),
                Err(e) => failures.push(e),
            }
        }
        Err(failures)
    }
}

impl Default for EncodingChain {
    fn default() -> Self {
        Self::legacy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_decodes_with_first_candidate() {
        let (text, enc) = EncodingChain::legacy().decode(b"PLST|MI|000|01").unwrap();
        assert_eq!(text, "PLST|MI|000|01");
        assert_eq!(enc, TextEncoding::Latin1);
    }

    #[test]
    fn test_latin1_accented_name() {
        // "Doña Ana" in ISO-8859-1
        let (text, enc) = EncodingChain::legacy().decode(b"Do\xF1a Ana").unwrap();
        assert_eq!(text, "Doña Ana");
        assert_eq!(enc, TextEncoding::Latin1);
    }

    #[test]
    fn test_smart_quotes_need_windows_1252() {
        let bytes = b"\x93Wayne\x94";
        assert!(TextEncoding::Latin1.decode(bytes).is_err());
        assert!(TextEncoding::Latin9.decode(bytes).is_err());

        let (text, enc) = EncodingChain::legacy().decode(bytes).unwrap();
        assert_eq!(text, "\u{201C}Wayne\u{201D}");
        assert_eq!(enc, TextEncoding::Windows1252);
    }

    #[test]
    fn test_latin9_euro_sign() {
        assert_eq!(TextEncoding::Latin9.decode(b"\xA4").unwrap(), "\u{20AC}");
        assert_eq!(TextEncoding::Latin1.decode(b"\xA4").unwrap(), "\u{00A4}");
    }

    #[test]
    fn test_undefined_byte_fails_every_candidate() {
        let failures = EncodingChain::legacy().decode(b"ok\x81").unwrap_err();
        assert_eq!(failures.len(), 3);
        assert!(failures.iter().all(|f| f.offset == 2 && f.byte == 0x81));
        assert_eq!(failures[2].encoding, TextEncoding::Windows1252);
    }

    #[test]
    fn test_utf8_error_offset() {
        let err = TextEncoding::Utf8.decode(b"ab\xFFcd").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.byte, 0xFF);
    }

    #[test]
    fn test_unicode_first_falls_back() {
        let (text, enc) = EncodingChain::unicode_first().decode(b"caf\xE9").unwrap();
        assert_eq!(text, "café");
        assert_eq!(enc, TextEncoding::Windows1252);
    }

    #[test]
    fn test_latin9_rejects_what_latin1_rejects() {
        for byte in 0x80u8..=0x9F {
            let input = [b'A', byte];
            assert!(TextEncoding::Latin1.decode(&input).is_err());
            assert!(TextEncoding::Latin9.decode(&input).is_err());
        }

        // C1 bytes fall through to Windows-1252
        let (text, enc) = EncodingChain::legacy().decode(b"5\x96 10").unwrap();
        assert_eq!(enc, TextEncoding::Windows1252);
        assert_eq!(text, "5\u{2013} 10");
    }
}
