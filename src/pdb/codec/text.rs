//! Text decoding for PalmOS strings.
//!
//! PalmOS stores text in a single-byte character set that is Latin-1 for
//! most of its range, but reuses a block of control codes (0x18, 0x19 and
//! 0x80..=0x9F) for typographic characters. Every string the reader
//! produces goes through [`decode`], which applies both steps.

use encoding_rs::mem::decode_latin1;

/// PalmOS codes that differ from their Latin-1 meaning.
///
/// Codes in the remapped block that are not listed here (0x81, 0x9D, 0x9E)
/// have no known equivalent and are kept unchanged.
const SPECIAL_CHARS: &[(char, char)] = &[
    ('\u{0018}', '\u{2026}'), // ellipsis
    ('\u{0019}', '\u{2007}'), // numeric space
    ('\u{0080}', '\u{20AC}'), // euro
    ('\u{0082}', '\u{201A}'), // single low quotation mark
    ('\u{0083}', '\u{0192}'), // small f with hook
    ('\u{0084}', '\u{201E}'), // double low quotation mark
    ('\u{0085}', '\u{2026}'), // ellipsis
    ('\u{0086}', '\u{2020}'), // dagger
    ('\u{0087}', '\u{2021}'), // double dagger
    ('\u{0088}', '\u{0302}'), // combining circumflex accent
    ('\u{0089}', '\u{2030}'), // per mille
    ('\u{008A}', '\u{0160}'), // capital s with caron
    ('\u{008B}', '\u{2039}'), // single left-pointing angle quotation mark
    ('\u{008C}', '\u{0152}'), // capital ligature oe
    ('\u{008D}', '\u{2662}'), // diamond
    ('\u{008E}', '\u{2663}'), // club
    ('\u{008F}', '\u{2661}'), // heart
    ('\u{0090}', '\u{2660}'), // spade
    ('\u{0091}', '\u{2018}'), // left single quotation mark
    ('\u{0092}', '\u{2019}'), // right single quotation mark
    ('\u{0093}', '\u{201C}'), // left double quotation mark
    ('\u{0094}', '\u{201D}'), // right double quotation mark
    ('\u{0095}', '\u{2219}'), // bullet
    ('\u{0096}', '\u{2011}'), // non-breaking hyphen
    ('\u{0097}', '\u{2012}'), // figure dash
    ('\u{0098}', '\u{0303}'), // combining tilde
    ('\u{0099}', '\u{2122}'), // trademark
    ('\u{009A}', '\u{0161}'), // small s with caron
    ('\u{009B}', '\u{203A}'), // single right-pointing angle quotation mark
    ('\u{009C}', '\u{0153}'), // small ligature oe
    ('\u{009F}', '\u{0178}'), // capital y with diaeresis
];

/// Maps one PalmOS character to its Unicode equivalent.
pub fn convert_special_char(c: char) -> char {
    if c != '\u{0018}' && c != '\u{0019}' && !('\u{0080}'..='\u{009F}').contains(&c) {
        return c;
    }
    SPECIAL_CHARS
        .iter()
        .find(|(palm, _)| *palm == c)
        .map(|(_, unicode)| *unicode)
        .unwrap_or(c)
}

/// Converts special PalmOS characters of an already decoded string.
pub fn convert_special_chars(text: &str) -> String {
    text.chars().map(convert_special_char).collect()
}

/// Decodes PalmOS bytes into a `String`.
pub fn decode(bytes: &[u8]) -> String {
    let latin1 = decode_latin1(bytes);
    convert_special_chars(&latin1)
}

/// Decodes bytes up to (not including) the first zero byte.
///
/// Without a zero byte the whole slice is decoded.
pub fn decode_terminated(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    decode(&bytes[..end])
}
