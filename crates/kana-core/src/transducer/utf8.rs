//! Single code point UTF-8 decoding with an explicit "incomplete" outcome.

/// Longest UTF-8 encoding of one code point.
pub const MAX_UTF8_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A code point and the number of bytes it occupied.
    Char(char, usize),
    /// A valid prefix of a code point runs into the end of the buffer.
    Incomplete,
    /// The bytes can never start a valid code point.
    Invalid,
}

/// Decode the code point at the start of `src`. `src` must not be empty.
pub fn decode_first(src: &[u8]) -> Decoded {
    let window = &src[..src.len().min(MAX_UTF8_LEN)];
    let valid = match std::str::from_utf8(window) {
        Ok(s) => s,
        Err(e) if e.valid_up_to() > 0 => match std::str::from_utf8(&window[..e.valid_up_to()]) {
            Ok(s) => s,
            Err(_) => return Decoded::Invalid,
        },
        Err(e) => {
            return match e.error_len() {
                None => Decoded::Incomplete,
                Some(_) => Decoded::Invalid,
            }
        }
    };
    match valid.chars().next() {
        Some(c) => Decoded::Char(c, c.len_utf8()),
        None => Decoded::Incomplete,
    }
}
