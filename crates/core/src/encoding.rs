//! Text normalization for platform strings
//!
//! Windows hands back UTF-16 buffers, often NUL-terminated inside a fixed-size
//! array. Everything the collector stores is a UTF-8 `String`.

/// Convert a (possibly NUL-terminated) wide char buffer to a String
///
/// Stops at the first NUL. Unpaired surrogates become U+FFFD.
pub fn from_wide(wchars: &[u16]) -> String {
    let len = wchars.iter().position(|&c| c == 0).unwrap_or(wchars.len());
    String::from_utf16_lossy(&wchars[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_stops_at_nul() {
        let mut buf = [0u16; 16];
        for (i, c) in wide("System").into_iter().enumerate() {
            buf[i] = c;
        }
        assert_eq!(from_wide(&buf), "System");
    }

    #[test]
    fn test_unterminated_buffer() {
        assert_eq!(from_wide(&wide("notepad.exe")), "notepad.exe");
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(from_wide(&wide("Jürgen")), "Jürgen");
    }

    #[test]
    fn test_lone_surrogate_is_replaced() {
        let buf = [0x0061, 0xD800, 0x0062];
        assert_eq!(from_wide(&buf), "a\u{FFFD}b");
    }
}
