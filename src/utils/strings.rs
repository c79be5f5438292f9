//! Bounded copy/append into fixed-capacity NUL-terminated byte buffers.
//!
//! For staging values that cross the C boundary. Both functions report the
//! length the full operation needed, so `result >= dest.len()` detects
//! truncation.

/// Copy `src` into `dest`, truncating to fit.
///
/// `dest` is NUL-terminated whenever it is non-empty; a zero-capacity `dest`
/// is left untouched. Returns `src.len()`, the length a complete copy would
/// have needed.
pub fn bounded_copy(dest: &mut [u8], src: &str) -> usize {
    let needed = src.len();
    if dest.is_empty() {
        return needed;
    }
    let copy = needed.min(dest.len() - 1);
    dest[..copy].copy_from_slice(&src.as_bytes()[..copy]);
    dest[copy] = 0;
    needed
}

/// Append `src` after the first NUL in `dest`, truncating to fit.
///
/// The buffer stays NUL-terminated. Returns the length the combined string
/// needed. When `dest` holds no NUL at all nothing is written and the
/// combined length is reported against the full capacity, so truncation
/// detection still works on an unterminated buffer.
pub fn bounded_append(dest: &mut [u8], src: &str) -> usize {
    let existing = match dest.iter().position(|&b| b == 0) {
        Some(idx) => idx,
        None => return dest.len() + src.len(),
    };
    existing + bounded_copy(&mut dest[existing..], src)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminated(buf: &[u8]) -> &str {
        let end = buf
            .iter()
            .position(|&b| b == 0)
            .expect("buffer is not NUL-terminated");
        std::str::from_utf8(&buf[..end]).expect("buffer is not UTF-8")
    }

    #[test]
    fn copy_fits_and_terminates() {
        let mut buf = [0xffu8; 8];
        let needed = bounded_copy(&mut buf, "abc");
        assert_eq!(needed, 3);
        assert_eq!(terminated(&buf), "abc");
    }

    #[test]
    fn copy_truncates_and_reports_needed_length() {
        let mut buf = [0u8; 4];
        let needed = bounded_copy(&mut buf, "abcdefgh");
        assert_eq!(needed, 8);
        assert!(needed >= buf.len(), "truncation must be detectable");
        assert_eq!(terminated(&buf), "abc");
    }

    #[test]
    fn copy_into_single_byte_writes_only_terminator() {
        let mut buf = [0xffu8; 1];
        assert_eq!(bounded_copy(&mut buf, "abc"), 3);
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn copy_into_empty_buffer_writes_nothing() {
        let mut buf: [u8; 0] = [];
        assert_eq!(bounded_copy(&mut buf, "abc"), 3);
    }

    #[test]
    fn append_extends_existing_content() {
        let mut buf = [0u8; 16];
        bounded_copy(&mut buf, "usr");
        let needed = bounded_append(&mut buf, "/bin");
        assert_eq!(needed, 7);
        assert_eq!(terminated(&buf), "usr/bin");
    }

    #[test]
    fn append_truncates_and_reports_needed_length() {
        let mut buf = [0u8; 6];
        bounded_copy(&mut buf, "abc");
        let needed = bounded_append(&mut buf, "defgh");
        assert_eq!(needed, 8);
        assert!(needed >= buf.len());
        assert_eq!(terminated(&buf), "abcde");
    }

    #[test]
    fn append_to_unterminated_buffer_writes_nothing() {
        let mut buf = [0x41u8; 4];
        let needed = bounded_append(&mut buf, "xyz");
        assert_eq!(needed, 7);
        assert_eq!(buf, [0x41; 4]);
    }

    #[test]
    fn append_to_empty_string_behaves_like_copy() {
        let mut buf = [0u8; 8];
        buf[0] = 0;
        let needed = bounded_append(&mut buf, "path");
        assert_eq!(needed, 4);
        assert_eq!(terminated(&buf), "path");
    }
}
