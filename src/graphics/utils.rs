/// Size of the buffer info logs are read into, terminating NUL included.
pub const INFO_LOG_CAPACITY: usize = 512;

/// Turns raw info-log bytes into text that would fit a C buffer of [`INFO_LOG_CAPACITY`] bytes.
/// Anything after the first NUL is ignored, and a multi-byte character that would straddle the
/// limit is dropped rather than split.
pub fn bounded_log(raw: &[u8]) -> String {
    let raw = match raw.iter().position(|&b| b == 0) {
        Some(end) => &raw[..end],
        None => raw,
    };

    let text = String::from_utf8_lossy(raw);
    let mut end = text.len().min(INFO_LOG_CAPACITY - 1);
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    text[..end].trim_end().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn log_stops_at_nul_and_trailing_whitespace() {
        assert_eq!(bounded_log(b"0:1(1): error: syntax error\n\0garbage"), "0:1(1): error: syntax error");
        assert_eq!(bounded_log(b""), "");
    }

    #[test]
    fn long_log_is_cut_to_capacity() {
        let raw = "x".repeat(2000);
        assert_eq!(bounded_log(raw.as_bytes()).len(), INFO_LOG_CAPACITY - 1);
    }

    #[test]
    fn cut_never_splits_a_character() {
        let raw = "é".repeat(400);
        let log = bounded_log(raw.as_bytes());
        assert!(log.len() < INFO_LOG_CAPACITY);
        assert!(log.chars().all(|c| c == 'é'));
    }
}
