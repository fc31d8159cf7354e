//! Read whitespace separated `mz:intensity` peak lists, the text layout used to
//! exchange spectra with SPLASH tooling.
mod reader;

pub use reader::*;

/// Check whether the first non-blank line of `buf` looks like a peak list,
/// optionally prefixed with an `id,` column.
pub fn is_peak_list(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return false;
    };
    let peaks = line.split_once(',').map(|(_, p)| p).unwrap_or(line);
    match peaks.split_whitespace().next() {
        Some(token) => parse_peak_token(token).is_some(),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_peak_list() {
        assert!(is_peak_list(b"100:1 101:2"));
        assert!(is_peak_list(b"\n\nspec1,100:1 101:2\n"));
        assert!(!is_peak_list(b"BEGIN IONS\nTITLE=foo"));
        assert!(!is_peak_list(b"splash10-0udi-0900000000-4f7c7d9d2a94e7ba0e5f,db1"));
        assert!(!is_peak_list(b""));
    }
}
