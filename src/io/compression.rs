use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path;

use flate2::bufread::MultiGzDecoder;
use log::debug;

pub fn is_gzipped(header: &[u8]) -> bool {
    header.starts_with(b"\x1f\x8b")
}

pub fn is_gzipped_extension(path: path::PathBuf) -> (bool, path::PathBuf) {
    if let Some(ext) = path.extension() {
        if ext.to_ascii_lowercase() == "gz" {
            (true, path.with_extension(""))
        } else {
            (false, path)
        }
    } else {
        (false, path)
    }
}

/// Wrap `stream` in a gzip decoder if its first bytes carry the gzip magic
/// number, otherwise return it buffered as-is.
pub fn decompress_if_gzipped<R: Read + 'static>(stream: R) -> io::Result<Box<dyn BufRead>> {
    let mut handle = BufReader::new(stream);
    let gzipped = is_gzipped(handle.fill_buf()?);
    if gzipped {
        debug!("Detected gzip compressed input");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(handle))))
    } else {
        Ok(Box::new(handle))
    }
}

/// Open a text source by path, treating `-` as standard input. Compressed
/// sources are detected by content, not by extension.
pub fn open_text_source<P: AsRef<path::Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    if path.as_os_str() == "-" {
        decompress_if_gzipped(io::stdin())
    } else {
        let (by_extension, _) = is_gzipped_extension(path.to_path_buf());
        if by_extension {
            debug!("{} has a gzip extension", path.display());
        }
        decompress_if_gzipped(fs::File::open(path)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn test_extension() {
        let (gz, stem) = is_gzipped_extension(path::PathBuf::from("records.csv.GZ"));
        assert!(gz);
        assert_eq!(stem, path::PathBuf::from("records.csv"));
        let (gz, _) = is_gzipped_extension(path::PathBuf::from("records.csv"));
        assert!(!gz);
    }

    #[test]
    fn test_open_plain_and_gzipped() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let text = "splash10-a-b,one\nsplash10-a-b,two\n";

        let plain = dir.path().join("records.csv");
        fs::write(&plain, text)?;

        let compressed = dir.path().join("records.csv.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&compressed)?, Compression::default());
        encoder.write_all(text.as_bytes())?;
        encoder.finish()?;

        for path in [plain, compressed] {
            let mut buf = String::new();
            open_text_source(&path)?.read_to_string(&mut buf)?;
            assert_eq!(buf, text);
        }
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(open_text_source("/definitely/not/here.csv").is_err());
    }
}
