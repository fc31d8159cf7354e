use std::io::{self, Write};

use log::info;

use super::traits::DiagnosticSink;

/// The column labels are padded to so that reported values line up
pub const STATUS_LABEL_WIDTH: usize = 25;

/// Left-align `label` in a column of [`STATUS_LABEL_WIDTH`] characters
pub fn format_label(label: &str) -> String {
    format!("{label:<width$}", width = STATUS_LABEL_WIDTH)
}

/// Reports status through the [`log`] facade at the `info` level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn status(&mut self, label: &str, value: &str) -> io::Result<()> {
        info!("{label}{value}");
        Ok(())
    }
}

/// Writes one `label value` line per report to a stream, usually standard error
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    handle: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(handle: W) -> Self {
        Self { handle }
    }

    pub fn get_ref(&self) -> &W {
        &self.handle
    }

    pub fn into_inner(self) -> W {
        self.handle
    }
}

impl StreamSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> DiagnosticSink for StreamSink<W> {
    fn status(&mut self, label: &str, value: &str) -> io::Result<()> {
        self.handle.write_all(label.as_bytes())?;
        self.handle.write_all(value.as_bytes())?;
        self.handle.write_all(b"\n")?;
        self.handle.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_label() {
        let label = format_label("duplicated splash: ");
        assert_eq!(label.len(), STATUS_LABEL_WIDTH);
        assert!(label.starts_with("duplicated splash: "));
        let long = "x".repeat(STATUS_LABEL_WIDTH + 3);
        assert_eq!(format_label(&long), long);
    }

    #[test]
    fn test_stream_sink() -> io::Result<()> {
        let mut sink = StreamSink::new(Vec::new());
        sink.status("duplicates found: ", "3")?;
        sink.status(&format_label("a: "), "b")?;
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "duplicates found: 3");
        assert_eq!(lines[1].len(), STATUS_LABEL_WIDTH + 1);
        assert!(lines[1].ends_with('b'));
        Ok(())
    }
}
