use std::fmt::Display;
use std::io::{self, BufWriter, Write};

use crate::io::traits::RecordWriter;

const BUFFER_SIZE: usize = 8192;

/// Writes each record it receives as one line of text using its [`Display`]
/// implementation. Nothing is filtered: for already sorted input this is the
/// plain pass-through writer.
pub struct TextRecordWriter<W: Write> {
    pub handle: BufWriter<W>,
    records_written: usize,
}

impl<W: Write> TextRecordWriter<W> {
    pub fn new(handle: W) -> Self {
        Self::with_buffer_capacity(handle, BUFFER_SIZE)
    }

    pub fn with_buffer_capacity(handle: W, capacity: usize) -> Self {
        Self {
            handle: BufWriter::with_capacity(capacity, handle),
            records_written: 0,
        }
    }

    /// The number of records written since the last [`RecordWriter::init`]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn get_ref(&self) -> &W {
        self.handle.get_ref()
    }

    /// Flush any buffered output and recover the wrapped stream
    pub fn into_inner(self) -> io::Result<W> {
        self.handle.into_inner().map_err(|e| e.into_error())
    }
}

impl<T: Display, W: Write> RecordWriter<T> for TextRecordWriter<W> {
    fn init(&mut self) -> io::Result<()> {
        self.records_written = 0;
        Ok(())
    }

    fn write_record(&mut self, record: &T) -> io::Result<()> {
        writeln!(self.handle, "{record}")?;
        self.records_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::record::SplashRecord;

    #[test]
    fn test_write_records() -> io::Result<()> {
        let records: Vec<SplashRecord> = ["splash10-a-b,one,1:1", "splash10-a-b,two", "splash10-c-d,x"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut writer = TextRecordWriter::new(Vec::new());
        let n = writer.write_all_records(records.iter())?;
        assert_eq!(n, 3);
        RecordWriter::<SplashRecord>::close(&mut writer)?;
        assert_eq!(writer.records_written(), 3);
        let text = String::from_utf8(writer.into_inner()?).unwrap();
        assert_eq!(text, "splash10-a-b,one,1:1\nsplash10-a-b,two\nsplash10-c-d,x\n");
        Ok(())
    }
}
