use std::io;

/// Common interface for sinks that accept a stream of records.
///
/// A writer is initialized with [`RecordWriter::init`] before use, fed with
/// [`RecordWriter::write_record`], and released with [`RecordWriter::close`].
/// Calling `init` again after `close` prepares the writer for another run.
pub trait RecordWriter<T> {
    /// Reset any per-run state
    fn init(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Write out a single record
    fn write_record(&mut self, record: &T) -> io::Result<()>;

    /// As [`std::io::Write::flush`]
    fn flush(&mut self) -> io::Result<()>;

    /// Flush and release the underlying resource for this run
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }

    /// Consume an [`Iterator`] over record references, returning the number
    /// of records consumed
    fn write_all_records<'b, I: Iterator<Item = &'b T>>(&mut self, iterator: I) -> io::Result<usize>
    where
        T: 'b,
    {
        let mut n = 0;
        for record in iterator {
            self.write_record(record)?;
            n += 1;
        }
        Ok(n)
    }
}

/// Collects clones of every record, mostly useful for inspection
impl<T: Clone> RecordWriter<T> for Vec<T> {
    fn init(&mut self) -> io::Result<()> {
        self.clear();
        Ok(())
    }

    fn write_record(&mut self, record: &T) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T, W: RecordWriter<T> + ?Sized> RecordWriter<T> for &mut W {
    fn init(&mut self) -> io::Result<()> {
        (**self).init()
    }

    fn write_record(&mut self, record: &T) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// A receiver for human readable progress and status reports.
pub trait DiagnosticSink {
    /// Report a `label` and its `value`
    fn status(&mut self, label: &str, value: &str) -> io::Result<()>;
}

/// Keeps every reported pair in memory
impl DiagnosticSink for Vec<(String, String)> {
    fn status(&mut self, label: &str, value: &str) -> io::Result<()> {
        self.push((label.to_string(), value.to_string()));
        Ok(())
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn status(&mut self, label: &str, value: &str) -> io::Result<()> {
        (**self).status(label, value)
    }
}
