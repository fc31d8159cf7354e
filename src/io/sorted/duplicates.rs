use std::io;

use log::{trace, warn};

use crate::io::record::Identified;
use crate::io::status::format_label;
use crate::io::traits::{DiagnosticSink, RecordWriter};

pub const DUPLICATED_SPLASH_LABEL: &str = "duplicated splash: ";
pub const DUPLICATED_ORIGIN_LABEL: &str = "duplicated origin: ";
pub const DUPLICATES_FOUND_LABEL: &str = "duplicates found: ";

/// Finds duplicated records in a stream that is sorted by identity key.
///
/// Only the members of duplicate runs reach the wrapped writer: the first
/// member of a run is written when its first repeat arrives, and every repeat
/// is written as it arrives. Records that never repeat are dropped. Each
/// repeat increments the duplicate counter and reports its key and origin to
/// the [`DiagnosticSink`].
///
/// The finder keeps only the previous record, so duplicates must be adjacent.
/// The ordering of the input is not checked; unsorted input silently misses
/// duplicates.
///
/// ```
/// use mzsplash::io::{find_duplicates, DuplicateFinder, SplashRecord};
///
/// let records: Vec<SplashRecord> = ["k1,a", "k1,b", "k2,c"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let mut status: Vec<(String, String)> = Vec::new();
/// let mut finder = DuplicateFinder::new(Vec::new(), &mut status);
/// let n = find_duplicates(records, &mut finder).unwrap();
/// assert_eq!(n, 1);
/// assert_eq!(finder.into_inner().0.len(), 2);
/// ```
#[derive(Debug)]
pub struct DuplicateFinder<T, W: RecordWriter<T>, S: DiagnosticSink> {
    writer: W,
    sink: S,
    last: Option<T>,
    wrote_last: bool,
    duplicates_found: u64,
    records_seen: u64,
    closed: bool,
}

impl<T: Identified + PartialEq + Clone, W: RecordWriter<T>, S: DiagnosticSink>
    DuplicateFinder<T, W, S>
{
    pub fn new(writer: W, sink: S) -> Self {
        Self {
            writer,
            sink,
            last: None,
            wrote_last: false,
            duplicates_found: 0,
            records_seen: 0,
            closed: false,
        }
    }

    /// The number of records that repeated the one before them in this run
    pub fn duplicates_found(&self) -> u64 {
        self.duplicates_found
    }

    /// The number of records received in this run
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> (W, S) {
        (self.writer, self.sink)
    }

    /// Receive an owned record, avoiding a copy when it has to be retained
    pub fn write_owned(&mut self, record: T) -> io::Result<()> {
        if self.observe(&record)? {
            self.last = Some(record);
        }
        Ok(())
    }

    /// Process one record. Returns `true` when the record starts a new run and
    /// should replace `last`.
    fn observe(&mut self, record: &T) -> io::Result<bool> {
        if self.closed {
            return Err(io::Error::other(
                "record received by a duplicate finder that was already closed",
            ));
        }
        self.records_seen += 1;
        let last = match self.last.as_ref() {
            Some(last) if last == record => last,
            _ => {
                trace!("Starting a new run at {}", record.identity_key());
                self.wrote_last = false;
                return Ok(true);
            }
        };

        if !self.wrote_last {
            self.writer.write_record(last)?;
            self.wrote_last = true;
        }

        self.duplicates_found += 1;
        self.sink
            .status(&format_label(DUPLICATED_SPLASH_LABEL), record.identity_key())?;
        self.sink
            .status(&format_label(DUPLICATED_ORIGIN_LABEL), record.origin())?;

        self.writer.write_record(record)?;
        Ok(false)
    }

    /// Release the wrapped writer after a failure without reporting a total.
    pub fn abort(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.last = None;
        self.wrote_last = false;
        if let Err(e) = self.writer.close() {
            warn!("Failed to close the record writer while aborting: {e}");
        }
    }
}

impl<T: Identified + PartialEq + Clone, W: RecordWriter<T>, S: DiagnosticSink> RecordWriter<T>
    for DuplicateFinder<T, W, S>
{
    /// Forget the previous run so this finder can be reused
    fn init(&mut self) -> io::Result<()> {
        self.last = None;
        self.wrote_last = false;
        self.duplicates_found = 0;
        self.records_seen = 0;
        self.closed = false;
        self.writer.init()
    }

    fn write_record(&mut self, record: &T) -> io::Result<()> {
        if self.observe(record)? {
            self.last = Some(record.clone());
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Close the wrapped writer, then report the number of duplicates found.
    ///
    /// A record still held without a repeat is not written. The held record is
    /// released even if closing the wrapped writer fails, in which case that
    /// error is returned and no total is reported. Closing twice is a no-op.
    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.writer.close();
        self.last = None;
        self.wrote_last = false;
        result?;
        self.sink.status(
            DUPLICATES_FOUND_LABEL,
            &self.duplicates_found.to_string(),
        )
    }
}

/// Stream `records` through `finder` from [`RecordWriter::init`] to
/// [`RecordWriter::close`], returning the number of duplicates found.
///
/// If a write fails the wrapped writer is still released, but no total is
/// reported.
pub fn find_duplicates<T, I, W, S>(
    records: I,
    finder: &mut DuplicateFinder<T, W, S>,
) -> io::Result<u64>
where
    T: Identified + PartialEq + Clone,
    I: IntoIterator<Item = T>,
    W: RecordWriter<T>,
    S: DiagnosticSink,
{
    finder.init()?;
    if let Err(e) = records
        .into_iter()
        .try_for_each(|record| finder.write_owned(record))
    {
        finder.abort();
        return Err(e);
    }
    finder.close()?;
    Ok(finder.duplicates_found())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::record::SplashRecord;

    const A: &str = "splash10-0udi-0900000000-4f7c7d9d2a94e7ba0e5f";
    const B: &str = "splash10-0a4i-0900000000-d2bc1c887f6f99ed0f74";
    const C: &str = "splash10-0zfr-0900000000-0a6b0e6b7bb9e2a3d8fb";

    fn rec(key: &str, origin: &str) -> SplashRecord {
        SplashRecord::new(key.to_string(), origin.to_string(), None)
    }

    type Status = Vec<(String, String)>;

    fn run(records: Vec<SplashRecord>) -> (Vec<SplashRecord>, Status, u64) {
        let mut finder = DuplicateFinder::new(Vec::new(), Status::new());
        let n = find_duplicates(records, &mut finder).unwrap();
        let (written, status) = finder.into_inner();
        (written, status, n)
    }

    fn origins(written: &[SplashRecord]) -> Vec<&str> {
        written.iter().map(|r| r.origin()).collect()
    }

    #[test]
    fn test_no_duplicates() {
        let (written, status, n) = run(vec![rec(A, "1"), rec(B, "2"), rec(C, "3")]);
        assert!(written.is_empty());
        assert_eq!(n, 0);
        assert_eq!(
            status,
            vec![(DUPLICATES_FOUND_LABEL.to_string(), "0".to_string())]
        );
    }

    #[test]
    fn test_pair() {
        let (written, status, n) = run(vec![rec(A, "1"), rec(A, "2")]);
        assert_eq!(n, 1);
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|r| r.identity_key() == A));
        assert_eq!(origins(&written), vec!["1", "2"]);
        assert_eq!(
            status,
            vec![
                (format_label(DUPLICATED_SPLASH_LABEL), A.to_string()),
                (format_label(DUPLICATED_ORIGIN_LABEL), "2".to_string()),
                (DUPLICATES_FOUND_LABEL.to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_triple() {
        let (written, status, n) = run(vec![rec(A, "1"), rec(A, "2"), rec(A, "3")]);
        assert_eq!(n, 2);
        assert_eq!(origins(&written), vec!["1", "2", "3"]);
        assert_eq!(status.len(), 5);
    }

    #[test]
    fn test_run_boundary() {
        let (written, _, n) = run(vec![
            rec(A, "1"),
            rec(A, "2"),
            rec(B, "3"),
            rec(B, "4"),
            rec(B, "5"),
        ]);
        assert_eq!(n, 3);
        assert_eq!(origins(&written), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_singletons_between_runs_are_dropped() {
        let (written, _, n) = run(vec![
            rec(A, "1"),
            rec(B, "2"),
            rec(B, "3"),
            rec(C, "4"),
        ]);
        assert_eq!(n, 1);
        assert_eq!(origins(&written), vec!["2", "3"]);
    }

    #[test]
    fn test_empty_stream() {
        let (written, status, n) = run(Vec::new());
        assert!(written.is_empty());
        assert_eq!(n, 0);
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn test_unsorted_input_misses_duplicates() {
        let (written, _, n) = run(vec![rec(A, "1"), rec(B, "2"), rec(A, "3")]);
        assert_eq!(n, 0);
        assert!(written.is_empty());
    }

    #[test]
    fn test_reuse_after_init() -> io::Result<()> {
        let mut written: Vec<SplashRecord> = Vec::new();
        let mut status = Status::new();
        let mut finder = DuplicateFinder::new(&mut written, &mut status);

        let n = find_duplicates(vec![rec(A, "1"), rec(A, "2"), rec(A, "3")], &mut finder)?;
        assert_eq!(n, 2);

        // The retained record of the first run must not pair with the second
        finder.init()?;
        finder.write_record(&rec(A, "4"))?;
        finder.write_record(&rec(B, "5"))?;
        assert_eq!(finder.duplicates_found(), 0);
        assert_eq!(finder.records_seen(), 2);
        finder.close()?;
        drop(finder);

        assert!(written.is_empty());
        assert_eq!(
            status.last().unwrap(),
            &(DUPLICATES_FOUND_LABEL.to_string(), "0".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_close_is_idempotent() -> io::Result<()> {
        let mut finder = DuplicateFinder::<SplashRecord, _, _>::new(Vec::new(), Status::new());
        finder.write_record(&rec(A, "1"))?;
        finder.write_record(&rec(A, "2"))?;
        finder.close()?;
        finder.close()?;
        assert!(finder.is_closed());
        assert!(finder.write_record(&rec(A, "3")).is_err());
        let (written, status) = finder.into_inner();
        assert_eq!(written.len(), 2);
        assert_eq!(
            status
                .iter()
                .filter(|(label, _)| label == DUPLICATES_FOUND_LABEL)
                .count(),
            1
        );
        Ok(())
    }

    /// Fails on the nth write, or on close
    #[derive(Default)]
    struct FailingWriter {
        fail_at: Option<usize>,
        fail_close: bool,
        writes: usize,
        closes: usize,
    }

    impl RecordWriter<SplashRecord> for FailingWriter {
        fn write_record(&mut self, _record: &SplashRecord) -> io::Result<()> {
            self.writes += 1;
            if Some(self.writes) == self.fail_at {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed pipe"));
            }
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn close(&mut self) -> io::Result<()> {
            self.closes += 1;
            if self.fail_close {
                return Err(io::Error::other("close failed"));
            }
            Ok(())
        }
    }

    #[test_log::test]
    fn test_write_error_propagates() {
        let writer = FailingWriter {
            fail_at: Some(2),
            ..Default::default()
        };
        let mut finder = DuplicateFinder::new(writer, Status::new());
        let err = find_duplicates(
            vec![rec(A, "1"), rec(A, "2"), rec(A, "3"), rec(A, "4")],
            &mut finder,
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        let (writer, status) = finder.into_inner();
        assert_eq!(writer.closes, 1);
        assert!(status
            .iter()
            .all(|(label, _)| label != DUPLICATES_FOUND_LABEL));
    }

    #[test]
    fn test_close_error_skips_total() {
        let writer = FailingWriter {
            fail_close: true,
            ..Default::default()
        };
        let mut finder = DuplicateFinder::new(writer, Status::new());
        finder.write_record(&rec(A, "1")).unwrap();
        finder.write_record(&rec(A, "2")).unwrap();
        assert!(finder.close().is_err());
        assert!(finder.is_closed());
        let (writer, status) = finder.into_inner();
        assert_eq!(writer.writes, 2);
        assert_eq!(writer.closes, 1);
        assert_eq!(status.len(), 2);
    }

    #[test]
    fn test_finders_compose() -> io::Result<()> {
        let inner = DuplicateFinder::new(Vec::new(), Status::new());
        let mut outer = DuplicateFinder::new(inner, Status::new());
        find_duplicates(vec![rec(A, "1"), rec(A, "2"), rec(B, "3")], &mut outer)?;
        let (inner, _) = outer.into_inner();
        assert_eq!(inner.duplicates_found(), 1);
        assert!(inner.is_closed());
        Ok(())
    }
}
