pub mod compression;
pub mod peaklist;
pub mod record;
pub mod sorted;
pub mod status;
pub mod traits;

pub use crate::io::compression::{is_gzipped, is_gzipped_extension, open_text_source};
pub use crate::io::peaklist::{
    is_peak_list, parse_peak_list, ParseMode, PeakListError, PeakListLineReader, PeakListReader,
    SpectrumHandler,
};
pub use crate::io::record::{is_splash, Identified, RecordReader, SplashRecord};
pub use crate::io::sorted::{find_duplicates, DuplicateFinder, TextRecordWriter};
pub use crate::io::status::{LogSink, StreamSink};
pub use crate::io::traits::{DiagnosticSink, RecordWriter};
