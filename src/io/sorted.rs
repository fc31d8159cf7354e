//! Writers that consume records which were sorted by identity key upstream.
mod duplicates;
mod writer;

pub use duplicates::{
    find_duplicates, DuplicateFinder, DUPLICATED_ORIGIN_LABEL, DUPLICATED_SPLASH_LABEL,
    DUPLICATES_FOUND_LABEL,
};
pub use writer::TextRecordWriter;
