pub use crate::io::record::Identified;
pub use crate::io::peaklist::SpectrumHandler;
pub use crate::io::traits::{DiagnosticSink, RecordWriter};
pub use crate::peaks::{IntensityMeasurement, MZLocated};
pub use std::io::prelude::*;
