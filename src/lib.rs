//! `mzsplash` reads mass spectrum peak lists and finds duplicated records in
//! streams of SPLASH-identified spectra.
//!
//! The two halves are independent:
//! - [`io::PeakListReader`] turns `mz:intensity` peak lists into [`Spectrum`]s,
//!   skipping malformed tokens unless asked to be strict.
//! - [`io::DuplicateFinder`] consumes records sorted by SPLASH and writes out
//!   only the members of duplicate runs, counting every repeat.
pub mod io;
pub mod peaks;
pub mod prelude;
pub mod spectrum;

pub use crate::peaks::{Peak, PeakList};
pub use crate::spectrum::Spectrum;

pub use crate::io::{DuplicateFinder, PeakListReader, SplashRecord};
