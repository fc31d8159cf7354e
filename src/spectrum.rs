//! The in-memory spectrum produced by the peak list reader.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::peaks::{Peak, PeakList};

/// A mass spectrum read from a textual peak list.
///
/// The peaks are kept in the order they were read. A spectrum read from an
/// `id,peaks` line carries that identifier, otherwise `id` is `None`.
#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spectrum {
    pub id: Option<String>,
    pub peaks: PeakList,
}

impl Spectrum {
    pub fn new(id: Option<String>, peaks: PeakList) -> Self {
        Self { id, peaks }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn peaks(&self) -> &PeakList {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn into_peaks(self) -> PeakList {
        self.peaks
    }

    /// The `(mz, intensity)` pairs of this spectrum, in order
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.peaks.iter().map(|p| (p.mz, p.intensity)).collect()
    }
}

impl From<PeakList> for Spectrum {
    fn from(peaks: PeakList) -> Self {
        Self::new(None, peaks)
    }
}

impl From<Vec<Peak>> for Spectrum {
    fn from(peaks: Vec<Peak>) -> Self {
        Self::new(None, PeakList::new(peaks))
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{},{}", id, self.peaks),
            None => write!(f, "{}", self.peaks),
        }
    }
}
