use std::fmt;
use std::ops;
use std::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::peak::{IntensityMeasurement, Peak};

/// An ordered list of peaks. Unlike a search-oriented peak set, the order of
/// insertion is preserved, so a list read from text keeps its token order.
#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakList {
    pub peaks: Vec<Peak>,
}

impl PeakList {
    pub fn new(peaks: Vec<Peak>) -> Self {
        Self { peaks }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            peaks: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, peak: Peak) {
        self.peaks.push(peak);
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Peak> {
        self.peaks.iter()
    }

    pub fn as_slice(&self) -> &[Peak] {
        &self.peaks
    }

    /// The most intense peak, or `None` for an empty list. Ties resolve to the
    /// earliest peak.
    pub fn base_peak(&self) -> Option<&Peak> {
        self.peaks.iter().fold(None, |best: Option<&Peak>, p| match best {
            Some(b) if b.intensity() >= p.intensity() => Some(b),
            _ => Some(p),
        })
    }

    /// Total ion current
    pub fn tic(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity()).sum()
    }

    /// Sort the peaks by m/z in place
    pub fn sort(&mut self) {
        self.peaks
            .sort_by(|a, b| a.mz.total_cmp(&b.mz).then(b.intensity.total_cmp(&a.intensity)));
    }
}

impl ops::Index<usize> for PeakList {
    type Output = Peak;

    fn index(&self, index: usize) -> &Self::Output {
        &self.peaks[index]
    }
}

impl FromIterator<Peak> for PeakList {
    fn from_iter<T: IntoIterator<Item = Peak>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for PeakList {
    type Item = Peak;
    type IntoIter = std::vec::IntoIter<Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.into_iter()
    }
}

impl<'a> IntoIterator for &'a PeakList {
    type Item = &'a Peak;
    type IntoIter = slice::Iter<'a, Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.iter()
    }
}

/// Renders the list back to whitespace separated `mz:intensity` tokens
impl fmt::Display for PeakList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut it = self.peaks.iter();
        if let Some(first) = it.next() {
            write!(f, "{first}")?;
            for peak in it {
                write!(f, " {peak}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make() -> PeakList {
        vec![(103.0, 3.0), (100.0, 1.0), (101.0, 7.0), (99.0, 7.0)]
            .into_iter()
            .map(Peak::from)
            .collect()
    }

    #[test]
    fn test_summaries() {
        let peaks = make();
        assert_eq!(peaks.len(), 4);
        assert!((peaks.tic() - 18.0).abs() < 1e-9);
        let bp = peaks.base_peak().unwrap();
        assert_eq!(bp.mz, 101.0);
        assert!(PeakList::default().base_peak().is_none());
    }

    #[test]
    fn test_sort_and_display() {
        let mut peaks = make();
        assert_eq!(peaks.to_string(), "103:3 100:1 101:7 99:7");
        peaks.sort();
        let mzs: Vec<f64> = peaks.iter().map(|p| p.mz).collect();
        assert_eq!(mzs, vec![99.0, 100.0, 101.0, 103.0]);
        assert_eq!(PeakList::default().to_string(), "");
    }
}
