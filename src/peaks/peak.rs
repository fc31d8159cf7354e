use std::cmp;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single centroided signal in a peak list: an m/z coordinate and the
/// intensity observed there.
#[derive(Default, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }

    /// A peak is usable when both of its values are finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.mz.is_finite() && self.intensity.is_finite() && self.mz >= 0.0 && self.intensity >= 0.0
    }
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.mz, self.intensity)
    }
}

impl cmp::PartialOrd<Peak> for Peak {
    fn partial_cmp(&self, other: &Peak) -> Option<cmp::Ordering> {
        self.mz.partial_cmp(&other.mz)
    }
}

impl cmp::PartialEq<Peak> for Peak {
    fn eq(&self, other: &Peak) -> bool {
        if (self.mz - other.mz).abs() > 1e-6 || (self.intensity - other.intensity).abs() > 1e-6 {
            return false;
        }
        true
    }
}

impl From<(f64, f64)> for Peak {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

pub trait MZLocated {
    fn mz(&self) -> f64;
}

impl MZLocated for Peak {
    #[inline]
    fn mz(&self) -> f64 {
        self.mz
    }
}

pub trait IntensityMeasurement {
    fn intensity(&self) -> f64;
}

impl IntensityMeasurement for Peak {
    #[inline]
    fn intensity(&self) -> f64 {
        self.intensity
    }
}
