//! Decibel post-processing of complex AC responses.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Floor added to magnitudes before taking the logarithm.
///
/// Keeps a node with no signal at a finite -240 dB instead of -inf.
pub const DB_FLOOR: f64 = 1e-12;

/// Magnitude of `z` in decibels: `20 * log10(|z| + DB_FLOOR)`.
pub fn magnitude_db(z: Complex64) -> f64 {
    20.0 * (z.norm() + DB_FLOOR).log10()
}

/// Element-wise [`magnitude_db`].
pub fn to_db(values: &[Complex64]) -> Vec<f64> {
    values.iter().copied().map(magnitude_db).collect()
}

/// A labelled magnitude response ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    label: String,
    frequencies: Vec<f64>,
    magnitude_db: Vec<f64>,
}

impl Trace {
    pub fn new(
        label: impl Into<String>,
        frequencies: Vec<f64>,
        magnitude_db: Vec<f64>,
    ) -> Result<Self> {
        let label = label.into();
        if frequencies.len() != magnitude_db.len() {
            return Err(Error::LengthMismatch {
                what: format!("trace {label}"),
                expected: frequencies.len(),
                actual: magnitude_db.len(),
            });
        }
        Ok(Self {
            label,
            frequencies,
            magnitude_db,
        })
    }

    /// Convert a complex node response into a decibel trace.
    pub fn from_response(
        label: impl Into<String>,
        frequencies: &[f64],
        values: &[Complex64],
    ) -> Result<Self> {
        Self::new(label, frequencies.to_vec(), to_db(values))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitude_db(&self) -> &[f64] {
        &self.magnitude_db
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// (frequency, dB) pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitude_db.iter().copied())
    }

    /// Smallest and largest dB value, ignoring non-finite entries.
    pub fn db_range(&self) -> Option<(f64, f64)> {
        self.magnitude_db
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
