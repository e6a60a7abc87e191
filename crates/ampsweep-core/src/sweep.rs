//! AC sweep request and operating conditions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::units::format_value;

/// Frequency spacing of an AC sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepType {
    /// Logarithmic, `points` per decade.
    Dec,
    /// Logarithmic, `points` per octave.
    Oct,
    /// Linear, `points` in total.
    Lin,
}

impl SweepType {
    pub fn as_spice(self) -> &'static str {
        match self {
            SweepType::Dec => "dec",
            SweepType::Oct => "oct",
            SweepType::Lin => "lin",
        }
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

/// AC small-signal sweep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcSweep {
    sweep_type: SweepType,
    points: usize,
    start: f64,
    stop: f64,
}

impl AcSweep {
    pub fn new(sweep_type: SweepType, points: usize, start: f64, stop: f64) -> Result<Self> {
        let sweep = Self {
            sweep_type,
            points,
            start,
            stop,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    /// Decade sweep, the spacing both amplifiers use.
    pub fn decade(points_per_decade: usize, start: f64, stop: f64) -> Result<Self> {
        Self::new(SweepType::Dec, points_per_decade, start, stop)
    }

    pub fn sweep_type(&self) -> SweepType {
        self.sweep_type
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(Error::InvalidSweep("point count must be at least 1".into()));
        }
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(Error::InvalidSweep("frequencies must be finite".into()));
        }
        if self.stop < self.start {
            return Err(Error::InvalidSweep(format!(
                "stop frequency {} is below start frequency {}",
                self.stop, self.start
            )));
        }
        if self.sweep_type != SweepType::Lin && self.start <= 0.0 {
            return Err(Error::InvalidSweep(format!(
                "logarithmic sweep needs a positive start frequency, got {}",
                self.start
            )));
        }
        Ok(())
    }

    /// The SPICE `.ac` card for this sweep.
    pub fn to_spice(&self) -> String {
        format!(
            ".ac {} {} {} {}",
            self.sweep_type,
            self.points,
            format_value(self.start),
            format_value(self.stop)
        )
    }

    /// Frequency grid following the SPICE convention.
    ///
    /// Logarithmic sweeps take `floor(points * span + 0.5) + 1` points from
    /// start to stop inclusive, so 10 Hz to 100 MHz at 100 per decade gives
    /// 701 points. Engines may round the last point slightly differently, so
    /// use this as a reference grid, not a replacement for the engine's own.
    pub fn nominal_frequencies(&self) -> Vec<f64> {
        match self.sweep_type {
            SweepType::Dec | SweepType::Oct => {
                let base: f64 = if self.sweep_type == SweepType::Dec { 10.0 } else { 2.0 };
                let span = (self.stop / self.start).log(base);
                let steps = (self.points as f64 * span + 0.5).floor() as usize;
                if steps == 0 {
                    return vec![self.start];
                }
                (0..=steps)
                    .map(|i| {
                        if i == steps {
                            self.stop
                        } else {
                            self.start * base.powf(i as f64 / self.points as f64)
                        }
                    })
                    .collect()
            }
            SweepType::Lin => {
                if self.points <= 1 {
                    return vec![self.start];
                }
                let step = (self.stop - self.start) / (self.points - 1) as f64;
                (0..self.points)
                    .map(|i| self.start + step * i as f64)
                    .collect()
            }
        }
    }
}

/// Temperatures applied to the DC operating point computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingConditions {
    /// Circuit temperature in °C.
    pub temperature: f64,
    /// Nominal temperature model parameters were measured at, in °C.
    pub nominal_temperature: f64,
}

impl Default for OperatingConditions {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            nominal_temperature: 25.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spice_card() {
        let sweep = AcSweep::decade(100, 10.0, 100e6).unwrap();
        assert_eq!(sweep.to_spice(), ".ac dec 100 10 100Meg");
    }

    #[test]
    fn test_decade_grid() {
        let sweep = AcSweep::decade(100, 10.0, 100e6).unwrap();
        let f = sweep.nominal_frequencies();
        assert_eq!(f.len(), 701);
        assert_eq!(f[0], 10.0);
        assert_eq!(*f.last().unwrap(), 100e6);
        assert!(f.windows(2).all(|w| w[1] > w[0]));
        assert!((f[100] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_octave_grid() {
        let sweep = AcSweep::new(SweepType::Oct, 2, 100.0, 400.0).unwrap();
        let f = sweep.nominal_frequencies();
        assert_eq!(f.len(), 5);
        assert!((f[2] - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_grid() {
        let sweep = AcSweep::new(SweepType::Lin, 5, 0.0, 100.0).unwrap();
        assert_eq!(sweep.nominal_frequencies(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_single_frequency() {
        let sweep = AcSweep::decade(10, 1e3, 1e3).unwrap();
        assert_eq!(sweep.nominal_frequencies(), vec![1e3]);
    }

    #[test]
    fn test_invalid_sweeps() {
        assert!(AcSweep::decade(0, 10.0, 1e3).is_err());
        assert!(AcSweep::decade(10, 0.0, 1e3).is_err());
        assert!(AcSweep::decade(10, 1e3, 10.0).is_err());
        assert!(AcSweep::decade(10, f64::NAN, 10.0).is_err());
        assert!(AcSweep::new(SweepType::Lin, 10, 0.0, 1e3).is_ok());
    }

    #[test]
    fn test_default_conditions() {
        let c = OperatingConditions::default();
        assert_eq!(c.temperature, 25.0);
        assert_eq!(c.nominal_temperature, 25.0);
    }

    #[test]
    fn test_sweep_serde() {
        let sweep = AcSweep::decade(100, 10.0, 100e6).unwrap();
        let json = serde_json::to_string(&sweep).unwrap();
        assert!(json.contains("\"dec\""));
        let back: AcSweep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sweep);
    }
}
