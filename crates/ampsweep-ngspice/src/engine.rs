//! [`Simulator`] implementation backed by the ngspice executable.

use ampsweep_core::{AcAnalysis, AcSweep, Circuit, OperatingConditions, Simulator};

use crate::deck::ac_deck;
use crate::error::{Error, Result};
use crate::runner::{NgspiceConfig, run_ngspice};
use crate::types::{AnalysisType, RawfileData};

/// ngspice in batch mode.
#[derive(Debug, Clone, Default)]
pub struct Ngspice {
    config: NgspiceConfig,
}

impl Ngspice {
    pub fn new(config: NgspiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NgspiceConfig {
        &self.config
    }

    /// Run an AC analysis and decode the result.
    pub fn run_ac(
        &self,
        circuit: &Circuit,
        sweep: &AcSweep,
        conditions: &OperatingConditions,
    ) -> Result<AcAnalysis> {
        let deck = ac_deck(circuit, sweep, conditions);
        let raw = run_ngspice(&deck, &self.config)?;
        ac_analysis_from_rawfile(&raw)
    }
}

impl Simulator for Ngspice {
    fn name(&self) -> &str {
        "ngspice"
    }

    fn ac(
        &self,
        circuit: &Circuit,
        sweep: &AcSweep,
        conditions: &OperatingConditions,
    ) -> ampsweep_core::Result<AcAnalysis> {
        Ok(self.run_ac(circuit, sweep, conditions)?)
    }
}

/// Convert an AC rawfile into node voltages keyed by variable name.
///
/// The frequency column becomes the analysis grid (its real part; ngspice
/// stores it as complex with a zero imaginary part). Every variable typed
/// `voltage` becomes a node entry.
pub fn ac_analysis_from_rawfile(raw: &RawfileData) -> Result<AcAnalysis> {
    let analysis_type = raw.analysis_type();
    if analysis_type != AnalysisType::Ac {
        return Err(Error::AnalysisTypeMismatch {
            expected: AnalysisType::Ac.to_string(),
            actual: analysis_type.to_string(),
        });
    }

    let freq_var = raw
        .frequency_variable()
        .ok_or_else(|| Error::RawfileParseError("AC plot has no variables".to_string()))?;
    let frequencies = raw.get_real_values(freq_var.index).ok_or_else(|| {
        Error::RawfileParseError("frequency column is incomplete".to_string())
    })?;

    let mut analysis = AcAnalysis::new(frequencies);
    for var in &raw.header.variables {
        if var.index == freq_var.index || !var.var_type.eq_ignore_ascii_case("voltage") {
            continue;
        }
        let values = raw.get_complex_values(var.index).ok_or_else(|| {
            Error::RawfileParseError(format!("column {} is incomplete", var.name))
        })?;
        analysis.insert(var.name.clone(), values)?;
    }
    Ok(analysis)
}
