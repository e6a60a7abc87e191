//! Textbook amplifier topologies.
//!
//! Both builders hard-code the wiring and validate the result before
//! returning it.

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, GROUND};
use crate::error::Result;
use crate::model::DeviceModel;

/// Output node probed on the common-emitter amplifier.
pub const COMMON_EMITTER_OUTPUTS: &[&str] = &["collector"];

/// Output nodes probed on the differential pair.
pub const DIFFERENTIAL_PAIR_OUTPUTS: &[&str] = &["collector1", "collector2"];

/// Component values of the common-emitter amplifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonEmitterParams {
    /// Supply voltage (V).
    pub vcc: f64,
    /// AC amplitude of the base input source (V).
    pub input_ac: f64,
    /// Upper base bias resistor, Vcc to base (Ω).
    pub r1: f64,
    /// Lower base bias resistor, base to ground (Ω).
    pub r2: f64,
    /// Collector load (Ω).
    pub r3: f64,
    /// Emitter degeneration (Ω).
    pub r4: f64,
    pub model: DeviceModel,
}

impl Default for CommonEmitterParams {
    fn default() -> Self {
        Self {
            vcc: 12.0,
            input_ac: 1.0,
            r1: 100e3,
            r2: 10e3,
            r3: 4.7e3,
            r4: 1e3,
            model: DeviceModel::npn_2n3904(),
        }
    }
}

/// Build the common-emitter amplifier.
pub fn common_emitter(params: &CommonEmitterParams) -> Result<Circuit> {
    let model = params.model.name().to_string();
    let mut circuit = Circuit::new("Common-Emitter Amplifier");
    circuit.declare_nodes(["Vcc", "base", "collector", "emitter"]);

    circuit.voltage_source("V1", "Vcc", GROUND, params.vcc);
    circuit
        .voltage_source("Vin", "base", GROUND, 0.0)
        .set_ac(params.input_ac);

    circuit
        .resistor("R1", "Vcc", "base", params.r1)
        .resistor("R2", "base", GROUND, params.r2)
        .resistor("R3", "Vcc", "collector", params.r3)
        .resistor("R4", "emitter", GROUND, params.r4)
        .bjt("Q1", "collector", "base", "emitter", model.as_str())
        .model(params.model.clone());

    circuit.validate()?;
    Ok(circuit)
}

/// Component values of the differential pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialPairParams {
    /// Supply voltage (V).
    pub vcc: f64,
    /// Shared emitter (tail) resistor (Ω).
    pub r_tail: f64,
    /// Collector load on each side (Ω).
    pub r_load: f64,
    /// Upper base bias resistor on each side (Ω).
    pub r_bias_upper: f64,
    /// Lower base bias resistor on each side (Ω).
    pub r_bias_lower: f64,
    pub model: DeviceModel,
}

impl Default for DifferentialPairParams {
    fn default() -> Self {
        Self {
            vcc: 12.0,
            r_tail: 1e3,
            r_load: 4.7e3,
            r_bias_upper: 100e3,
            r_bias_lower: 10e3,
            model: DeviceModel::npn_2n3904(),
        }
    }
}

/// Build the differential pair.
///
/// There is no AC stimulus: both bases sit on identical bias dividers, so the
/// collectors only carry whatever the engine reports for a quiet circuit.
pub fn differential_pair(params: &DifferentialPairParams) -> Result<Circuit> {
    let model = params.model.name().to_string();
    let mut circuit = Circuit::new("Differential Amplifier");
    circuit.declare_nodes(["Vcc", "E", "base1", "base2", "collector1", "collector2"]);

    circuit.voltage_source("V1", "Vcc", GROUND, params.vcc);

    circuit
        .resistor("R1", "E", GROUND, params.r_tail)
        .bjt("Q1", "collector1", "base1", "E", model.as_str())
        .bjt("Q2", "collector2", "base2", "E", model.as_str())
        .resistor("R2", "Vcc", "collector1", params.r_load)
        .resistor("R3", "Vcc", "collector2", params.r_load)
        .resistor("R4", "Vcc", "base1", params.r_bias_upper)
        .resistor("R5", "base1", GROUND, params.r_bias_lower)
        .resistor("R6", "Vcc", "base2", params.r_bias_upper)
        .resistor("R7", "base2", GROUND, params.r_bias_lower)
        .model(params.model.clone());

    circuit.validate()?;
    Ok(circuit)
}
