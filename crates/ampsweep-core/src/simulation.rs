//! Simulator seam and the AC invocation step.
//!
//! The numerical work lives in an external engine behind [`Simulator`].
//! [`invoke`] validates the request, runs the engine and pulls the requested
//! node voltages out of the result. A node the engine did not report is
//! replaced with zeros and logged once, so plotting can still go ahead.

use indexmap::{IndexMap, IndexSet};
use num_complex::Complex64;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::response::Trace;
use crate::sweep::{AcSweep, OperatingConditions};

/// An engine able to run AC small-signal analysis on a [`Circuit`].
pub trait Simulator {
    /// Short backend name used in diagnostics.
    fn name(&self) -> &str;

    /// Compute the DC operating point at `conditions`, then sweep.
    fn ac(
        &self,
        circuit: &Circuit,
        sweep: &AcSweep,
        conditions: &OperatingConditions,
    ) -> Result<AcAnalysis>;
}

/// Complex node voltages over a frequency grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcAnalysis {
    frequencies: Vec<f64>,
    voltages: IndexMap<String, Vec<Complex64>>,
}

impl AcAnalysis {
    pub fn new(frequencies: Vec<f64>) -> Self {
        Self {
            frequencies,
            voltages: IndexMap::new(),
        }
    }

    /// Add a node's response; it must cover every frequency point.
    pub fn insert(&mut self, node: impl Into<String>, values: Vec<Complex64>) -> Result<()> {
        let node = node.into();
        if values.len() != self.frequencies.len() {
            return Err(Error::LengthMismatch {
                what: format!("node {node}"),
                expected: self.frequencies.len(),
                actual: values.len(),
            });
        }
        self.voltages.insert(node, values);
        Ok(())
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.voltages.keys().map(String::as_str)
    }

    /// Voltage at `node`.
    ///
    /// Accepts the bare node name or the `V(node)` form, case-insensitively,
    /// since engines commonly lower-case node names.
    pub fn voltage(&self, node: &str) -> Option<&[Complex64]> {
        if let Some(values) = self.voltages.get(node) {
            return Some(values);
        }
        let wanted = strip_voltage_wrapper(node).to_lowercase();
        self.voltages
            .iter()
            .find(|(k, _)| strip_voltage_wrapper(k).to_lowercase() == wanted)
            .map(|(_, v)| v.as_slice())
    }
}

fn strip_voltage_wrapper(name: &str) -> &str {
    name.strip_prefix("V(")
        .or_else(|| name.strip_prefix("v("))
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(name)
}

/// Response of one requested output node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResponse {
    pub node: String,
    pub values: Vec<Complex64>,
    /// True when the engine did not report this node and `values` are zeros.
    pub missing: bool,
}

/// What [`invoke`] hands to post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct AcResponse {
    frequencies: Vec<f64>,
    outputs: Vec<NodeResponse>,
}

impl AcResponse {
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn outputs(&self) -> &[NodeResponse] {
        &self.outputs
    }

    pub fn output(&self, node: &str) -> Option<&NodeResponse> {
        self.outputs.iter().find(|o| o.node == node)
    }

    /// Requested nodes that had to be zero-filled.
    pub fn missing(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter(|o| o.missing)
            .map(|o| o.node.as_str())
            .collect()
    }

    /// Decibel trace for every output, labelled with `label(node)`.
    pub fn traces<F>(&self, mut label: F) -> Result<Vec<Trace>>
    where
        F: FnMut(&str) -> String,
    {
        self.outputs
            .iter()
            .map(|o| Trace::from_response(label(&o.node), &self.frequencies, &o.values))
            .collect()
    }
}

/// Run an AC analysis and collect the requested output nodes.
///
/// Invalid circuits and sweeps are rejected before the engine is called.
/// Engine failures propagate. Each requested node that the engine did not
/// report comes back as zeros with `missing` set, and produces exactly one
/// warning.
pub fn invoke(
    simulator: &dyn Simulator,
    circuit: &Circuit,
    sweep: &AcSweep,
    conditions: &OperatingConditions,
    outputs: &[&str],
) -> Result<AcResponse> {
    circuit.validate()?;
    sweep.validate()?;

    log::debug!(
        "running {} on '{}' with {}",
        simulator.name(),
        circuit.title(),
        sweep.to_spice()
    );
    let analysis = simulator.ac(circuit, sweep, conditions)?;
    log::debug!(
        "{} returned {} frequency points",
        simulator.name(),
        analysis.len()
    );

    let requested: IndexSet<&str> = outputs.iter().copied().collect();
    let outputs = requested
        .into_iter()
        .map(|node| match analysis.voltage(node) {
            Some(values) => NodeResponse {
                node: node.to_string(),
                values: values.to_vec(),
                missing: false,
            },
            None => {
                log::warn!("Node '{}' not found; using zeros.", node);
                NodeResponse {
                    node: node.to_string(),
                    values: vec![Complex64::new(0.0, 0.0); analysis.len()],
                    missing: true,
                }
            }
        })
        .collect();

    Ok(AcResponse {
        frequencies: analysis.frequencies,
        outputs,
    })
}
