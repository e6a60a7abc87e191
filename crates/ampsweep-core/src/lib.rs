//! Circuit description and AC response processing for ampsweep.
//!
//! This crate provides:
//! - [`Circuit`]: nodes, sources, resistors, BJTs and device models, with
//!   structural validation and SPICE netlist rendering
//! - [`topology`]: the common-emitter and differential-pair builders
//! - [`AcSweep`] and [`OperatingConditions`]: the analysis request
//! - [`Simulator`] and [`invoke`]: the seam to an external engine
//! - [`response`]: decibel conversion and plot traces

pub mod circuit;
pub mod error;
pub mod model;
pub mod response;
pub mod simulation;
pub mod sweep;
pub mod topology;
pub mod units;

pub use circuit::{Bjt, Circuit, GROUND, Resistor, VoltageSource};
pub use error::{Error, Result};
pub use model::{DeviceKind, DeviceModel};
pub use response::{DB_FLOOR, Trace, magnitude_db, to_db};
pub use simulation::{AcAnalysis, AcResponse, NodeResponse, Simulator, invoke};
pub use sweep::{AcSweep, OperatingConditions, SweepType};
pub use topology::{
    COMMON_EMITTER_OUTPUTS, CommonEmitterParams, DIFFERENTIAL_PAIR_OUTPUTS,
    DifferentialPairParams, common_emitter, differential_pair,
};
