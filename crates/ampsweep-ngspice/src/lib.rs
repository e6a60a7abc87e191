//! ngspice backend for ampsweep.
//!
//! This crate provides:
//! - Rendering a circuit and AC sweep into an ngspice batch deck
//! - Running ngspice as a subprocess and capturing its rawfile
//! - Decoding ASCII and binary rawfiles
//! - [`Ngspice`], the [`ampsweep_core::Simulator`] built on the above

pub mod deck;
pub mod engine;
pub mod error;
pub mod rawfile;
pub mod runner;
pub mod types;

pub use deck::ac_deck;
pub use engine::{Ngspice, ac_analysis_from_rawfile};
pub use error::{Error, Result};
pub use rawfile::parse_rawfile;
pub use runner::{NgspiceConfig, is_ngspice_available, ngspice_version, run_ngspice};
pub use types::{AnalysisType, RawVariable, RawfileData, RawfileHeader};
