//! Chart and schematic rendering for ampsweep.
//!
//! - [`BodePlot`]: magnitude-vs-frequency charts, SVG or bitmap by extension
//! - [`schematic`]: element-by-element circuit diagrams, rendered when the
//!   `schematic` feature is enabled

pub mod bode;
pub mod error;
pub mod schematic;

pub use bode::{BodePlot, ImageFormat};
pub use error::{Error, Result};
pub use schematic::{
    Direction, Drawing, Element, ElementKind, LabelSide, Layout, SCHEMATIC_AVAILABLE,
    SchematicOutcome, common_emitter_schematic, render_schematic,
};
