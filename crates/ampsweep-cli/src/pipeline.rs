//! The simulate-and-plot steps of a run.

use std::path::Path;

use ampsweep_core::{AcSweep, Circuit, OperatingConditions, Simulator, invoke};
use ampsweep_plot::{BodePlot, Drawing, SchematicOutcome, render_schematic};
use anyhow::{Context, Result};

use crate::output::CircuitTraces;

/// 10 Hz to 100 MHz, 100 points per decade.
pub fn bode_sweep() -> Result<AcSweep> {
    Ok(AcSweep::decade(100, 10.0, 100e6)?)
}

/// Run the AC analysis and turn each output node into a `V(node)` trace.
pub fn simulate(
    simulator: &dyn Simulator,
    circuit: &Circuit,
    sweep: &AcSweep,
    conditions: &OperatingConditions,
    outputs: &[&str],
) -> Result<CircuitTraces> {
    let response = invoke(simulator, circuit, sweep, conditions, outputs)
        .with_context(|| format!("simulating {}", circuit.title()))?;
    let traces = response.traces(|node| format!("V({node})"))?;
    log::debug!(
        "{}: {} traces over {} frequencies",
        circuit.title(),
        traces.len(),
        response.frequencies().len()
    );
    Ok(CircuitTraces {
        circuit: circuit.title().to_string(),
        traces,
        missing: response.missing().into_iter().map(String::from).collect(),
    })
}

/// Announce, print the netlist, simulate and write the Bode plot.
pub fn run_bode(
    simulator: &dyn Simulator,
    circuit: &Circuit,
    sweep: &AcSweep,
    conditions: &OperatingConditions,
    outputs: &[&str],
    path: &Path,
) -> Result<CircuitTraces> {
    println!("Simulating {}...", circuit.title());
    println!("{circuit}");

    let run = simulate(simulator, circuit, sweep, conditions, outputs)?;
    BodePlot::new(circuit.title())
        .with_traces(run.traces.iter().cloned())
        .render(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Saved {}", path.display());
    Ok(run)
}

/// Draw the schematic, or report that it could not be drawn.
///
/// The diagram is optional: a render failure is logged and treated as a skip.
pub fn run_schematic(title: &str, drawing: &Drawing, path: &Path) -> SchematicOutcome {
    println!("Drawing {title} circuit diagram (if available)...");
    match render_schematic(drawing, path) {
        Ok(SchematicOutcome::Rendered(p)) => {
            println!("Saved {}", p.display());
            SchematicOutcome::Rendered(p)
        }
        Ok(SchematicOutcome::Skipped) => {
            println!("Schematic support not available; skipping circuit diagram.");
            SchematicOutcome::Skipped
        }
        Err(e) => {
            log::warn!("could not draw {}: {e}", path.display());
            println!("Circuit diagram unavailable; skipping.");
            SchematicOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampsweep_core::{
        AcAnalysis, CommonEmitterParams, DifferentialPairParams, common_emitter,
        differential_pair,
    };
    use ampsweep_plot::{SCHEMATIC_AVAILABLE, common_emitter_schematic};
    use num_complex::Complex64;

    /// Reports a fixed gain on the nodes it knows.
    struct FlatGain {
        nodes: Vec<&'static str>,
        gain: f64,
    }

    impl Simulator for FlatGain {
        fn name(&self) -> &str {
            "flat"
        }

        fn ac(
            &self,
            _circuit: &Circuit,
            sweep: &AcSweep,
            _conditions: &OperatingConditions,
        ) -> ampsweep_core::Result<AcAnalysis> {
            let f = sweep.nominal_frequencies();
            let mut analysis = AcAnalysis::new(f.clone());
            for node in &self.nodes {
                analysis.insert(*node, vec![Complex64::new(self.gain, 0.0); f.len()])?;
            }
            Ok(analysis)
        }
    }

    #[test]
    fn test_bode_sweep_grid() {
        let f = bode_sweep().unwrap().nominal_frequencies();
        assert_eq!(f.len(), 701);
    }

    #[test]
    fn test_simulate_labels_traces() {
        let circuit = differential_pair(&DifferentialPairParams::default()).unwrap();
        let engine = FlatGain {
            nodes: vec!["collector1", "collector2"],
            gain: 10.0,
        };
        let sweep = bode_sweep().unwrap();
        let run = simulate(
            &engine,
            &circuit,
            &sweep,
            &OperatingConditions::default(),
            &["collector1", "collector2"],
        )
        .unwrap();
        assert_eq!(run.circuit, "Differential Amplifier");
        let labels: Vec<&str> = run.traces.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["V(collector1)", "V(collector2)"]);
        assert!(run.missing.is_empty());
        assert!(
            run.traces[0]
                .magnitude_db()
                .iter()
                .all(|v| (v - 20.0).abs() < 1e-6)
        );
    }

    #[test]
    fn test_simulate_reports_missing_nodes() {
        let circuit = common_emitter(&CommonEmitterParams::default()).unwrap();
        let engine = FlatGain {
            nodes: vec![],
            gain: 1.0,
        };
        let run = simulate(
            &engine,
            &circuit,
            &bode_sweep().unwrap(),
            &OperatingConditions::default(),
            &["collector"],
        )
        .unwrap();
        assert_eq!(run.missing, vec!["collector".to_string()]);
        assert!(
            run.traces[0]
                .magnitude_db()
                .iter()
                .all(|v| (v - -240.0).abs() < 1e-9)
        );
    }

    #[test]
    fn test_schematic_failure_is_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes the write fail.
        let path = dir.path().join("common_emitter_schematic.svg");
        std::fs::create_dir(&path).unwrap();
        let drawing = common_emitter_schematic(&CommonEmitterParams::default());
        let outcome = run_schematic("Common-Emitter Amplifier", &drawing, &path);
        assert_eq!(outcome, SchematicOutcome::Skipped);
        assert!(path.is_dir());
    }

    #[test]
    fn test_schematic_capability_follows_feature() {
        assert_eq!(SCHEMATIC_AVAILABLE, cfg!(feature = "schematic"));
    }

    #[cfg(not(feature = "schematic"))]
    #[test]
    fn test_schematic_skipped_without_feature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common_emitter_schematic.svg");
        let drawing = common_emitter_schematic(&CommonEmitterParams::default());
        let outcome = run_schematic("Common-Emitter Amplifier", &drawing, &path);
        assert_eq!(outcome, SchematicOutcome::Skipped);
        assert!(!path.exists());
    }
}
