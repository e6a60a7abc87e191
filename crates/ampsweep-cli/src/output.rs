//! Output file naming and JSON trace dumps.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use ampsweep_core::Trace;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Image format for every written figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// Where each figure of a run goes.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
    format: OutputFormat,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    fn file(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.format.extension()))
    }

    pub fn common_emitter_bode(&self) -> PathBuf {
        self.file("common_emitter_bode")
    }

    pub fn common_emitter_schematic(&self) -> PathBuf {
        self.file("common_emitter_schematic")
    }

    pub fn differential_bode(&self) -> PathBuf {
        self.file("differential_bode")
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output directory {}", self.dir.display()))
    }
}

/// Traces computed for one circuit.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitTraces {
    pub circuit: String,
    pub traces: Vec<Trace>,
    /// Output nodes the engine did not report.
    pub missing: Vec<String>,
}

/// Write every circuit's traces as pretty JSON.
pub fn write_json(path: &Path, runs: &[CircuitTraces]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), runs)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
