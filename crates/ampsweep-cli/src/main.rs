//! ampsweep: Bode plots of two small-signal amplifiers through ngspice.

mod output;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;

use ampsweep_core::{
    COMMON_EMITTER_OUTPUTS, CommonEmitterParams, DIFFERENTIAL_PAIR_OUTPUTS,
    DifferentialPairParams, OperatingConditions, common_emitter, differential_pair,
};
use ampsweep_ngspice::{Ngspice, NgspiceConfig};
use ampsweep_plot::{SCHEMATIC_AVAILABLE, common_emitter_schematic};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use output::{OutputFormat, OutputPaths, write_json};
use pipeline::{bode_sweep, run_bode, run_schematic};

/// Simulate a common-emitter and a differential-pair amplifier and plot
/// their frequency response
#[derive(Parser)]
#[command(name = "ampsweep", version, about)]
struct Cli {
    /// Directory the figures are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Image format for every figure
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// ngspice executable
    #[arg(long, env = "AMPSWEEP_NGSPICE", default_value = "ngspice")]
    ngspice: String,

    /// Kill ngspice after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Skip the circuit diagram
    #[arg(long)]
    no_schematic: bool,

    /// Also write the computed traces as JSON
    #[arg(long, value_name = "FILE")]
    dump_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings share stdout with the progress messages.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .without_time()
        .with_target(false)
        .init();

    let mut config = NgspiceConfig::default().with_executable(&cli.ngspice);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(secs);
    }
    let engine = Ngspice::new(config);

    let paths = OutputPaths::new(&cli.out_dir, cli.format);
    paths.ensure_dir()?;

    let sweep = bode_sweep()?;
    let conditions = OperatingConditions::default();
    let mut runs = Vec::new();

    let ce_params = CommonEmitterParams::default();
    let ce = common_emitter(&ce_params).context("building common-emitter amplifier")?;
    runs.push(run_bode(
        &engine,
        &ce,
        &sweep,
        &conditions,
        COMMON_EMITTER_OUTPUTS,
        &paths.common_emitter_bode(),
    )?);

    if cli.no_schematic {
        log::info!("circuit diagram disabled");
    } else {
        if !SCHEMATIC_AVAILABLE {
            log::debug!("built without schematic support");
        }
        run_schematic(
            ce.title(),
            &common_emitter_schematic(&ce_params),
            &paths.common_emitter_schematic(),
        );
    }

    let diff = differential_pair(&DifferentialPairParams::default())
        .context("building differential amplifier")?;
    runs.push(run_bode(
        &engine,
        &diff,
        &sweep,
        &conditions,
        DIFFERENTIAL_PAIR_OUTPUTS,
        &paths.differential_bode(),
    )?);

    if let Some(path) = &cli.dump_json {
        write_json(path, &runs)?;
        println!("Saved {}", path.display());
    }

    Ok(())
}
