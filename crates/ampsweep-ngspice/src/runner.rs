//! ngspice process runner.
//!
//! This module handles invoking ngspice as a subprocess in batch mode.

use std::io::{Read, Write};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::rawfile::parse_rawfile;
use crate::types::RawfileData;

/// Configuration for the ngspice runner.
#[derive(Debug, Clone)]
pub struct NgspiceConfig {
    /// Path to ngspice executable (default: "ngspice" in PATH).
    pub executable: String,
    /// Kill ngspice after this many seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for NgspiceConfig {
    fn default() -> Self {
        Self {
            executable: "ngspice".to_string(),
            timeout_secs: None,
        }
    }
}

impl NgspiceConfig {
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Check if ngspice is available.
pub fn is_ngspice_available(config: &NgspiceConfig) -> bool {
    Command::new(&config.executable)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Get ngspice version string.
pub fn ngspice_version(config: &NgspiceConfig) -> Result<String> {
    let output = Command::new(&config.executable)
        .arg("--version")
        .output()
        .map_err(|e| Error::NgspiceNotFound(format!("{}: {}", config.executable, e)))?;

    if !output.status.success() {
        return Err(Error::NgspiceNotFound("--version failed".to_string()));
    }

    // Version banner goes to stdout; keep the first non-empty line.
    let version = String::from_utf8_lossy(&output.stdout);
    Ok(version
        .lines()
        .map(|l| l.trim_matches(|c: char| c == '*' || c.is_whitespace()))
        .find(|l| !l.is_empty())
        .unwrap_or("unknown")
        .to_string())
}

/// Run a deck through ngspice and return the raw results.
pub fn run_ngspice(deck: &str, config: &NgspiceConfig) -> Result<RawfileData> {
    let mut deck_file = NamedTempFile::new().map_err(|e| Error::TempFile(e.to_string()))?;

    let deck = if !deck.to_lowercase().contains(".end") {
        format!("{}\n.end\n", deck.trim())
    } else {
        deck.to_string()
    };

    deck_file
        .write_all(deck.as_bytes())
        .map_err(|e| Error::TempFile(e.to_string()))?;

    let raw_file = NamedTempFile::new().map_err(|e| Error::TempFile(e.to_string()))?;

    // -b: batch mode, -r: write rawfile
    let mut cmd = Command::new(&config.executable);
    cmd.arg("-b")
        .arg("-r")
        .arg(raw_file.path())
        .arg(deck_file.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    log::debug!("spawning {:?}", cmd);
    let child = cmd
        .spawn()
        .map_err(|e| Error::NgspiceNotFound(format!("{}: {}", config.executable, e)))?;

    let output = match config.timeout_secs {
        Some(secs) => wait_with_timeout(child, Duration::from_secs(secs))?,
        None => child.wait_with_output()?,
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(Error::NgspiceExecutionFailed(format!(
            "ngspice exited with {}\nstderr: {}\nstdout: {}",
            output.status, stderr, stdout
        )));
    }
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        log::debug!("ngspice: {}", line);
    }

    let raw_data = std::fs::read(raw_file.path())
        .map_err(|e| Error::RawfileParseError(format!("failed to read rawfile: {}", e)))?;

    if raw_data.is_empty() {
        return Err(Error::RawfileParseError(format!(
            "ngspice produced empty rawfile\nstderr: {}",
            stderr
        )));
    }

    parse_rawfile(&raw_data)
}

/// Wait for a child process with timeout.
///
/// The pipes are drained on background threads so a chatty ngspice cannot
/// block on a full pipe while we poll.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<Output> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);

    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::NgspiceTimeout(timeout.as_secs()));
                }
                thread::sleep(poll_interval);
            }
        }
    };

    let collect = |handle: Option<thread::JoinHandle<Vec<u8>>>| {
        handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    };

    Ok(Output {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NgspiceConfig::default();
        assert_eq!(config.executable, "ngspice");
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_config_builder() {
        let config = NgspiceConfig::default()
            .with_executable("/opt/ngspice/bin/ngspice")
            .with_timeout(30);
        assert_eq!(config.executable, "/opt/ngspice/bin/ngspice");
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_missing_executable() {
        let config = NgspiceConfig::default().with_executable("ampsweep-no-such-ngspice");
        assert!(!is_ngspice_available(&config));
        assert!(matches!(
            run_ngspice("t\n.op\n.end\n", &config),
            Err(Error::NgspiceNotFound(_))
        ));
    }

    #[test]
    #[ignore = "requires ngspice"]
    fn test_ngspice_version() {
        let config = NgspiceConfig::default();
        if is_ngspice_available(&config) {
            let version = ngspice_version(&config).unwrap();
            assert!(!version.is_empty());
        }
    }

    #[test]
    #[ignore = "requires ngspice"]
    fn test_run_simple_circuit() {
        let config = NgspiceConfig::default();
        if !is_ngspice_available(&config) {
            return;
        }

        let netlist = r#"Voltage Divider
V1 1 0 DC 10
R1 1 2 1k
R2 2 0 1k
.op
.end
"#;

        let result = run_ngspice(netlist, &config).unwrap();
        assert!(!result.real_data.is_empty());
    }
}
