//! Runs the `ampsweep` binary.

use std::process::Command;

fn ampsweep() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ampsweep"))
}

#[test]
fn test_help_lists_flags() {
    let output = ampsweep().arg("--help").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--out-dir",
        "--format",
        "--ngspice",
        "--timeout",
        "--no-schematic",
        "--dump-json",
    ] {
        assert!(text.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn test_missing_engine_fails_after_printing_netlist() {
    let dir = tempfile::tempdir().unwrap();
    let output = ampsweep()
        .arg("--out-dir")
        .arg(dir.path())
        .arg("--ngspice")
        .arg("ampsweep-no-such-ngspice")
        .env_remove("AMPSWEEP_NGSPICE")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Simulating Common-Emitter Amplifier..."));
    assert!(stdout.contains(".title Common-Emitter Amplifier"));
    assert!(stdout.contains("Q1 collector base emitter 2N3904"));
    assert!(!stdout.contains("Simulating Differential Amplifier..."));
    assert!(!dir.path().join("common_emitter_bode.svg").exists());
}

#[test]
fn test_engine_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let output = ampsweep()
        .arg("--out-dir")
        .arg(dir.path())
        .env("AMPSWEEP_NGSPICE", "ampsweep-no-such-ngspice")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ampsweep-no-such-ngspice"), "stderr: {stderr}");
}

#[test]
fn test_unknown_format_rejected() {
    let output = ampsweep().args(["--format", "gif"]).output().unwrap();
    assert!(!output.status.success());
}

/// Shell stand-in for ngspice that writes an AC rawfile reporting `nodes`
/// to the `-r` path.
#[cfg(unix)]
fn fake_ngspice(dir: &std::path::Path, nodes: &[&str]) -> std::path::PathBuf {
    use std::fmt::Write as _;
    use std::os::unix::fs::PermissionsExt;

    let mut raw = String::new();
    writeln!(raw, "Title: fake").unwrap();
    writeln!(raw, "Plotname: AC Analysis").unwrap();
    writeln!(raw, "Flags: complex").unwrap();
    writeln!(raw, "No. Variables: {}", nodes.len() + 1).unwrap();
    writeln!(raw, "No. Points: 2").unwrap();
    writeln!(raw, "Variables:").unwrap();
    writeln!(raw, "\t0\tfrequency\tfrequency\tgrid=3").unwrap();
    for (i, node) in nodes.iter().enumerate() {
        writeln!(raw, "\t{}\tv({node})\tvoltage", i + 1).unwrap();
    }
    writeln!(raw, "Values:").unwrap();
    for (point, f) in [10.0, 1e8].iter().enumerate() {
        writeln!(raw, " {point}\t{f:e},0.0e0").unwrap();
        for _ in nodes {
            writeln!(raw, "\t-4.0e0,0.0e0").unwrap();
        }
    }

    let script = format!(
        r#"#!/bin/sh
raw=""
while [ $# -gt 0 ]; do
  case "$1" in
    -r) raw="$2"; shift 2 ;;
    *) shift ;;
  esac
done
cat > "$raw" <<'RAW'
{raw}RAW
"#
    );
    let path = dir.join("fake-ngspice");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
#[ignore = "requires system fonts"]
fn test_failed_schematic_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir_all(out.join("common_emitter_schematic.svg")).unwrap();

    let output = ampsweep()
        .arg("--out-dir")
        .arg(&out)
        .arg("--ngspice")
        .arg(fake_ngspice(
            dir.path(),
            &["collector", "collector1", "collector2"],
        ))
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("Drawing Common-Emitter Amplifier circuit diagram (if available)..."));
    assert!(stdout.contains("Simulating Differential Amplifier..."));
    assert!(out.join("common_emitter_bode.svg").is_file());
    assert!(out.join("differential_bode.svg").is_file());
}

#[cfg(unix)]
#[test]
#[ignore = "requires system fonts"]
fn test_warnings_are_plain_text_on_a_pipe() {
    let dir = tempfile::tempdir().unwrap();
    let output = ampsweep()
        .arg("--out-dir")
        .arg(dir.path())
        .arg("--ngspice")
        .arg(fake_ngspice(dir.path(), &["collector", "collector1"]))
        .arg("--no-schematic")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let warning = stdout
        .lines()
        .find(|l| l.contains("Node 'collector2' not found; using zeros."))
        .unwrap_or_else(|| panic!("no warning in stdout: {stdout}"));
    assert!(!warning.contains('\u{1b}'), "{warning:?}");
    assert!(warning.trim_start().starts_with("WARN"), "{warning:?}");
}
