//! Engineering units and SI prefix handling.

/// Format a value for a SPICE card, using the SPICE spelling of SI prefixes.
///
/// SPICE reads `M` as milli, so mega is written `Meg`. Trailing zeros are
/// dropped so the netlist stays readable (`4.7k`, `100Meg`, `12`).
pub fn format_value(value: f64) -> String {
    let abs_value = value.abs();

    let (scaled, suffix) = if abs_value >= 1e12 {
        (value / 1e12, "T")
    } else if abs_value >= 1e9 {
        (value / 1e9, "G")
    } else if abs_value >= 1e6 {
        (value / 1e6, "Meg")
    } else if abs_value >= 1e3 {
        (value / 1e3, "k")
    } else if abs_value >= 1.0 || abs_value == 0.0 {
        (value, "")
    } else if abs_value >= 1e-3 {
        (value * 1e3, "m")
    } else if abs_value >= 1e-6 {
        (value * 1e6, "u")
    } else if abs_value >= 1e-9 {
        (value * 1e9, "n")
    } else if abs_value >= 1e-12 {
        (value * 1e12, "p")
    } else if abs_value >= 1e-15 {
        (value * 1e15, "f")
    } else {
        return format!("{:e}", value);
    };

    format!("{}{}", trim_number(scaled), suffix)
}

/// Format a resistance for a human-facing label, e.g. `4.7kΩ`.
pub fn format_ohms(value: f64) -> String {
    let spice = format_value(value);
    match spice.strip_suffix("Meg") {
        Some(mantissa) => format!("{mantissa}MΩ"),
        None => format!("{spice}Ω"),
    }
}

fn trim_number(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
