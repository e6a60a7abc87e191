//! Parser for ngspice rawfile format.
//!
//! ngspice writes simulation data as a "rawfile", either ASCII or binary.
//! Both start with a text header:
//! - Title: simulation title
//! - Plotname: type of analysis
//! - Flags: real or complex
//! - No. Variables: number of data columns
//! - No. Points: number of data rows
//! - Variables: list of variable names and types
//! - Values: (ASCII) or Binary: (binary) marker before data
//!
//! Binary data is little-endian f64, one value (or re/im pair for complex
//! plots) per variable per point. Only the first plot in a file is read.

use crate::error::{Error, Result};
use crate::types::{RawVariable, RawfileData, RawfileHeader};

/// Parse a rawfile from bytes.
pub fn parse_rawfile(data: &[u8]) -> Result<RawfileData> {
    let text = String::from_utf8_lossy(data);
    let header = parse_header(&text)?;

    let parsed = if header.is_binary {
        parse_binary_data(data, &header)?
    } else {
        parse_ascii_data(&text, &header)?
    };

    if parsed.num_points() < header.num_points {
        log::warn!(
            "rawfile declares {} points but only {} were read",
            header.num_points,
            parsed.num_points()
        );
    }
    Ok(parsed)
}

/// Parse the header section of the rawfile.
fn parse_header(data: &str) -> Result<RawfileHeader> {
    let mut title = String::new();
    let mut plotname = String::new();
    let mut flags = String::new();
    let mut num_variables = None;
    let mut num_points = 0usize;
    let mut variables = Vec::new();
    let mut is_binary = None;
    let mut in_variables = false;

    for line in data.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("Title:") {
            title = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Plotname:") {
            plotname = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("Flags:") {
            flags = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("No. Variables:") {
            let val = rest.trim();
            num_variables = Some(val.parse().map_err(|_| {
                Error::RawfileParseError(format!("invalid No. Variables: {}", val))
            })?);
        } else if let Some(rest) = line.strip_prefix("No. Points:") {
            let val = rest.trim();
            num_points = val
                .parse()
                .map_err(|_| Error::RawfileParseError(format!("invalid No. Points: {}", val)))?;
        } else if line.starts_with("Variables:") {
            in_variables = true;
        } else if line.starts_with("Values:") || line.starts_with("Binary:") {
            is_binary = Some(line.starts_with("Binary:"));
            break;
        } else if in_variables && !line.is_empty() {
            // "index name type [attributes...]"
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                let index: usize = parts[0].parse().map_err(|_| {
                    Error::RawfileParseError(format!("invalid variable index: {}", parts[0]))
                })?;
                variables.push(RawVariable {
                    index,
                    name: parts[1].to_string(),
                    var_type: parts[2].to_string(),
                });
            }
        }
    }

    let num_variables = num_variables
        .ok_or_else(|| Error::RawfileParseError("missing No. Variables".to_string()))?;
    let is_binary = is_binary
        .ok_or_else(|| Error::RawfileParseError("Values:/Binary: marker not found".to_string()))?;

    if variables.len() != num_variables {
        return Err(Error::RawfileParseError(format!(
            "header declares {} variables but lists {}",
            num_variables,
            variables.len()
        )));
    }
    if let Some(var) = variables.iter().find(|v| v.index >= num_variables) {
        return Err(Error::RawfileParseError(format!(
            "variable {} has out-of-range index {}",
            var.name, var.index
        )));
    }

    let is_complex = flags.to_lowercase().contains("complex");

    Ok(RawfileHeader {
        title,
        plotname,
        flags,
        num_variables,
        num_points,
        variables,
        is_complex,
        is_binary,
    })
}

/// Parse ASCII format data section.
fn parse_ascii_data(data: &str, header: &RawfileHeader) -> Result<RawfileData> {
    let values_start = data
        .find("Values:")
        .ok_or_else(|| Error::RawfileParseError("Values: marker not found".to_string()))?;
    let data_section = &data[values_start + "Values:".len()..];

    let mut real_data: Vec<Vec<f64>> = Vec::with_capacity(header.num_points);
    let mut imag_data: Vec<Vec<f64>> = Vec::new();

    // Each point is a block: "<index>\t<first value>" then one value per line.
    let mut point_real: Vec<f64> = Vec::with_capacity(header.num_variables);
    let mut point_imag: Vec<f64> = Vec::with_capacity(header.num_variables);
    let mut expecting_index = true;

    for line in data_section.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // A second plot follows; only the first is read.
        if line.starts_with("Title:") || line.starts_with("Plotname:") {
            break;
        }

        let value_str = if expecting_index {
            let mut parts = line.split_whitespace();
            let index = parts.next().unwrap_or_default();
            if index.parse::<usize>().is_err() {
                return Err(Error::RawfileParseError(format!(
                    "expected point index, found {:?}",
                    index
                )));
            }
            expecting_index = false;
            match parts.next() {
                Some(v) => v,
                None => continue,
            }
        } else {
            line
        };

        let (re, im) = parse_complex_value(value_str).ok_or_else(|| {
            Error::RawfileParseError(format!("invalid value: {:?}", value_str))
        })?;
        point_real.push(re);
        point_imag.push(im);

        if point_real.len() == header.num_variables {
            real_data.push(std::mem::take(&mut point_real));
            let imag_row = std::mem::take(&mut point_imag);
            if header.is_complex {
                imag_data.push(imag_row);
            }
            expecting_index = true;
        }
    }

    Ok(RawfileData {
        header: header.clone(),
        real_data,
        imag_data: header.is_complex.then_some(imag_data),
    })
}

/// Parse a value in ngspice format: "real,imag", "real, imag" or "real".
fn parse_complex_value(s: &str) -> Option<(f64, f64)> {
    let s = s.trim();
    match s.split_once(',') {
        Some((re, im)) => Some((re.trim().parse().ok()?, im.trim().parse().ok()?)),
        None => Some((s.parse().ok()?, 0.0)),
    }
}

/// Parse binary format data section.
fn parse_binary_data(data: &[u8], header: &RawfileHeader) -> Result<RawfileData> {
    let marker = b"Binary:";
    let marker_pos = find_bytes(data, marker)
        .ok_or_else(|| Error::RawfileParseError("Binary: marker not found".to_string()))?;

    // Data starts after the marker's line ending (\n or \r\n).
    let mut binary_start = marker_pos + marker.len();
    if data.get(binary_start) == Some(&b'\r') {
        binary_start += 1;
    }
    if data.get(binary_start) == Some(&b'\n') {
        binary_start += 1;
    }
    let binary_data = &data[binary_start..];

    let bytes_per_value = if header.is_complex { 16 } else { 8 };
    let bytes_per_point = header.num_variables * bytes_per_value;
    if bytes_per_point == 0 {
        return Err(Error::RawfileParseError("rawfile has no variables".to_string()));
    }

    let available = binary_data.len() / bytes_per_point;
    let points = header.num_points.min(available);

    let mut real_data: Vec<Vec<f64>> = Vec::with_capacity(points);
    let mut imag_data: Vec<Vec<f64>> = Vec::new();

    for chunk in binary_data.chunks_exact(bytes_per_point).take(points) {
        let mut point_real = Vec::with_capacity(header.num_variables);
        let mut point_imag = Vec::with_capacity(header.num_variables);

        for value in chunk.chunks_exact(bytes_per_value) {
            point_real.push(read_f64_le(&value[..8]));
            if header.is_complex {
                point_imag.push(read_f64_le(&value[8..16]));
            }
        }

        real_data.push(point_real);
        if header.is_complex {
            imag_data.push(point_imag);
        }
    }

    Ok(RawfileData {
        header: header.clone(),
        real_data,
        imag_data: header.is_complex.then_some(imag_data),
    })
}

/// Read a little-endian f64 from bytes.
fn read_f64_le(data: &[u8]) -> f64 {
    let bytes: [u8; 8] = data
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .unwrap_or([0; 8]);
    f64::from_le_bytes(bytes)
}

/// Find a byte sequence in a slice.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
