//! Types for ngspice rawfile contents.

use std::fmt;

use num_complex::Complex64;

/// Analysis type parsed from the rawfile plot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    /// DC operating point.
    DcOp,
    /// DC sweep.
    DcSweep,
    /// AC analysis.
    Ac,
    /// Transient analysis.
    Transient,
    /// Anything else ngspice may write.
    Other,
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisType::DcOp => "operating point",
            AnalysisType::DcSweep => "dc sweep",
            AnalysisType::Ac => "ac analysis",
            AnalysisType::Transient => "transient",
            AnalysisType::Other => "other",
        };
        f.write_str(name)
    }
}

/// A variable in the rawfile (column in the data).
#[derive(Debug, Clone, PartialEq)]
pub struct RawVariable {
    /// Variable index (0-based).
    pub index: usize,
    /// Variable name (e.g., "v(collector)", "i(v1)").
    pub name: String,
    /// Variable type (e.g., "voltage", "current", "frequency").
    pub var_type: String,
}

/// Parsed rawfile header information.
#[derive(Debug, Clone, PartialEq)]
pub struct RawfileHeader {
    pub title: String,
    /// Plot name (e.g., "AC Analysis").
    pub plotname: String,
    /// Flags (e.g., "real", "complex").
    pub flags: String,
    pub num_variables: usize,
    pub num_points: usize,
    pub variables: Vec<RawVariable>,
    /// Whether data is complex (AC analysis).
    pub is_complex: bool,
    /// Whether data is binary format.
    pub is_binary: bool,
}

/// Result of parsing a rawfile.
#[derive(Debug, Clone, PartialEq)]
pub struct RawfileData {
    pub header: RawfileHeader,
    /// Real parts, `num_points` rows of `num_variables` values.
    pub real_data: Vec<Vec<f64>>,
    /// Imaginary parts, same shape; only present for complex data.
    pub imag_data: Option<Vec<Vec<f64>>>,
}

impl RawfileData {
    /// Get the analysis type from the plotname.
    pub fn analysis_type(&self) -> AnalysisType {
        let plotname = self.header.plotname.to_lowercase();
        if plotname.contains("operating point") {
            AnalysisType::DcOp
        } else if plotname.contains("dc transfer") || plotname.contains("dc analysis") {
            AnalysisType::DcSweep
        } else if plotname.contains("ac analysis") {
            AnalysisType::Ac
        } else if plotname.contains("transient") {
            AnalysisType::Transient
        } else {
            AnalysisType::Other
        }
    }

    /// Number of data rows actually present.
    pub fn num_points(&self) -> usize {
        self.real_data.len()
    }

    /// Find a variable by name (case-insensitive).
    pub fn find_variable(&self, name: &str) -> Option<&RawVariable> {
        self.header
            .variables
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// The sweep variable of an AC plot: the one typed `frequency`, else column 0.
    pub fn frequency_variable(&self) -> Option<&RawVariable> {
        self.header
            .variables
            .iter()
            .find(|v| v.var_type.eq_ignore_ascii_case("frequency"))
            .or_else(|| self.header.variables.first())
    }

    /// Get real values for a variable across all points.
    pub fn get_real_values(&self, var_index: usize) -> Option<Vec<f64>> {
        if var_index >= self.header.num_variables {
            return None;
        }
        self.real_data
            .iter()
            .map(|row| row.get(var_index).copied())
            .collect()
    }

    /// Get complex values for a variable across all points.
    ///
    /// Real plots yield values with a zero imaginary part.
    pub fn get_complex_values(&self, var_index: usize) -> Option<Vec<Complex64>> {
        let re = self.get_real_values(var_index)?;
        match &self.imag_data {
            Some(imag) => re
                .into_iter()
                .zip(imag.iter())
                .map(|(re, im_row)| im_row.get(var_index).map(|&im| Complex64::new(re, im)))
                .collect(),
            None => Some(re.into_iter().map(|re| Complex64::new(re, 0.0)).collect()),
        }
    }
}
