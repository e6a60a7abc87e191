//! Device models shared by transistor instances.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::units::format_value;

/// Kind of device a model card describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Npn,
    Pnp,
}

impl DeviceKind {
    /// SPICE spelling of the model type.
    pub fn as_spice(self) -> &'static str {
        match self {
            DeviceKind::Npn => "NPN",
            DeviceKind::Pnp => "PNP",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

/// A named parameter set (`.model` card).
///
/// Parameters keep their insertion order so the rendered card is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceModel {
    name: String,
    kind: DeviceKind,
    params: IndexMap<String, f64>,
}

impl DeviceModel {
    pub fn new(name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: IndexMap::new(),
        }
    }

    /// NPN model with no parameters set.
    pub fn npn(name: impl Into<String>) -> Self {
        Self::new(name, DeviceKind::Npn)
    }

    /// Set a parameter, replacing any previous value of the same name.
    ///
    /// Parameter names are case-insensitive in SPICE; they are stored
    /// upper-cased.
    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_uppercase(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(&name.to_uppercase()).copied()
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, f64)> {
        self.params.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The stock small-signal NPN used by both amplifiers (2N3904, BF=100).
    pub fn npn_2n3904() -> Self {
        Self::npn("2N3904").with_param("BF", 100.0)
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".model {} {}", self.name, self.kind)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, format_value(*v)))
                .collect();
            write!(f, " ({})", params.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_card() {
        let model = DeviceModel::npn_2n3904();
        assert_eq!(model.to_string(), ".model 2N3904 NPN (BF=100)");
        assert_eq!(model.param("bf"), Some(100.0));
    }

    #[test]
    fn test_npn_starts_empty() {
        let model = DeviceModel::npn("QN");
        assert_eq!(model.kind(), DeviceKind::Npn);
        assert_eq!(model.params().count(), 0);
    }

    #[test]
    fn test_param_override() {
        let model = DeviceModel::npn("Q").with_param("bf", 50.0).with_param("BF", 200.0);
        assert_eq!(model.params().count(), 1);
        assert_eq!(model.param("BF"), Some(200.0));
    }

    #[test]
    fn test_model_without_params() {
        let model = DeviceModel::new("QP", DeviceKind::Pnp);
        assert_eq!(model.to_string(), ".model QP PNP");
    }
}
