//! In-memory circuit description.
//!
//! A [`Circuit`] holds declared nodes, independent voltage sources, resistors,
//! bipolar transistors and the device models those transistors point at.
//! Components refer to nodes and models by name; [`Circuit::validate`] checks
//! that every such reference resolves before the circuit is handed to a
//! simulator. The `Display` impl renders the circuit as a SPICE netlist.

use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::error::{Error, Result};
use crate::model::DeviceModel;
use crate::units::format_value;

/// Name of the ground node.
pub const GROUND: &str = "0";

/// Check whether a node name refers to ground.
pub fn is_ground(node: &str) -> bool {
    node == GROUND
}

/// Independent voltage source with an optional AC stimulus.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource {
    pub name: String,
    pub positive: String,
    pub negative: String,
    /// DC level in volts.
    pub dc: f64,
    /// AC magnitude in volts, if this source drives the small-signal analysis.
    pub ac: Option<f64>,
}

impl VoltageSource {
    /// Set the AC amplitude used during AC analysis.
    pub fn set_ac(&mut self, amplitude: f64) -> &mut Self {
        self.ac = Some(amplitude);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub name: String,
    pub node1: String,
    pub node2: String,
    /// Resistance in ohms.
    pub resistance: f64,
}

/// Bipolar junction transistor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Bjt {
    pub name: String,
    pub collector: String,
    pub base: String,
    pub emitter: String,
    /// Name of the `.model` card this instance uses.
    pub model: String,
}

/// A circuit description ready to be handed to a simulator.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    title: String,
    nodes: IndexSet<String>,
    sources: Vec<VoltageSource>,
    resistors: Vec<Resistor>,
    bjts: Vec<Bjt>,
    models: IndexMap<String, DeviceModel>,
}

impl Circuit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Declare a node. Ground is implicit and never stored.
    pub fn declare_node(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !is_ground(&name) {
            self.nodes.insert(name);
        }
        self
    }

    pub fn declare_nodes<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.declare_node(name);
        }
        self
    }

    /// Whether `name` is ground or a declared node.
    pub fn has_node(&self, name: &str) -> bool {
        is_ground(name) || self.nodes.contains(name)
    }

    /// Declared nodes, in declaration order, ground excluded.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn voltage_source(
        &mut self,
        name: impl Into<String>,
        positive: impl Into<String>,
        negative: impl Into<String>,
        dc: f64,
    ) -> &mut VoltageSource {
        self.sources.push(VoltageSource {
            name: name.into(),
            positive: positive.into(),
            negative: negative.into(),
            dc,
            ac: None,
        });
        let last = self.sources.len() - 1;
        &mut self.sources[last]
    }

    pub fn resistor(
        &mut self,
        name: impl Into<String>,
        node1: impl Into<String>,
        node2: impl Into<String>,
        resistance: f64,
    ) -> &mut Self {
        self.resistors.push(Resistor {
            name: name.into(),
            node1: node1.into(),
            node2: node2.into(),
            resistance,
        });
        self
    }

    pub fn bjt(
        &mut self,
        name: impl Into<String>,
        collector: impl Into<String>,
        base: impl Into<String>,
        emitter: impl Into<String>,
        model: impl Into<String>,
    ) -> &mut Self {
        self.bjts.push(Bjt {
            name: name.into(),
            collector: collector.into(),
            base: base.into(),
            emitter: emitter.into(),
            model: model.into(),
        });
        self
    }

    /// Register a device model. A model with the same name is replaced.
    pub fn model(&mut self, model: DeviceModel) -> &mut Self {
        self.models.insert(model.name().to_string(), model);
        self
    }

    pub fn sources(&self) -> &[VoltageSource] {
        &self.sources
    }

    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    pub fn bjts(&self) -> &[Bjt] {
        &self.bjts
    }

    pub fn models(&self) -> impl Iterator<Item = &DeviceModel> {
        self.models.values()
    }

    pub fn find_model(&self, name: &str) -> Option<&DeviceModel> {
        self.models.get(name)
    }

    pub fn find_resistor(&self, name: &str) -> Option<&Resistor> {
        self.resistors.iter().find(|r| r.name == name)
    }

    pub fn find_source(&self, name: &str) -> Option<&VoltageSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn find_bjt(&self, name: &str) -> Option<&Bjt> {
        self.bjts.iter().find(|q| q.name == name)
    }

    /// Every (element, node) terminal reference in the circuit.
    pub fn terminals(&self) -> Vec<(&str, &str)> {
        let mut terminals = Vec::new();
        for v in &self.sources {
            terminals.push((v.name.as_str(), v.positive.as_str()));
            terminals.push((v.name.as_str(), v.negative.as_str()));
        }
        for r in &self.resistors {
            terminals.push((r.name.as_str(), r.node1.as_str()));
            terminals.push((r.name.as_str(), r.node2.as_str()));
        }
        for q in &self.bjts {
            terminals.push((q.name.as_str(), q.collector.as_str()));
            terminals.push((q.name.as_str(), q.base.as_str()));
            terminals.push((q.name.as_str(), q.emitter.as_str()));
        }
        terminals
    }

    /// Check the structural invariants of the description.
    ///
    /// Fails on the first problem found: a designator without its type's
    /// SPICE prefix, a designator repeated within a type, a terminal on an
    /// undeclared node, a transistor pointing at an unregistered model, or a
    /// non-physical value.
    pub fn validate(&self) -> Result<()> {
        check_designators("voltage source", 'V', self.sources.iter().map(|v| v.name.as_str()))?;
        check_designators("resistor", 'R', self.resistors.iter().map(|r| r.name.as_str()))?;
        check_designators("transistor", 'Q', self.bjts.iter().map(|q| q.name.as_str()))?;

        for (element, node) in self.terminals() {
            if !self.has_node(node) {
                return Err(Error::DanglingNode {
                    element: element.to_string(),
                    node: node.to_string(),
                });
            }
        }

        for q in &self.bjts {
            if !self.models.contains_key(&q.model) {
                return Err(Error::UnknownModel {
                    element: q.name.clone(),
                    model: q.model.clone(),
                });
            }
        }

        for r in &self.resistors {
            if !r.resistance.is_finite() || r.resistance <= 0.0 {
                return Err(Error::InvalidValue {
                    element: r.name.clone(),
                    reason: format!("resistance must be positive, got {}", r.resistance),
                });
            }
        }

        for v in &self.sources {
            let ac_finite = v.ac.is_none_or(f64::is_finite);
            if !v.dc.is_finite() || !ac_finite {
                return Err(Error::InvalidValue {
                    element: v.name.clone(),
                    reason: "source levels must be finite".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn check_designators<'a>(
    kind: &'static str,
    prefix: char,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        let starts_ok = name
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&prefix));
        if !starts_ok {
            return Err(Error::InvalidDesignator {
                kind,
                name: name.to_string(),
                prefix,
            });
        }
        // SPICE designators are case-insensitive.
        if !seen.insert(name.to_lowercase()) {
            return Err(Error::DuplicateDesignator {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".title {}", self.title)?;
        for v in &self.sources {
            write!(
                f,
                "{} {} {} DC {}",
                v.name,
                v.positive,
                v.negative,
                format_value(v.dc)
            )?;
            if let Some(ac) = v.ac {
                write!(f, " AC {}", format_value(ac))?;
            }
            writeln!(f)?;
        }
        for r in &self.resistors {
            writeln!(
                f,
                "{} {} {} {}",
                r.name,
                r.node1,
                r.node2,
                format_value(r.resistance)
            )?;
        }
        for q in &self.bjts {
            writeln!(
                f,
                "{} {} {} {} {}",
                q.name, q.collector, q.base, q.emitter, q.model
            )?;
        }
        for model in self.models.values() {
            writeln!(f, "{}", model)?;
        }
        Ok(())
    }
}
