//! Structural checks on the amplifier builders.
//!
//! Each topology must contain exactly its documented nodes and components,
//! and every terminal must land on a declared node or ground.

use std::collections::BTreeSet;

use ampsweep_core::{
    Circuit, CommonEmitterParams, DifferentialPairParams, GROUND, common_emitter,
    differential_pair,
};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> BTreeSet<String> {
    items.iter().map(|i| name(i).to_string()).collect()
}

fn assert_no_dangling(circuit: &Circuit) {
    for (element, node) in circuit.terminals() {
        assert!(
            node == GROUND || circuit.nodes().any(|n| n == node),
            "{element} references undeclared node {node}"
        );
    }
}

#[test]
fn test_common_emitter_structure() {
    let circuit = common_emitter(&CommonEmitterParams::default()).unwrap();

    assert_eq!(
        circuit.nodes().map(String::from).collect::<BTreeSet<_>>(),
        set(&["Vcc", "base", "collector", "emitter"])
    );
    assert_eq!(names(circuit.sources(), |v| v.name.as_str()), set(&["V1", "Vin"]));
    assert_eq!(
        names(circuit.resistors(), |r| r.name.as_str()),
        set(&["R1", "R2", "R3", "R4"])
    );
    assert_eq!(names(circuit.bjts(), |q| q.name.as_str()), set(&["Q1"]));
    assert_no_dangling(&circuit);

    // Only the base input drives the AC analysis.
    let ac_sources: Vec<_> = circuit.sources().iter().filter(|v| v.ac.is_some()).collect();
    assert_eq!(ac_sources.len(), 1);
    assert_eq!(ac_sources[0].positive, "base");

    let q1 = circuit.find_bjt("Q1").unwrap();
    assert_eq!(
        (q1.collector.as_str(), q1.base.as_str(), q1.emitter.as_str()),
        ("collector", "base", "emitter")
    );

    let r4 = circuit.find_resistor("R4").unwrap();
    assert_eq!((r4.node1.as_str(), r4.node2.as_str()), ("emitter", GROUND));
    assert_eq!(r4.resistance, 1e3);

    let vcc = circuit.find_source("V1").unwrap();
    assert_eq!(vcc.dc, 12.0);

    let model = circuit.find_model("2N3904").unwrap();
    assert_eq!(model.param("BF"), Some(100.0));
}

#[test]
fn test_differential_pair_structure() {
    let circuit = differential_pair(&DifferentialPairParams::default()).unwrap();

    assert_eq!(
        circuit.nodes().map(String::from).collect::<BTreeSet<_>>(),
        set(&["Vcc", "E", "base1", "base2", "collector1", "collector2"])
    );
    assert_eq!(names(circuit.sources(), |v| v.name.as_str()), set(&["V1"]));
    assert_eq!(
        names(circuit.resistors(), |r| r.name.as_str()),
        set(&["R1", "R2", "R3", "R4", "R5", "R6", "R7"])
    );
    assert_eq!(names(circuit.bjts(), |q| q.name.as_str()), set(&["Q1", "Q2"]));
    assert_no_dangling(&circuit);

    // Both transistors share the emitter node.
    assert!(circuit.bjts().iter().all(|q| q.emitter == "E"));

    let tail = circuit.find_resistor("R1").unwrap();
    assert_eq!((tail.node1.as_str(), tail.node2.as_str()), ("E", GROUND));

    for (load, collector) in [("R2", "collector1"), ("R3", "collector2")] {
        let r = circuit.find_resistor(load).unwrap();
        assert_eq!((r.node1.as_str(), r.node2.as_str()), ("Vcc", collector));
        assert_eq!(r.resistance, 4.7e3);
    }
}

#[test]
fn test_builders_validate() {
    common_emitter(&CommonEmitterParams::default())
        .unwrap()
        .validate()
        .unwrap();
    differential_pair(&DifferentialPairParams::default())
        .unwrap()
        .validate()
        .unwrap();
}
