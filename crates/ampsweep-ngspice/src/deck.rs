//! Input deck rendering for ngspice batch runs.

use ampsweep_core::{AcSweep, Circuit, OperatingConditions};

/// Render the batch deck for an AC run: netlist, temperatures, `.ac`, `.end`.
pub fn ac_deck(circuit: &Circuit, sweep: &AcSweep, conditions: &OperatingConditions) -> String {
    let mut deck = circuit.to_string();
    deck.push_str(&format!(
        ".options temp={} tnom={}\n",
        conditions.temperature, conditions.nominal_temperature
    ));
    deck.push_str(&sweep.to_spice());
    deck.push('\n');
    deck.push_str(".end\n");
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampsweep_core::{CommonEmitterParams, common_emitter};

    #[test]
    fn test_ac_deck_layout() {
        let circuit = common_emitter(&CommonEmitterParams::default()).unwrap();
        let sweep = AcSweep::decade(100, 10.0, 100e6).unwrap();
        let deck = ac_deck(&circuit, &sweep, &OperatingConditions::default());

        let lines: Vec<&str> = deck.lines().collect();
        assert_eq!(lines[0], ".title Common-Emitter Amplifier");
        assert!(lines.contains(&"Q1 collector base emitter 2N3904"));
        assert_eq!(lines[lines.len() - 3], ".options temp=25 tnom=25");
        assert_eq!(lines[lines.len() - 2], ".ac dec 100 10 100Meg");
        assert_eq!(lines[lines.len() - 1], ".end");
    }

    #[test]
    fn test_fractional_temperature() {
        let circuit = common_emitter(&CommonEmitterParams::default()).unwrap();
        let sweep = AcSweep::decade(10, 10.0, 1e3).unwrap();
        let conditions = OperatingConditions {
            temperature: 27.5,
            nominal_temperature: 25.0,
        };
        assert!(ac_deck(&circuit, &sweep, &conditions).contains(".options temp=27.5 tnom=25\n"));
    }
}
