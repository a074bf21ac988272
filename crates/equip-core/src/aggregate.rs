//! Summary statistics over validated records.

use equip_model::{Aggregates, EquipmentRecord, TypeDistribution};

/// Compute count, means and type distribution in one left-to-right pass.
///
/// Empty input yields zero means and an empty distribution.
pub fn aggregate(records: &[EquipmentRecord]) -> Aggregates {
    let mut flowrate = 0.0;
    let mut pressure = 0.0;
    let mut temperature = 0.0;
    let mut type_distribution = TypeDistribution::new();

    for record in records {
        flowrate += record.flowrate();
        pressure += record.pressure();
        temperature += record.temperature();
        type_distribution.increment(record.equipment_type());
    }

    let total_count = records.len();
    let mean = |sum: f64| {
        if total_count == 0 {
            0.0
        } else {
            sum / total_count as f64
        }
    };

    Aggregates {
        total_count,
        avg_flowrate: mean(flowrate),
        avg_pressure: mean(pressure),
        avg_temperature: mean(temperature),
        type_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str, kind: &str, flow: f64, pressure: f64, temp: f64) -> EquipmentRecord {
        EquipmentRecord::new(name, kind, flow, pressure, temp).unwrap()
    }

    #[test]
    fn reference_upload() {
        let aggregates = aggregate(&[
            record("Pump-1", "Centrifugal", 120.5, 3.2, 45.0),
            record("Valve-2", "Gate", 0.0, 1.1, 20.0),
        ]);
        assert_eq!(aggregates.total_count, 2);
        assert_eq!(aggregates.avg_flowrate, 60.25);
        assert_eq!(aggregates.avg_temperature, 32.5);
        assert!((aggregates.avg_pressure - 2.15).abs() < 1e-12);
        let distribution: Vec<(&str, usize)> = aggregates
            .type_distribution
            .iter()
            .map(|entry| (entry.equipment_type.as_str(), entry.count))
            .collect();
        assert_eq!(distribution, vec![("Centrifugal", 1), ("Gate", 1)]);
    }

    #[test]
    fn empty_input_has_zero_means() {
        let aggregates = aggregate(&[]);
        assert_eq!(aggregates, Aggregates::default());
        assert_eq!(aggregates.avg_flowrate, 0.0);
        assert!(aggregates.type_distribution.is_empty());
    }

    #[test]
    fn distribution_keeps_first_seen_order() {
        let aggregates = aggregate(&[
            record("a", "Reactor", 1.0, 1.0, 1.0),
            record("b", "Pump", 1.0, 1.0, 1.0),
            record("c", "Reactor", 1.0, 1.0, 1.0),
        ]);
        let order: Vec<&str> = aggregates.type_distribution.types().collect();
        assert_eq!(order, vec!["Reactor", "Pump"]);
        assert_eq!(aggregates.type_distribution.get("Reactor"), Some(2));
    }

    fn record_strategy() -> impl Strategy<Value = EquipmentRecord> {
        (
            "[A-Za-z]{1,8}",
            prop::sample::select(vec!["Pump", "Valve", "Reactor", "Exchanger"]),
            -1.0e6..1.0e6f64,
            -1.0e3..1.0e3f64,
            -273.0..1.0e3f64,
        )
            .prop_map(|(name, kind, flow, pressure, temp)| {
                EquipmentRecord::new(name, kind, flow, pressure, temp).unwrap()
            })
    }

    proptest! {
        #[test]
        fn distribution_sums_to_total(records in prop::collection::vec(record_strategy(), 0..60)) {
            let aggregates = aggregate(&records);
            prop_assert_eq!(aggregates.total_count, records.len());
            prop_assert_eq!(aggregates.type_distribution.total(), aggregates.total_count);
        }

        #[test]
        fn aggregation_is_deterministic(records in prop::collection::vec(record_strategy(), 0..30)) {
            let first = aggregate(&records);
            let second = aggregate(&records);
            prop_assert_eq!(first.avg_flowrate.to_bits(), second.avg_flowrate.to_bits());
            prop_assert_eq!(first.avg_pressure.to_bits(), second.avg_pressure.to_bits());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn means_stay_within_bounds(records in prop::collection::vec(record_strategy(), 1..30)) {
            let aggregates = aggregate(&records);
            let min = records.iter().map(EquipmentRecord::flowrate).fold(f64::INFINITY, f64::min);
            let max = records.iter().map(EquipmentRecord::flowrate).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(aggregates.avg_flowrate >= min - 1e-6);
            prop_assert!(aggregates.avg_flowrate <= max + 1e-6);
        }
    }
}
