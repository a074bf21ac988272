//! Tests for equip-model types.

use chrono::{TimeZone, Utc};

use equip_model::{
    Aggregates, Dataset, DatasetId, EquipmentRecord, HistoryScope, ModelError, TypeDistribution,
    UserId,
};

fn record(name: &str, kind: &str, flowrate: f64) -> EquipmentRecord {
    EquipmentRecord::new(name, kind, flowrate, 1.0, 20.0).expect("valid record")
}

#[test]
fn type_distribution_serializes_in_first_seen_order() {
    let mut distribution = TypeDistribution::new();
    distribution.increment("Pump");
    distribution.increment("Compressor");
    distribution.increment("Pump");
    distribution.increment("Agitator");

    let json = serde_json::to_string(&distribution).expect("serialize distribution");
    assert_eq!(json, r#"{"Pump":2,"Compressor":1,"Agitator":1}"#);

    let round: TypeDistribution = serde_json::from_str(&json).expect("deserialize distribution");
    assert_eq!(round, distribution);
}

#[test]
fn history_scope_display() {
    let alice = UserId::new("alice").unwrap();
    assert_eq!(HistoryScope::user(alice).to_string(), "user:alice");
    assert_eq!(HistoryScope::Anonymous.to_string(), "anonymous");
}

#[test]
fn history_scope_serializes_with_kind_tag() {
    let scope = HistoryScope::user(UserId::new("bob").unwrap());
    let json = serde_json::to_string(&scope).unwrap();
    assert_eq!(json, r#"{"kind":"user","user_id":"bob"}"#);
    let anonymous = serde_json::to_string(&HistoryScope::Anonymous).unwrap();
    assert_eq!(anonymous, r#"{"kind":"anonymous"}"#);
    let round: HistoryScope = serde_json::from_str(&anonymous).unwrap();
    assert!(round.is_anonymous());
}

#[test]
fn user_id_rejects_blank() {
    assert!(matches!(
        UserId::new("  "),
        Err(ModelError::InvalidUserId(_))
    ));
    assert_eq!(UserId::new(" carol ").unwrap().as_str(), "carol");
}

#[test]
fn dataset_id_parses_display_form() {
    let id = DatasetId::generate();
    let parsed: DatasetId = id.to_string().parse().expect("parse id");
    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<DatasetId>().is_err());
}

#[test]
fn summary_drops_records_but_counts_them() {
    let mut distribution = TypeDistribution::new();
    distribution.increment("Pump");
    distribution.increment("Pump");
    let dataset = Dataset {
        id: DatasetId::generate(),
        filename: "plant.csv".to_string(),
        uploaded_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        owner_scope: HistoryScope::Anonymous,
        records: vec![record("P-1", "Pump", 10.0), record("P-2", "Pump", 20.0)],
        aggregates: Aggregates {
            total_count: 2,
            avg_flowrate: 15.0,
            avg_pressure: 1.0,
            avg_temperature: 20.0,
            type_distribution: distribution,
        },
    };

    let summary = dataset.summary();
    assert_eq!(summary.id, dataset.id);
    assert_eq!(summary.records_count, 2);
    assert_eq!(summary.aggregates.total_count, 2);

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("records").is_none());
}

#[test]
fn record_deserialization_revalidates() {
    let bad = r#"{"equipment_name":"","equipment_type":"Pump","flowrate":1.0,"pressure":1.0,"temperature":1.0}"#;
    assert!(serde_json::from_str::<EquipmentRecord>(bad).is_err());

    let good = r#"{"equipment_name":"P-1","equipment_type":"Pump","flowrate":1.5,"pressure":2.0,"temperature":3.0}"#;
    let parsed: EquipmentRecord = serde_json::from_str(good).unwrap();
    assert_eq!(parsed.flowrate(), 1.5);
}
