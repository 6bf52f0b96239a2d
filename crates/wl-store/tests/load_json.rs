use wl_store::{StoreError, Tier, ValidationError, load_json, save_json};

const DATASET: &str = r#"{
  "months": ["Jan-25", "Feb-25"],
  "records": [
    {
      "id": "4300001",
      "label": "Main Bulk (NAMA)",
      "zone": "Main Bulk",
      "meter_type": "Main BULK",
      "tier": "L1",
      "monthly_consumption": { "Jan-25": 1000.0, "Feb-25": 1100.0 }
    },
    {
      "id": "4300002",
      "label": "ZONE 3A (Bulk Zone 3A)",
      "account_number": "4300343",
      "zone": "Zone_03_(A)",
      "meter_type": "Zone Bulk",
      "parent_label": "Main Bulk (NAMA)",
      "tier": "L2",
      "monthly_consumption": { "Jan-25": 600.0 }
    },
    {
      "id": "4300003",
      "label": "Z3-42 (Villa)",
      "zone": "Zone_03_(A)",
      "meter_type": "Residential (Villa)",
      "parent_label": "ZONE 3A (Bulk Zone 3A)",
      "tier": "L3",
      "monthly_consumption": {}
    }
  ]
}"#;

#[test]
fn load_parsed_dataset() {
    let path = std::env::temp_dir().join("wl_store_load_parsed_dataset.json");
    std::fs::write(&path, DATASET).unwrap();

    let store = load_json(&path).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.months(), ["Jan-25", "Feb-25"]);

    let zone = store.find("ZONE 3A (Bulk Zone 3A)").unwrap();
    assert_eq!(zone.tier, Tier::L2);
    assert_eq!(zone.consumption("Feb-25"), 0.0);

    let villa = store.find("Z3-42 (Villa)").unwrap();
    assert_eq!(villa.account_number, "");
    assert_eq!(villa.total_consumption(), 0.0);
}

#[test]
fn save_then_load_keeps_records() {
    let path = std::env::temp_dir().join("wl_store_save_then_load.json");
    std::fs::write(&path, DATASET).unwrap();
    let store = load_json(&path).unwrap();

    let out = std::env::temp_dir().join("wl_store_save_then_load_out.json");
    save_json(&out, &store).unwrap();
    let reloaded = load_json(&out).unwrap();

    assert_eq!(store.records(), reloaded.records());
    assert_eq!(store.months(), reloaded.months());
}

#[test]
fn duplicate_labels_are_rejected() {
    let dataset = r#"{
      "months": ["Jan-25"],
      "records": [
        { "id": "1", "label": "Meter", "tier": "L3" },
        { "id": "2", "label": "Meter ", "tier": "L3" }
      ]
    }"#;
    let path = std::env::temp_dir().join("wl_store_duplicate_labels.json");
    std::fs::write(&path, dataset).unwrap();

    let err = load_json(&path).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn tier_tags_load_in_any_case() {
    let dataset = r#"{
      "months": ["Jan-25"],
      "records": [
        { "id": "1", "label": "Main", "tier": "l1" },
        { "id": "2", "label": "Zone", "parent_label": "Main", "tier": "l2" },
        { "id": "3", "label": "Hotel", "parent_label": "Main", "tier": "dc" },
        { "id": "4", "label": "Spare", "tier": "spare" }
      ]
    }"#;
    let path = std::env::temp_dir().join("wl_store_tier_tags_any_case.json");
    std::fs::write(&path, dataset).unwrap();

    let store = load_json(&path).unwrap();
    assert_eq!(store.main_source().map(|r| r.label.as_str()), Some("Main"));
    assert_eq!(store.find("Zone").unwrap().tier, Tier::L2);
    assert_eq!(store.by_tier(Tier::DC).count(), 1);
    assert_eq!(store.find("Spare").unwrap().tier, Tier::Unclassified);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("wl_store_does_not_exist.json");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(load_json(&path), Err(StoreError::Io(_))));
}
