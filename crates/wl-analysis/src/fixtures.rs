//! Shared test network.
//!
//! ```text
//! Main Bulk (L1)
//! ├── Zone FM Bulk (L2, Zone_01_(FM), flat)
//! │   ├── Building FM (L3 retail)   ├── FM Common (L3)   └── FM Irrigation (L3)
//! ├── Zone 3A Bulk (L2, Zone_03_(A), building layer)
//! │   ├── D-44 Building Bulk (L3) ── D-44 Apt 1 (L4), D-44 Apt 2 (L4)
//! │   ├── Z3-10 Villa (L3)         └── Z3 Irrigation (L3)
//! ├── Hotel Main (DC)
//! └── Al Adrak Camp (DC)
//! ```

use std::collections::BTreeMap;

use wl_store::{MeterRecord, MeterStore, Tier};

pub(crate) const MONTHS: [&str; 3] = ["Jan-25", "Feb-25", "Mar-25"];

pub(crate) fn meter(
    label: &str,
    zone: &str,
    meter_type: &str,
    parent: &str,
    tier: Tier,
    readings: [f64; 3],
) -> MeterRecord {
    MeterRecord {
        id: format!("id-{label}"),
        label: label.to_string(),
        account_number: String::new(),
        zone: zone.to_string(),
        meter_type: meter_type.to_string(),
        parent_label: parent.to_string(),
        tier,
        monthly_consumption: MONTHS
            .iter()
            .zip(readings)
            .map(|(m, v)| (m.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub(crate) fn network_records() -> Vec<MeterRecord> {
    vec![
        meter("Main Bulk", "Main Bulk", "Main BULK", "", Tier::L1, [1000.0, 1100.0, 1200.0]),
        meter("Zone FM Bulk", "Zone_01_(FM)", "Zone Bulk", "Main Bulk", Tier::L2, [400.0, 420.0, 450.0]),
        meter("Building FM", "Zone_01_(FM)", "Retail", "Zone FM Bulk", Tier::L3, [150.0, 160.0, 170.0]),
        meter("FM Common", "Zone_01_(FM)", "D_Building_Common", "Zone FM Bulk", Tier::L3, [50.0, 55.0, 60.0]),
        meter("FM Irrigation", "Zone_01_(FM)", "IRR_Servies", "Zone FM Bulk", Tier::L3, [100.0, 100.0, 100.0]),
        meter("Zone 3A Bulk", "Zone_03_(A)", "Zone Bulk", "Main Bulk", Tier::L2, [500.0, 520.0, 540.0]),
        meter("D-44 Building Bulk", "Zone_03_(A)", "D_Building_Bulk", "Zone 3A Bulk", Tier::L3, [200.0, 210.0, 220.0]),
        meter("D-44 Apt 1", "Zone_03_(A)", "Residential (Apartment)", "D-44 Building Bulk", Tier::L4, [90.0, 95.0, 100.0]),
        meter("D-44 Apt 2", "Zone_03_(A)", "Residential (Apartment)", "D-44 Building Bulk", Tier::L4, [80.0, 85.0, 90.0]),
        meter("Z3-10 Villa", "Zone_03_(A)", "Residential (Villa)", "Zone 3A Bulk", Tier::L3, [120.0, 125.0, 130.0]),
        meter("Z3 Irrigation", "Zone_03_(A)", "IRR_Servies", "Zone 3A Bulk", Tier::L3, [30.0, 30.0, 30.0]),
        meter("Hotel Main", "Direct Connection", "Retail", "Main Bulk", Tier::DC, [60.0, 65.0, 70.0]),
        meter("Al Adrak Camp", "Direct Connection", "Retail", "Main Bulk", Tier::DC, [40.0, 40.0, 40.0]),
    ]
}

pub(crate) fn network() -> MeterStore {
    MeterStore::new(
        network_records(),
        MONTHS.iter().map(|m| m.to_string()).collect(),
    )
    .unwrap()
}
