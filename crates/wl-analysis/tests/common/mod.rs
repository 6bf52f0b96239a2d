//! Store builders shared by the wl-analysis integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use wl_store::{MeterRecord, MeterStore, Tier};

pub const MONTHS: [&str; 6] = ["Jan-25", "Feb-25", "Mar-25", "Apr-25", "May-25", "Jun-25"];

const L3_TYPES: [&str; 5] = [
    "Residential (Villa)",
    "Retail",
    "D_Building_Bulk",
    "IRR_Servies",
    "",
];

pub fn meter(
    label: &str,
    zone: &str,
    meter_type: &str,
    parent: &str,
    tier: Tier,
    readings: &[f64],
) -> MeterRecord {
    MeterRecord {
        id: label.to_string(),
        label: label.to_string(),
        account_number: String::new(),
        zone: zone.to_string(),
        meter_type: meter_type.to_string(),
        parent_label: parent.to_string(),
        tier,
        monthly_consumption: MONTHS
            .iter()
            .zip(readings)
            .map(|(m, v)| (m.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn store(records: Vec<MeterRecord>) -> MeterStore {
    MeterStore::new(records, MONTHS.iter().map(|m| m.to_string()).collect()).unwrap()
}

fn readings(max: u32) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0..max).prop_map(f64::from), MONTHS.len())
}

type Building = (usize, Vec<f64>, Vec<Vec<f64>>);
type Zone = (Vec<f64>, Vec<Building>);

/// Random tagged networks: one main source, a few zones with L3 meters
/// (some of them buildings with L4 units) and a few direct connections.
/// Zero readings are frequent enough to exercise every zero guard.
pub fn arb_network() -> impl Strategy<Value = MeterStore> {
    let building = (0..L3_TYPES.len(), readings(800), prop::collection::vec(readings(300), 0..3));
    let zone = (readings(2000), prop::collection::vec(building, 0..4));
    (
        readings(5000),
        prop::collection::vec(zone, 0..4),
        prop::collection::vec(readings(500), 0..3),
    )
        .prop_map(|(main, zones, dcs): (Vec<f64>, Vec<Zone>, Vec<Vec<f64>>)| {
            let mut records = vec![meter("Main", "", "Main BULK", "", Tier::L1, &main)];
            for (z, (bulk, l3s)) in zones.iter().enumerate() {
                let zone = format!("Zone_{z:02}");
                let bulk_label = format!("{zone} Bulk");
                records.push(meter(&bulk_label, &zone, "Zone Bulk", "Main", Tier::L2, bulk));
                for (b, (kind, reading, units)) in l3s.iter().enumerate() {
                    let label = format!("{zone}-B{b}");
                    records.push(meter(&label, &zone, L3_TYPES[*kind], &bulk_label, Tier::L3, reading));
                    for (u, unit) in units.iter().enumerate() {
                        records.push(meter(
                            &format!("{label}-U{u}"),
                            &zone,
                            "Residential (Apartment)",
                            &label,
                            Tier::L4,
                            unit,
                        ));
                    }
                }
            }
            for (d, reading) in dcs.iter().enumerate() {
                records.push(meter(&format!("DC{d}"), "Direct Connection", "Retail", "Main", Tier::DC, reading));
            }
            store(records)
        })
}
