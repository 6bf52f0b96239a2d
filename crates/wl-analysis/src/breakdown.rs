//! Consumption grouped by meter type and by tier.

use serde::Serialize;
use wl_core::{Real, percent_of};
use wl_store::{MeterRecord, MeterStore, MonthWindow, Tier};

use crate::config::AnalysisConfig;
use crate::stage::{main_source_total, sum};

/// One group's share of a total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionShare {
    pub key: String,
    pub consumption: Real,
    pub percent: Real,
    pub meter_count: usize,
}

const UNSPECIFIED_TYPE: &str = "Unspecified";

/// End-user consumption per meter type, largest first.
///
/// End users are the same meters the stage engine counts: apartments,
/// individually billed L3 meters and direct connections. Shares are of their
/// combined consumption over the window.
pub fn consumption_by_type(
    store: &MeterStore,
    window: &MonthWindow,
    config: &AnalysisConfig,
) -> Vec<ConsumptionShare> {
    let end_users = store.records().iter().filter(|r| match r.tier {
        Tier::L4 | Tier::DC => true,
        Tier::L3 => config.is_end_user_type(&r.meter_type),
        _ => false,
    });

    let mut shares = group(end_users, window, |r| {
        let t = r.meter_type.trim();
        let key = if t.is_empty() { UNSPECIFIED_TYPE } else { t };
        key.to_string()
    });
    let total = sum(shares.iter().map(|s| s.consumption));
    for share in &mut shares {
        share.percent = percent_of(share.consumption, total);
    }
    shares.sort_by(|a, b| b.consumption.total_cmp(&a.consumption));
    shares
}

/// Consumption per tier tag in hierarchy order, as a share of the main source.
///
/// Tiers nest, so the shares do not add up to 100.
pub fn consumption_by_tier(store: &MeterStore, window: &MonthWindow) -> Vec<ConsumptionShare> {
    let main = sum(window.months().iter().map(|m| main_source_total(store, m)));

    let mut shares = group(store.records().iter(), window, |r| r.tier.as_str().to_string());
    shares.sort_by_key(|s| tier_rank(&s.key));
    for share in &mut shares {
        share.percent = percent_of(share.consumption, main);
    }
    shares
}

fn tier_rank(key: &str) -> usize {
    [Tier::L1, Tier::L2, Tier::L3, Tier::L4, Tier::DC, Tier::Unclassified]
        .iter()
        .position(|t| t.as_str() == key)
        .unwrap_or(usize::MAX)
}

/// First-seen grouping; percentages are left at zero for the caller.
fn group<'a, I, F>(records: I, window: &MonthWindow, key_of: F) -> Vec<ConsumptionShare>
where
    I: Iterator<Item = &'a MeterRecord>,
    F: Fn(&MeterRecord) -> String,
{
    let mut shares: Vec<ConsumptionShare> = Vec::new();
    for record in records {
        let key = key_of(record);
        let consumption = record.consumption_over(window.months());
        match shares.iter_mut().find(|s| s.key == key) {
            Some(share) => {
                share.consumption += consumption;
                share.meter_count += 1;
            }
            None => shares.push(ConsumptionShare {
                key,
                consumption,
                percent: 0.0,
                meter_count: 1,
            }),
        }
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::network;

    #[test]
    fn end_user_types_in_january() {
        let store = network();
        let window = store.window("Jan-25", "Jan-25").unwrap();
        let shares = consumption_by_type(&store, &window, &AnalysisConfig::default());

        let keys: Vec<_> = shares.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "Retail",
                "Residential (Apartment)",
                "IRR_Servies",
                "Residential (Villa)",
                "D_Building_Common",
            ]
        );
        assert_eq!(shares[0].consumption, 250.0);
        assert_eq!(shares[0].meter_count, 3);
        assert_eq!(shares[1].consumption, 170.0);

        let total: Real = shares.iter().map(|s| s.consumption).sum();
        assert_eq!(total, 720.0);
        let pct: Real = shares.iter().map(|s| s.percent).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn building_bulk_is_not_an_end_user() {
        let store = network();
        let shares = consumption_by_type(&store, &store.full_window(), &AnalysisConfig::default());
        assert!(shares.iter().all(|s| s.key != "D_Building_Bulk"));
    }

    #[test]
    fn tiers_in_hierarchy_order() {
        let store = network();
        let window = store.window("Jan-25", "Jan-25").unwrap();
        let shares = consumption_by_tier(&store, &window);

        let keys: Vec<_> = shares.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["L1", "L2", "L3", "L4", "DC"]);
        assert_eq!(shares[0].percent, 100.0);
        assert_eq!(shares[1].consumption, 900.0);
        assert_eq!(shares[1].percent, 90.0);
        assert_eq!(shares[2].consumption, 650.0);
        assert_eq!(shares[4].meter_count, 2);
    }

    #[test]
    fn empty_window_gives_zero_shares() {
        let store = network();
        let shares = consumption_by_tier(&store, &MonthWindow::empty());
        assert!(shares.iter().all(|s| s.consumption == 0.0 && s.percent == 0.0));
        assert!(!serde_json::to_string(&shares).unwrap().contains("-0.0"));
    }
}
