//! Zone drill-down: a zone's bulk meter against the meters behind it.
//!
//! Topology is resolved in priority order:
//! 1. the direct-connection pseudo-zone, compared against the main source;
//! 2. zones with a building layer, where building bulk meters stand in for
//!    the apartments behind them;
//! 3. flat zones, where every declared meter is summed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use wl_core::{Real, percent_of};
use wl_store::{MeterRecord, MeterStore, MonthWindow, Tier};

use crate::config::AnalysisConfig;
use crate::stage::main_source_total;

/// A single month or an inclusive month range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSelector {
    Month(String),
    Range { start: String, end: String },
}

impl TimeSelector {
    pub fn month(month: impl Into<String>) -> Self {
        TimeSelector::Month(month.into())
    }

    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        TimeSelector::Range {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, TimeSelector::Range { .. })
    }

    /// The months this selector covers; empty when it does not resolve.
    pub fn resolve(&self, store: &MeterStore) -> MonthWindow {
        let window = match self {
            TimeSelector::Month(m) => MonthWindow::single(store.months(), m),
            TimeSelector::Range { start, end } => store.window(start, end),
        };
        window.unwrap_or_else(MonthWindow::empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneTopology {
    DirectConnection,
    Buildings,
    Flat,
}

/// How a meter contributes to a zone's individual total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterCategory {
    /// Building bulk meter standing in for the units behind it.
    Building,
    Villa,
    /// Any other meter declared in a building-layered zone.
    Other,
    /// A meter in a flat zone.
    Individual,
    /// A direct connection off the main source.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneMeter {
    pub label: String,
    pub meter_type: String,
    pub tier: Tier,
    pub category: MeterCategory,
    pub consumption: Real,
}

/// Bulk-vs-individual comparison for one zone and time selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneAnalysisResult {
    pub zone: String,
    pub topology: ZoneTopology,
    pub is_direct_connection: bool,
    pub has_buildings: bool,
    /// Label of the bulk meter (the main source for direct connections).
    pub bulk_meter: Option<String>,
    pub zone_bulk_consumption: Real,
    pub total_individual_consumption: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_total: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villa_total: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_total: Option<Real>,
    pub difference: Real,
    pub loss_percentage: Real,
    pub efficiency_percentage: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_bulk_usage_percent: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    /// Meters making up the individual total, in store order.
    pub meters: Vec<ZoneMeter>,
}

/// Zone listing entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone: String,
    pub topology: ZoneTopology,
    pub bulk_meter: Option<String>,
    pub meter_count: usize,
}

/// Analyse one zone. `None` when the zone key is not known to the store.
pub fn analyze_zone(
    store: &MeterStore,
    zone: &str,
    selector: &TimeSelector,
    config: &AnalysisConfig,
) -> Option<ZoneAnalysisResult> {
    let zone = zone.trim();
    let topology = resolve_topology(store, zone, config)?;
    let window = selector.resolve(store);

    let mut result = match topology {
        ZoneTopology::DirectConnection => direct_connection(store, zone, &window),
        ZoneTopology::Buildings => building_layered(store, zone, &window, config),
        ZoneTopology::Flat => flat(store, zone, &window),
    };

    if selector.is_range() {
        result.months_count = Some(window.len());
        result.date_range = Some(window.period());
    }

    tracing::debug!(
        zone,
        topology = ?result.topology,
        months = window.len(),
        bulk = result.zone_bulk_consumption,
        individual = result.total_individual_consumption,
        "zone analysed"
    );
    Some(result)
}

/// Every zone known to the store, in first-seen order.
///
/// Main-source meters do not define a zone. The direct-connection
/// pseudo-zone is listed whenever direct connections exist.
pub fn list_zones(store: &MeterStore, config: &AnalysisConfig) -> Vec<ZoneSummary> {
    let mut seen = HashSet::new();
    let mut keys: Vec<&str> = store
        .records()
        .iter()
        .filter(|r| r.tier != Tier::L1 && !r.zone.is_empty())
        .map(|r| r.zone.as_str())
        .filter(|z| seen.insert(*z))
        .collect();

    let dc_listed = keys.iter().any(|z| config.is_direct_connection_zone(z));
    if !dc_listed && store.by_tier(Tier::DC).next().is_some() {
        keys.push(config.direct_connection_zone.as_str());
    }

    keys.into_iter()
        .filter_map(|zone| {
            let topology = resolve_topology(store, zone, config)?;
            let (bulk_meter, meter_count) = match topology {
                ZoneTopology::DirectConnection => (
                    store.main_source().map(|r| r.label.clone()),
                    store.by_tier(Tier::DC).count(),
                ),
                _ => (
                    zone_bulk_meters(store, zone).next().map(|r| r.label.clone()),
                    zone_members(store, zone).filter(|r| r.tier != Tier::L2).count(),
                ),
            };
            Some(ZoneSummary {
                zone: zone.to_string(),
                topology,
                bulk_meter,
                meter_count,
            })
        })
        .collect()
}

fn resolve_topology(store: &MeterStore, zone: &str, config: &AnalysisConfig) -> Option<ZoneTopology> {
    if config.is_direct_connection_zone(zone) {
        let known = store.by_tier(Tier::DC).next().is_some() || zone_members(store, zone).next().is_some();
        return known.then_some(ZoneTopology::DirectConnection);
    }

    zone_members(store, zone).next()?;

    let layered = config.is_building_zone(zone)
        || zone_members(store, zone).any(|r| r.tier != Tier::L2 && is_building_bulk(store, r, config));
    Some(if layered {
        ZoneTopology::Buildings
    } else {
        ZoneTopology::Flat
    })
}

/// Meters declared in the zone. The main source never belongs to a zone.
fn zone_members<'a>(store: &'a MeterStore, zone: &'a str) -> impl Iterator<Item = &'a MeterRecord> + 'a {
    store.in_zone(zone).filter(|r| r.tier != Tier::L1)
}

fn zone_bulk_meters<'a>(store: &'a MeterStore, zone: &'a str) -> impl Iterator<Item = &'a MeterRecord> + 'a {
    store.in_zone(zone).filter(|r| r.tier == Tier::L2)
}

/// A non-zone-bulk meter that has sub-meters of its own, or is typed as a building bulk.
fn is_building_bulk(store: &MeterStore, record: &MeterRecord, config: &AnalysisConfig) -> bool {
    store.children_of(&record.label).next().is_some() || config.is_building_type(&record.meter_type)
}

/// Per-meter sums over the window, one month at a time.
fn window_total(record: &MeterRecord, window: &MonthWindow) -> Real {
    window
        .months()
        .iter()
        .map(|m| record.consumption(m))
        .fold(0.0, |acc, v| acc + v)
}

fn zone_meter(record: &MeterRecord, category: MeterCategory, window: &MonthWindow) -> ZoneMeter {
    ZoneMeter {
        label: record.label.clone(),
        meter_type: record.meter_type.clone(),
        tier: record.tier,
        category,
        consumption: window_total(record, window),
    }
}

fn base_result(
    zone: &str,
    topology: ZoneTopology,
    bulk_meter: Option<String>,
    zone_bulk_consumption: Real,
    meters: Vec<ZoneMeter>,
) -> ZoneAnalysisResult {
    let total_individual_consumption = meters.iter().map(|m| m.consumption).fold(0.0, |acc, v| acc + v);
    let difference = zone_bulk_consumption - total_individual_consumption;
    ZoneAnalysisResult {
        zone: zone.to_string(),
        topology,
        is_direct_connection: topology == ZoneTopology::DirectConnection,
        has_buildings: topology == ZoneTopology::Buildings,
        bulk_meter,
        zone_bulk_consumption,
        total_individual_consumption,
        building_total: None,
        villa_total: None,
        other_total: None,
        difference,
        loss_percentage: percent_of(difference, zone_bulk_consumption),
        efficiency_percentage: percent_of(total_individual_consumption, zone_bulk_consumption),
        main_bulk_usage_percent: None,
        months_count: None,
        date_range: None,
        meters,
    }
}

fn direct_connection(store: &MeterStore, zone: &str, window: &MonthWindow) -> ZoneAnalysisResult {
    let main_total = window
        .months()
        .iter()
        .map(|m| main_source_total(store, m))
        .fold(0.0, |acc, v| acc + v);
    let meters: Vec<ZoneMeter> = store
        .by_tier(Tier::DC)
        .map(|r| zone_meter(r, MeterCategory::Direct, window))
        .collect();

    let mut result = base_result(
        zone,
        ZoneTopology::DirectConnection,
        store.main_source().map(|r| r.label.clone()),
        main_total,
        meters,
    );
    // No zone meter sits between the main source and these meters, so there
    // is no loss to report; efficiency is their share of the main source.
    let usage = percent_of(result.total_individual_consumption, result.zone_bulk_consumption);
    result.main_bulk_usage_percent = Some(usage);
    result.efficiency_percentage = usage;
    result.difference = 0.0;
    result.loss_percentage = 0.0;
    result
}

fn building_layered(
    store: &MeterStore,
    zone: &str,
    window: &MonthWindow,
    config: &AnalysisConfig,
) -> ZoneAnalysisResult {
    let bulk: Vec<&MeterRecord> = zone_bulk_meters(store, zone).collect();
    let bulk_total = bulk.iter().map(|r| window_total(r, window)).fold(0.0, |acc, v| acc + v);

    let buildings: HashSet<&str> = zone_members(store, zone)
        .filter(|r| r.tier != Tier::L2 && is_building_bulk(store, r, config))
        .map(|r| r.label.as_str())
        .collect();

    let meters: Vec<ZoneMeter> = zone_members(store, zone)
        .filter(|r| r.tier != Tier::L2)
        .filter(|r| !behind_building(store, r, &buildings))
        .map(|r| {
            let category = if buildings.contains(r.label.as_str()) {
                MeterCategory::Building
            } else if config.is_villa_type(&r.meter_type) {
                MeterCategory::Villa
            } else {
                MeterCategory::Other
            };
            zone_meter(r, category, window)
        })
        .collect();

    let subtotal = |category: MeterCategory| -> Real {
        meters
            .iter()
            .filter(|m| m.category == category)
            .map(|m| m.consumption)
            .fold(0.0, |acc, v| acc + v)
    };
    let building_total = subtotal(MeterCategory::Building);
    let villa_total = subtotal(MeterCategory::Villa);
    let other_total = subtotal(MeterCategory::Other);

    let mut result = base_result(
        zone,
        ZoneTopology::Buildings,
        bulk.first().map(|r| r.label.clone()),
        bulk_total,
        meters,
    );
    result.building_total = Some(building_total);
    result.villa_total = Some(villa_total);
    result.other_total = Some(other_total);
    result
}

fn flat(store: &MeterStore, zone: &str, window: &MonthWindow) -> ZoneAnalysisResult {
    let bulk: Vec<&MeterRecord> = zone_bulk_meters(store, zone).collect();
    let bulk_total = bulk.iter().map(|r| window_total(r, window)).fold(0.0, |acc, v| acc + v);
    let meters: Vec<ZoneMeter> = zone_members(store, zone)
        .filter(|r| r.tier != Tier::L2)
        .map(|r| zone_meter(r, MeterCategory::Individual, window))
        .collect();

    base_result(
        zone,
        ZoneTopology::Flat,
        bulk.first().map(|r| r.label.clone()),
        bulk_total,
        meters,
    )
}

/// Whether some ancestor of `record` is one of the zone's building bulk meters.
///
/// The walk is bounded by the store size, so malformed parent loops end.
fn behind_building(store: &MeterStore, record: &MeterRecord, buildings: &HashSet<&str>) -> bool {
    let mut parent = record.parent_label.as_str();
    for _ in 0..store.len() {
        if parent.is_empty() {
            return false;
        }
        if buildings.contains(parent) {
            return true;
        }
        match store.find(parent) {
            Some(p) => parent = p.parent_label.as_str(),
            None => return false,
        }
    }
    false
}
