//! The immutable meter record store.

use std::collections::{HashMap, HashSet};

use wl_core::{MeterId, sort_months};

use crate::schema::{Dataset, MeterRecord, Tier};
use crate::validate::validate_dataset;
use crate::window::MonthWindow;
use crate::StoreResult;

/// Validated snapshot of every meter and the canonical month list.
///
/// Labels, parent labels and zone keys are trimmed on construction, so every
/// comparison downstream is a plain string comparison. A store is never
/// mutated; refreshing the data means building a new one.
#[derive(Debug, Clone)]
pub struct MeterStore {
    records: Vec<MeterRecord>,
    months: Vec<String>,
    label_index: HashMap<String, MeterId>,
}

impl MeterStore {
    /// Build a store from parsed records and the canonical month list.
    pub fn new(records: Vec<MeterRecord>, months: Vec<String>) -> StoreResult<Self> {
        Self::from_dataset(Dataset { months, records })
    }

    /// Build a store from a deserialized dataset.
    ///
    /// An empty month list is derived from the readings and sorted
    /// chronologically. Readings for months outside the list are dropped, so
    /// a record's total always covers exactly the store's months.
    pub fn from_dataset(dataset: Dataset) -> StoreResult<Self> {
        validate_dataset(&dataset)?;

        let mut records: Vec<MeterRecord> = dataset.records.into_iter().map(normalize).collect();

        let months = if dataset.months.is_empty() {
            let seen: HashSet<&str> = records
                .iter()
                .flat_map(|r| r.monthly_consumption.keys().map(String::as_str))
                .collect();
            let seen: Vec<&str> = seen.into_iter().collect();
            sort_months(&seen)?
        } else {
            dataset.months.iter().map(|m| m.trim().to_string()).collect()
        };

        let known: HashSet<&str> = months.iter().map(String::as_str).collect();
        for MeterRecord {
            label,
            monthly_consumption,
            ..
        } in &mut records
        {
            monthly_consumption.retain(|month, _| {
                let keep = known.contains(month.as_str());
                if !keep {
                    tracing::warn!(
                        meter = %label,
                        month = %month,
                        "dropping reading for a month outside the month list"
                    );
                }
                keep
            });
        }

        let label_index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.label.clone(), MeterId::from_index(i as u32)))
            .collect();

        tracing::debug!(
            meters = records.len(),
            months = months.len(),
            "meter store built"
        );

        Ok(Self {
            records,
            months,
            label_index,
        })
    }

    /// Serializable form of this snapshot.
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            months: self.months.clone(),
            records: self.records.clone(),
        }
    }

    /// All records in input order.
    pub fn records(&self) -> &[MeterRecord] {
        &self.records
    }

    /// Canonical month list, oldest first.
    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record by store position.
    pub fn record(&self, id: MeterId) -> Option<&MeterRecord> {
        self.records.get(id.slot())
    }

    /// Store position of the meter with this label (trimmed before lookup).
    pub fn id_of(&self, label: &str) -> Option<MeterId> {
        self.label_index.get(label.trim()).copied()
    }

    /// Record with this label (trimmed before lookup).
    pub fn find(&self, label: &str) -> Option<&MeterRecord> {
        self.id_of(label).and_then(|id| self.record(id))
    }

    /// Records carrying a given hierarchy tag, in input order.
    pub fn by_tier(&self, tier: Tier) -> impl Iterator<Item = &MeterRecord> + '_ {
        self.records.iter().filter(move |r| r.tier == tier)
    }

    /// Records declared as belonging to a zone, in input order.
    pub fn in_zone<'a>(&'a self, zone: &'a str) -> impl Iterator<Item = &'a MeterRecord> + 'a {
        let zone = zone.trim();
        self.records.iter().filter(move |r| r.zone == zone)
    }

    /// Direct children by parent label, in input order.
    pub fn children_of<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a MeterRecord> + 'a {
        let label = label.trim();
        self.records
            .iter()
            .filter(move |r| !label.is_empty() && r.parent_label == label)
    }

    /// Distinct non-empty zone keys in first-seen order.
    pub fn zones(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.zone.as_str())
            .filter(|z| !z.is_empty() && seen.insert(*z))
            .collect()
    }

    /// The main-source meter: the first record tagged `L1`.
    pub fn main_source(&self) -> Option<&MeterRecord> {
        self.by_tier(Tier::L1).next()
    }

    /// Resolve an inclusive window against this store's month list.
    pub fn window(&self, start: &str, end: &str) -> Option<MonthWindow> {
        MonthWindow::resolve(&self.months, start, end)
    }

    /// Window spanning the full history.
    pub fn full_window(&self) -> MonthWindow {
        MonthWindow::all(&self.months)
    }

    /// New snapshot whose series (and therefore totals) cover only `window`.
    pub fn restrict_to(&self, window: &MonthWindow) -> MeterStore {
        let records = self
            .records
            .iter()
            .map(|r| {
                let mut filtered = r.clone();
                filtered
                    .monthly_consumption
                    .retain(|month, _| window.contains(month));
                filtered
            })
            .collect();

        MeterStore {
            records,
            months: window.months().to_vec(),
            label_index: self.label_index.clone(),
        }
    }
}

fn normalize(mut record: MeterRecord) -> MeterRecord {
    record.label = record.label.trim().to_string();
    record.parent_label = record.parent_label.trim().to_string();
    record.zone = record.zone.trim().to_string();
    record.monthly_consumption = record
        .monthly_consumption
        .into_iter()
        .map(|(m, v)| (m.trim().to_string(), v))
        .collect();
    record
}
