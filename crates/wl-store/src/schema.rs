//! Dataset schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wl_core::Real;

/// Hierarchy tag attached to every meter by the upstream parser.
///
/// Deserialized through [`Tier::from_tag`], so case and padding do not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Tier {
    /// Main source bulk meter.
    L1,
    /// Zone bulk meter.
    L2,
    /// Building bulk meter, or an individual meter hanging directly off a zone.
    L3,
    /// Apartment / end-user meter inside a building.
    L4,
    /// Direct connection billed off the main source.
    DC,
    #[default]
    Unclassified,
}

impl Tier {
    /// Parse a free-form tag (`"l2"`, `" DC "`). Unknown tags are unclassified.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "L1" => Tier::L1,
            "L2" => Tier::L2,
            "L3" => Tier::L3,
            "L4" => Tier::L4,
            "DC" => Tier::DC,
            _ => Tier::Unclassified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::L1 => "L1",
            Tier::L2 => "L2",
            Tier::L3 => "L3",
            Tier::L4 => "L4",
            Tier::DC => "DC",
            Tier::Unclassified => "unclassified",
        }
    }
}

impl From<String> for Tier {
    fn from(tag: String) -> Self {
        Tier::from_tag(&tag)
    }
}

/// One physical meter and its monthly readings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeterRecord {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub meter_type: String,
    #[serde(default)]
    pub parent_label: String,
    #[serde(default)]
    pub tier: Tier,
    /// Month key -> reading. Absent months read as zero.
    #[serde(default)]
    pub monthly_consumption: BTreeMap<String, Real>,
}

impl MeterRecord {
    /// Reading for one month; zero when the month is absent.
    pub fn consumption(&self, month: &str) -> Real {
        self.monthly_consumption.get(month).copied().unwrap_or(0.0)
    }

    /// Sum over a set of months; absent months contribute zero.
    pub fn consumption_over<S: AsRef<str>>(&self, months: &[S]) -> Real {
        months
            .iter()
            .map(|m| self.consumption(m.as_ref()))
            .fold(0.0, |acc, v| acc + v)
    }

    /// Sum of the series currently held by this record.
    pub fn total_consumption(&self) -> Real {
        self.monthly_consumption.values().fold(0.0, |acc, v| acc + v)
    }
}

/// The serialized form of a store: the parser's output contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Dataset {
    /// Canonical month list. When empty, it is derived from the readings.
    #[serde(default)]
    pub months: Vec<String>,
    #[serde(default)]
    pub records: Vec<MeterRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_from_tag_is_forgiving() {
        assert_eq!(Tier::from_tag(" l2 "), Tier::L2);
        assert_eq!(Tier::from_tag("DC"), Tier::DC);
        assert_eq!(Tier::from_tag("N/A"), Tier::Unclassified);
    }

    #[test]
    fn tier_deserializes_unknown_as_unclassified() {
        let tier: Tier = serde_json::from_str("\"L5\"").unwrap();
        assert_eq!(tier, Tier::Unclassified);
        let tier: Tier = serde_json::from_str("\"L3\"").unwrap();
        assert_eq!(tier, Tier::L3);
    }

    #[test]
    fn tier_deserializes_any_case() {
        let tiers: Vec<Tier> = serde_json::from_str(r#"["l2", "dc", " L4 ", "Unclassified", "l1"]"#).unwrap();
        assert_eq!(tiers, vec![Tier::L2, Tier::DC, Tier::L4, Tier::Unclassified, Tier::L1]);
    }

    #[test]
    fn empty_series_sums_to_positive_zero() {
        let record = MeterRecord {
            id: "1".into(),
            label: "A".into(),
            account_number: String::new(),
            zone: String::new(),
            meter_type: String::new(),
            parent_label: String::new(),
            tier: Tier::L4,
            monthly_consumption: BTreeMap::new(),
        };
        assert!(record.total_consumption().is_sign_positive());
        assert!(record.consumption_over::<&str>(&[]).is_sign_positive());
    }

    #[test]
    fn missing_month_reads_as_zero() {
        let record = MeterRecord {
            id: "1".into(),
            label: "A".into(),
            account_number: String::new(),
            zone: "Z".into(),
            meter_type: String::new(),
            parent_label: String::new(),
            tier: Tier::L2,
            monthly_consumption: BTreeMap::from([("Jan-25".to_string(), 12.5)]),
        };
        assert_eq!(record.consumption("Jan-25"), 12.5);
        assert_eq!(record.consumption("Feb-25"), 0.0);
        assert_eq!(record.consumption_over(&["Jan-25", "Feb-25"]), 12.5);
        assert_eq!(record.total_consumption(), 12.5);
    }
}
