//! Analysis configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Zone key of the direct-connection pseudo-zone.
    pub direct_connection_zone: String,
    /// Parent labels meaning "no parent" (compared trimmed, case-insensitively).
    pub unresolved_parent_labels: Vec<String>,
    /// Meter-type keywords marking an L3 meter as an end consumer.
    pub end_user_meter_types: Vec<String>,
    /// Meter-type keywords marking a villa.
    pub villa_meter_types: Vec<String>,
    /// Meter-type keywords marking a building bulk meter.
    pub building_meter_types: Vec<String>,
    /// Zones analysed as building-layered regardless of their records.
    pub building_zones: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            direct_connection_zone: "Direct Connection".to_string(),
            unresolved_parent_labels: vec![String::new(), "N/A".to_string()],
            end_user_meter_types: ["villa", "retail", "common", "irr"]
                .into_iter()
                .map(String::from)
                .collect(),
            villa_meter_types: vec!["villa".to_string()],
            building_meter_types: vec!["building bulk".to_string(), "building_bulk".to_string()],
            building_zones: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// L3 meter type billed as an individual unit rather than a building bulk.
    pub fn is_end_user_type(&self, meter_type: &str) -> bool {
        matches_any(meter_type, &self.end_user_meter_types)
    }

    pub fn is_villa_type(&self, meter_type: &str) -> bool {
        matches_any(meter_type, &self.villa_meter_types)
    }

    pub fn is_building_type(&self, meter_type: &str) -> bool {
        matches_any(meter_type, &self.building_meter_types)
    }

    pub fn is_direct_connection_zone(&self, zone: &str) -> bool {
        zone.trim().eq_ignore_ascii_case(self.direct_connection_zone.trim())
    }

    pub fn is_building_zone(&self, zone: &str) -> bool {
        let zone = zone.trim();
        self.building_zones.iter().any(|z| z.trim() == zone)
    }
}

/// Case-insensitive substring match against a keyword list.
fn matches_any(meter_type: &str, keywords: &[String]) -> bool {
    let meter_type = meter_type.to_lowercase();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && meter_type.contains(&k))
}
