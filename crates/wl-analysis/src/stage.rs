//! Stage classification: system-wide losses from hierarchy tags.
//!
//! Meters are grouped by tier tag rather than by parent links, which keeps
//! the top-line figures stable when parent references are incomplete.

use serde::Serialize;
use wl_core::{Real, percent_of};
use wl_store::{MeterStore, Tier};

use crate::config::AnalysisConfig;

/// A stage loss in absolute terms and as a share of the stage's input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StageLoss {
    pub absolute: Real,
    pub percent: Real,
}

/// Summed readings per stage for one month, or accumulated over several.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StageTotals {
    pub main_source: Real,
    pub zone_distribution: Real,
    pub building_level: Real,
    pub end_user: Real,
    /// Raw zone-bulk sum, without direct connections.
    pub l2: Real,
    /// Raw building-level sum, without direct connections.
    pub l3: Real,
}

/// Stage losses and efficiency for one time window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WaterLossResult {
    pub main_source_total: Real,
    pub zone_distribution_total: Real,
    pub building_level_total: Real,
    pub end_user_total: Real,
    pub l2_total: Real,
    pub l3_total: Real,
    /// Main source vs. zone distribution.
    pub stage1_loss: StageLoss,
    /// Raw L2 sum vs. raw L3 sum.
    pub stage2_loss: StageLoss,
    /// Building level vs. end users.
    pub stage3_loss: StageLoss,
    /// Main source vs. end users.
    pub total_loss: StageLoss,
    pub system_efficiency_percent: Real,
}

impl WaterLossResult {
    /// Derive losses and percentages from stage totals.
    pub fn from_totals(t: StageTotals) -> Self {
        let mut result = Self {
            main_source_total: t.main_source,
            zone_distribution_total: t.zone_distribution,
            building_level_total: t.building_level,
            end_user_total: t.end_user,
            l2_total: t.l2,
            l3_total: t.l3,
            stage1_loss: StageLoss {
                absolute: t.main_source - t.zone_distribution,
                percent: 0.0,
            },
            // Raw sums on purpose: direct connections are left out of this stage.
            stage2_loss: StageLoss {
                absolute: t.l2 - t.l3,
                percent: 0.0,
            },
            stage3_loss: StageLoss {
                absolute: t.building_level - t.end_user,
                percent: 0.0,
            },
            total_loss: StageLoss {
                absolute: t.main_source - t.end_user,
                percent: 0.0,
            },
            system_efficiency_percent: 0.0,
        };
        result.recompute_percentages();
        result
    }

    /// Add every absolute field of `other` into `self`. Percentages are left
    /// stale until [`recompute_percentages`](Self::recompute_percentages).
    pub fn accumulate(&mut self, other: &WaterLossResult) {
        self.main_source_total += other.main_source_total;
        self.zone_distribution_total += other.zone_distribution_total;
        self.building_level_total += other.building_level_total;
        self.end_user_total += other.end_user_total;
        self.l2_total += other.l2_total;
        self.l3_total += other.l3_total;
        self.stage1_loss.absolute += other.stage1_loss.absolute;
        self.stage2_loss.absolute += other.stage2_loss.absolute;
        self.stage3_loss.absolute += other.stage3_loss.absolute;
        self.total_loss.absolute += other.total_loss.absolute;
    }

    /// Percentages and efficiency from the current totals, zero-guarded.
    pub fn recompute_percentages(&mut self) {
        self.stage1_loss.percent = percent_of(self.stage1_loss.absolute, self.main_source_total);
        self.stage2_loss.percent =
            percent_of(self.stage2_loss.absolute, self.zone_distribution_total);
        self.stage3_loss.percent = percent_of(self.stage3_loss.absolute, self.building_level_total);
        self.total_loss.percent = percent_of(self.total_loss.absolute, self.main_source_total);
        self.system_efficiency_percent = percent_of(self.end_user_total, self.main_source_total);
    }
}

/// Sum of one tier's readings for a month.
pub fn tier_total(store: &MeterStore, tier: Tier, month: &str) -> Real {
    sum(store.by_tier(tier).map(|r| r.consumption(month)))
}

/// Adds from `0.0`; `Iterator::sum` starts an `f64` sum at `-0.0`.
pub(crate) fn sum(values: impl Iterator<Item = Real>) -> Real {
    values.fold(0.0, |acc, v| acc + v)
}

/// Main-source reading for a month; zero when there is no `L1` meter.
pub fn main_source_total(store: &MeterStore, month: &str) -> Real {
    tier_total(store, Tier::L1, month)
}

/// Per-stage sums for one month.
pub fn stage_totals(store: &MeterStore, month: &str, config: &AnalysisConfig) -> StageTotals {
    let main_label = store.main_source().map(|r| r.label.as_str());

    let l2 = tier_total(store, Tier::L2, month);
    let l3 = tier_total(store, Tier::L3, month);
    let l4 = tier_total(store, Tier::L4, month);
    let dc = tier_total(store, Tier::DC, month);

    let dc_from_main = sum(
        store
            .by_tier(Tier::DC)
            .filter(|r| main_label.is_some_and(|main| r.parent_label == main))
            .map(|r| r.consumption(month)),
    );

    let l3_end_users = sum(
        store
            .by_tier(Tier::L3)
            .filter(|r| config.is_end_user_type(&r.meter_type))
            .map(|r| r.consumption(month)),
    );

    StageTotals {
        main_source: main_source_total(store, month),
        zone_distribution: l2 + dc_from_main,
        building_level: l3 + dc,
        end_user: l4 + l3_end_users + dc,
        l2,
        l3,
    }
}

/// Stage losses and efficiency for one month.
pub fn compute_stage_loss(store: &MeterStore, month: &str, config: &AnalysisConfig) -> WaterLossResult {
    if store.by_tier(Tier::L1).nth(1).is_some() {
        tracing::warn!(month, "more than one main-source meter, summing them");
    }

    let result = WaterLossResult::from_totals(stage_totals(store, month, config));
    for (stage, loss) in [
        ("stage1", result.stage1_loss),
        ("stage2", result.stage2_loss),
        ("stage3", result.stage3_loss),
    ] {
        if loss.absolute < 0.0 {
            tracing::warn!(month, stage, loss = loss.absolute, "downstream meters read more than their feed");
        }
    }
    tracing::debug!(
        month,
        main_source = result.main_source_total,
        end_user = result.end_user_total,
        efficiency = result.system_efficiency_percent,
        "stage loss computed"
    );
    result
}
