//! Cost allocation model
//!
//! Turns direct, time and indirect cost lines into a per-unit cost, a minimum
//! viable price and break-even figures. Every setter returns a new model with
//! the breakdown already recomputed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingStrategyError, PricingStrategyResult};
use crate::models::{CostStructure, DirectCost, IndirectCost, TimeCost};

/// Per-unit cost split by origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub direct: f64,
    pub time: f64,
    /// Monthly indirect costs allocated to one unit
    pub indirect: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Cost that scales with each unit sold (direct + time)
    pub fn variable(&self) -> f64 {
        self.direct + self.time
    }
}

/// Profit figures at a given price and volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfitProjection {
    pub price: f64,
    pub volume: f64,
    pub revenue: f64,
    pub variable_cost: f64,
    pub fixed_cost: f64,
    pub profit: f64,
    pub margin: f64,
}

/// Immutable cost model
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    structure: CostStructure,
    breakdown: CostBreakdown,
    monthly_indirect_total: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::from_structure(CostStructure::default())
    }
}

impl CostModel {
    /// Build a model from raw inputs, computing the breakdown immediately
    pub fn from_structure(structure: CostStructure) -> Self {
        let direct: f64 = structure.direct_costs.iter().map(|c| c.amount).sum();
        let time: f64 = structure.time_costs.iter().map(TimeCost::cost).sum();
        let monthly_indirect_total: f64 = structure
            .indirect_costs
            .iter()
            .map(IndirectCost::monthly_amount)
            .sum();

        // A non-positive volume charges the whole month's overhead to one unit.
        let indirect = if structure.expected_volume > 0.0 {
            monthly_indirect_total / structure.expected_volume
        } else {
            monthly_indirect_total
        };

        let breakdown = CostBreakdown {
            direct,
            time,
            indirect,
            total: (direct + time + indirect).max(0.0),
        };

        Self {
            structure,
            breakdown,
            monthly_indirect_total,
        }
    }

    pub fn structure(&self) -> &CostStructure {
        &self.structure
    }

    pub fn into_structure(self) -> CostStructure {
        self.structure
    }

    pub fn breakdown(&self) -> CostBreakdown {
        self.breakdown
    }

    pub fn total_cost_per_unit(&self) -> f64 {
        self.breakdown.total
    }

    /// Sum of indirect costs normalised to one month
    pub fn monthly_indirect_total(&self) -> f64 {
        self.monthly_indirect_total
    }

    fn rebuild(&self, edit: impl FnOnce(&mut CostStructure)) -> Self {
        let mut structure = self.structure.clone();
        edit(&mut structure);
        Self::from_structure(structure)
    }

    #[must_use]
    pub fn add_direct_cost(&self, cost: DirectCost) -> Self {
        self.rebuild(|s| s.direct_costs.push(cost))
    }

    /// Remove the direct cost at `index`; out-of-range indices leave the model unchanged
    #[must_use]
    pub fn remove_direct_cost(&self, index: usize) -> Self {
        self.rebuild(|s| {
            if index < s.direct_costs.len() {
                s.direct_costs.remove(index);
            }
        })
    }

    #[must_use]
    pub fn add_indirect_cost(&self, cost: IndirectCost) -> Self {
        self.rebuild(|s| s.indirect_costs.push(cost))
    }

    #[must_use]
    pub fn remove_indirect_cost(&self, index: usize) -> Self {
        self.rebuild(|s| {
            if index < s.indirect_costs.len() {
                s.indirect_costs.remove(index);
            }
        })
    }

    #[must_use]
    pub fn add_time_cost(&self, cost: TimeCost) -> Self {
        self.rebuild(|s| s.time_costs.push(cost))
    }

    #[must_use]
    pub fn remove_time_cost(&self, index: usize) -> Self {
        self.rebuild(|s| {
            if index < s.time_costs.len() {
                s.time_costs.remove(index);
            }
        })
    }

    #[must_use]
    pub fn set_target_margin(&self, target_margin: f64) -> Self {
        self.rebuild(|s| s.target_margin = target_margin)
    }

    #[must_use]
    pub fn set_expected_volume(&self, expected_volume: f64) -> Self {
        self.rebuild(|s| s.expected_volume = expected_volume)
    }

    /// Lowest price that still earns the target margin.
    ///
    /// Infinite when the target margin is 1 or more.
    pub fn minimum_viable_price(&self) -> f64 {
        let margin = self.structure.target_margin;
        if margin >= 1.0 {
            return f64::INFINITY;
        }
        self.breakdown.total / (1.0 - margin)
    }

    /// Monthly units needed to cover fixed costs at `price`.
    ///
    /// Returns +inf when `price` does not exceed the full per-unit cost.
    pub fn break_even_volume(&self, price: f64) -> f64 {
        if price <= self.breakdown.total {
            return f64::INFINITY;
        }
        let contribution = price - self.breakdown.variable();
        self.monthly_indirect_total / contribution
    }

    /// Price at which the expected volume exactly recovers all costs
    pub fn break_even_price(&self) -> f64 {
        self.breakdown.total
    }

    /// Price at which `volume` units per month exactly recover all costs
    pub fn break_even_price_at_volume(&self, volume: f64) -> f64 {
        if volume <= 0.0 {
            return f64::INFINITY;
        }
        self.breakdown.variable() + self.monthly_indirect_total / volume
    }

    /// Margin earned per unit at `price`
    pub fn margin_at(&self, price: f64) -> PricingStrategyResult<f64> {
        if price <= 0.0 {
            return Err(PricingStrategyError::UndefinedMargin(price));
        }
        Ok((price - self.breakdown.total) / price)
    }

    /// Monthly profit when selling `volume` units at `price`
    pub fn profit_at(&self, price: f64, volume: f64) -> PricingStrategyResult<ProfitProjection> {
        if price <= 0.0 {
            return Err(PricingStrategyError::UndefinedMargin(price));
        }

        let revenue = price * volume;
        let variable_cost = self.breakdown.variable() * volume;
        let fixed_cost = self.monthly_indirect_total;
        let profit = revenue - variable_cost - fixed_cost;
        let margin = if revenue > 0.0 {
            profit / revenue
        } else {
            self.margin_at(price)?
        };

        Ok(ProfitProjection {
            price,
            volume,
            revenue,
            variable_cost,
            fixed_cost,
            profit,
            margin,
        })
    }
}
