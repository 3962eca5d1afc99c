//! Pricing model
//!
//! [`PricingModel`] owns the market inputs (competitors, value factors,
//! customer segments and market position) next to a [`CostModel`] and keeps
//! one recommendation per strategy. Every setter returns a new model whose
//! recommendations were recomputed from the complete new input set, so a
//! reader can never observe a mix of old and new inputs.
//!
//! Records that fail validation are left out with a warning instead of
//! failing the call.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::config::StrategyConfig;
use crate::cost::CostModel;
use crate::error::PricingStrategyResult;
use crate::guidance::{ImplementationGuidance, build_guidance};
use crate::models::{
    Competitor, CostStructure, CustomerSegment, MarketPosition, PriceRecommendation, SegmentInput,
    StrategyKind, ValueFactor,
};
use crate::segment::{CustomerSegmentModel, SegmentPrice};
use crate::strategy::{StrategyContext, StrategyRecommendations, recommend_all};
use crate::validation::{ensure_valid, is_valid, retain_valid};

/// Plain-data copy of a pricing model's market inputs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingSnapshot {
    pub market_position: MarketPosition,
    pub competitors: Vec<Competitor>,
    pub value_factors: Vec<ValueFactor>,
    pub segments: Vec<CustomerSegment>,
}

/// Immutable pricing aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct PricingModel {
    cost_model: CostModel,
    competitors: Vec<Competitor>,
    value_factors: Vec<ValueFactor>,
    segments: CustomerSegmentModel,
    market_position: MarketPosition,
    config: StrategyConfig,
    recommendations: StrategyRecommendations,
}

impl PricingModel {
    pub fn new(cost_model: CostModel) -> Self {
        Self::with_config(cost_model, StrategyConfig::default())
    }

    pub fn with_config(cost_model: CostModel, config: StrategyConfig) -> Self {
        Self::assemble(
            cost_model,
            Vec::new(),
            Vec::new(),
            CustomerSegmentModel::new(),
            MarketPosition::default(),
            config,
        )
    }

    /// Rebuild a live model from saved inputs; invalid records are dropped
    pub fn from_snapshot(
        cost_structure: CostStructure,
        snapshot: PricingSnapshot,
        config: StrategyConfig,
    ) -> Self {
        Self::assemble(
            CostModel::from_structure(cost_structure),
            retain_valid("competitor", snapshot.competitors),
            retain_valid("value factor", snapshot.value_factors),
            CustomerSegmentModel::from_segments(snapshot.segments),
            snapshot.market_position,
            config,
        )
    }

    fn assemble(
        cost_model: CostModel,
        competitors: Vec<Competitor>,
        value_factors: Vec<ValueFactor>,
        segments: CustomerSegmentModel,
        market_position: MarketPosition,
        config: StrategyConfig,
    ) -> Self {
        let recommendations = {
            let ctx = StrategyContext {
                cost: &cost_model,
                competitors: &competitors,
                value_factors: &value_factors,
                segments: &segments,
                position: market_position,
                config: &config,
            };
            recommend_all(&ctx)
        };

        tracing::debug!(
            competitors = competitors.len(),
            value_factors = value_factors.len(),
            segments = segments.len(),
            position = %market_position,
            optimal = recommendations.optimal.price,
            "Recomputed pricing recommendations"
        );

        Self {
            cost_model,
            competitors,
            value_factors,
            segments,
            market_position,
            config,
            recommendations,
        }
    }

    /// Clone the inputs, apply `edit`, then recompute everything
    fn rebuild(&self, edit: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        edit(&mut next);
        Self::assemble(
            next.cost_model,
            next.competitors,
            next.value_factors,
            next.segments,
            next.market_position,
            next.config,
        )
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn value_factors(&self) -> &[ValueFactor] {
        &self.value_factors
    }

    pub fn segments(&self) -> &CustomerSegmentModel {
        &self.segments
    }

    pub fn market_position(&self) -> MarketPosition {
        self.market_position
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn recommendations(&self) -> &StrategyRecommendations {
        &self.recommendations
    }

    pub fn recommendation(&self, strategy: StrategyKind) -> &PriceRecommendation {
        self.recommendations.get(strategy)
    }

    #[must_use]
    pub fn with_cost_model(&self, cost_model: CostModel) -> Self {
        self.rebuild(|m| m.cost_model = cost_model)
    }

    #[must_use]
    pub fn add_competitor(&self, competitor: Competitor) -> Self {
        if !is_valid("competitor", &competitor) {
            return self.clone();
        }
        self.rebuild(|m| m.competitors.push(competitor))
    }

    /// Remove the competitor at `index`; out-of-range indices leave the model unchanged
    #[must_use]
    pub fn remove_competitor(&self, index: usize) -> Self {
        self.rebuild(|m| {
            if index < m.competitors.len() {
                m.competitors.remove(index);
            }
        })
    }

    #[must_use]
    pub fn add_value_factor(&self, factor: ValueFactor) -> Self {
        if !is_valid("value factor", &factor) {
            return self.clone();
        }
        self.rebuild(|m| m.value_factors.push(factor))
    }

    #[must_use]
    pub fn remove_value_factor(&self, index: usize) -> Self {
        self.rebuild(|m| {
            if index < m.value_factors.len() {
                m.value_factors.remove(index);
            }
        })
    }

    #[must_use]
    pub fn add_segment(&self, input: SegmentInput) -> Self {
        if !is_valid("segment", &input) {
            return self.clone();
        }
        self.rebuild(|m| m.segments = m.segments.add_segment(input))
    }

    pub fn update_segment(&self, id: Uuid, input: SegmentInput) -> PricingStrategyResult<Self> {
        ensure_valid(&input)?;
        let segments = self.segments.update_segment(id, input)?;
        Ok(self.rebuild(|m| m.segments = segments))
    }

    pub fn remove_segment(&self, id: Uuid) -> PricingStrategyResult<Self> {
        let segments = self.segments.remove_segment(id)?;
        Ok(self.rebuild(|m| m.segments = segments))
    }

    #[must_use]
    pub fn set_market_position(&self, position: MarketPosition) -> Self {
        self.rebuild(|m| m.market_position = position)
    }

    #[must_use]
    pub fn set_config(&self, config: StrategyConfig) -> Self {
        self.rebuild(|m| m.config = config)
    }

    /// Per-segment prices around a base recommendation
    pub fn segment_prices(&self, base: &PriceRecommendation) -> Vec<SegmentPrice> {
        self.segments.segment_prices(base.price)
    }

    pub fn implementation_guidance(&self, strategy: StrategyKind) -> ImplementationGuidance {
        build_guidance(strategy, &self.recommendations, &self.segments)
    }

    /// Deep copy of the market inputs, detached from this model
    pub fn snapshot(&self) -> PricingSnapshot {
        PricingSnapshot {
            market_position: self.market_position,
            competitors: self.competitors.clone(),
            value_factors: self.value_factors.clone(),
            segments: self.segments.segments().to_vec(),
        }
    }
}
