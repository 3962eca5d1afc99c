//! Pricing strategies
//!
//! Each strategy turns the current inputs into one [`PriceRecommendation`].
//! Strategies lacking data fall back to cost-plus and say so through
//! [`StrategyBasis::FallenBackTo`]; the blended "optimal" strategy combines the
//! four component prices with weights that shrink for thinly supported data.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{BlendWeights, StrategyConfig};
use crate::cost::CostModel;
use crate::models::{
    Competitor, MarketPosition, PriceRecommendation, StrategyBasis, StrategyKind, ValueFactor,
    round_currency,
};
use crate::segment::CustomerSegmentModel;

pub const COST_PLUS_CONFIDENCE: f64 = 0.8;
pub const COMPETITOR_CONFIDENCE: f64 = 0.7;
pub const COMPETITOR_THIN_CONFIDENCE: f64 = 0.5;
pub const VALUE_CONFIDENCE: f64 = 0.75;
pub const VALUE_THIN_CONFIDENCE: f64 = 0.4;
pub const ELASTICITY_CONFIDENCE: f64 = 0.7;
pub const ELASTICITY_THIN_CONFIDENCE: f64 = 0.4;
/// Blended uncertainty: never above a well-supported single strategy
pub const OPTIMAL_CONFIDENCE: f64 = 0.65;

/// Competitors needed before the competitor price is trusted
const WELL_SAMPLED_COMPETITORS: usize = 3;
/// Competitors and value factors needed before the value price is trusted
const WELL_SAMPLED_VALUE_INPUTS: usize = 2;

/// Borrowed view of everything a strategy may look at
#[derive(Debug, Clone, Copy)]
pub(crate) struct StrategyContext<'a> {
    pub cost: &'a CostModel,
    pub competitors: &'a [Competitor],
    pub value_factors: &'a [ValueFactor],
    pub segments: &'a CustomerSegmentModel,
    pub position: MarketPosition,
    pub config: &'a StrategyConfig,
}

impl StrategyContext<'_> {
    fn average_competitor_price(&self) -> Option<f64> {
        mean(self.competitors.iter().map(|c| c.price))
    }

    fn average_competitor_value(&self) -> Option<f64> {
        mean(self.competitors.iter().map(Competitor::overall_value))
    }

    /// Importance-weighted mean score of the business's own value factors
    fn own_value_score(&self) -> Option<f64> {
        let importance: f64 = self.value_factors.iter().map(|f| f.importance).sum();
        if importance <= 0.0 {
            return None;
        }
        let weighted: f64 = self
            .value_factors
            .iter()
            .map(ValueFactor::weighted_score)
            .sum();
        Some(weighted / importance)
    }

    /// Attach rounded price, margin and break-even volume
    fn recommend(
        &self,
        strategy: StrategyKind,
        basis: StrategyBasis,
        price: f64,
        confidence_level: f64,
        explanation: String,
    ) -> PriceRecommendation {
        let price = round_currency(price.max(0.0));
        let margin = if price.is_finite() {
            self.cost.margin_at(price).unwrap_or(0.0)
        } else {
            0.0
        };

        PriceRecommendation {
            strategy,
            basis,
            price,
            margin,
            break_even_volume: self.cost.break_even_volume(price),
            confidence_level,
            explanation,
        }
    }

    /// Re-tag another strategy's answer for a strategy that lacked data
    fn fall_back(
        &self,
        strategy: StrategyKind,
        fallback: &PriceRecommendation,
        reason: &str,
    ) -> PriceRecommendation {
        tracing::debug!(%strategy, fallback = %fallback.strategy, reason, "Strategy fell back");
        PriceRecommendation {
            strategy,
            basis: StrategyBasis::FallenBackTo(fallback.strategy),
            explanation: format!("{reason}; using the {} price. {}", fallback.strategy, fallback.explanation),
            ..fallback.clone()
        }
    }
}

/// Minimum viable price scaled by the market position
pub(crate) fn cost_plus(ctx: &StrategyContext<'_>) -> PriceRecommendation {
    let minimum = ctx.cost.minimum_viable_price();
    let multiplier = ctx.config.cost_plus_multipliers.for_position(ctx.position);

    ctx.recommend(
        StrategyKind::CostPlus,
        StrategyBasis::Computed,
        minimum * multiplier,
        COST_PLUS_CONFIDENCE,
        format!(
            "Unit cost of ${:.2} at a {:.0}% target margin gives a minimum price of ${:.2}, \
             adjusted x{multiplier} for a {} position.",
            ctx.cost.total_cost_per_unit(),
            ctx.cost.structure().target_margin * 100.0,
            minimum,
            ctx.position
        ),
    )
}

/// Average competitor price scaled by the market position, never below cost
pub(crate) fn competitor(
    ctx: &StrategyContext<'_>,
    cost_plus: &PriceRecommendation,
) -> PriceRecommendation {
    let Some(average) = ctx.average_competitor_price() else {
        return ctx.fall_back(StrategyKind::Competitor, cost_plus, "No competitor prices recorded");
    };

    let multiplier = ctx.config.competitor_multipliers.for_position(ctx.position);
    let minimum = ctx.cost.minimum_viable_price();
    let price = (average * multiplier).max(minimum);
    let confidence = if ctx.competitors.len() >= WELL_SAMPLED_COMPETITORS {
        COMPETITOR_CONFIDENCE
    } else {
        COMPETITOR_THIN_CONFIDENCE
    };

    ctx.recommend(
        StrategyKind::Competitor,
        StrategyBasis::Computed,
        price,
        confidence,
        format!(
            "Average price across {} competitor(s) is ${average:.2}, adjusted x{multiplier} for a {} \
             position and floored at the minimum viable price of ${minimum:.2}.",
            ctx.competitors.len(),
            ctx.position
        ),
    )
}

/// Own value score priced at the market's value-to-price ratio
pub(crate) fn value(
    ctx: &StrategyContext<'_>,
    cost_plus: &PriceRecommendation,
) -> PriceRecommendation {
    if ctx.competitors.is_empty() || ctx.value_factors.is_empty() {
        return ctx.fall_back(
            StrategyKind::Value,
            cost_plus,
            "Value pricing needs both competitors and value factors",
        );
    }

    let (Some(own_score), Some(average_value), Some(average_price)) = (
        ctx.own_value_score(),
        ctx.average_competitor_value(),
        ctx.average_competitor_price(),
    ) else {
        return ctx.fall_back(StrategyKind::Value, cost_plus, "Value scores are incomplete");
    };

    let value_to_price = average_value / average_price;
    if !value_to_price.is_finite() || value_to_price <= 0.0 {
        return ctx.fall_back(
            StrategyKind::Value,
            cost_plus,
            "Market value-to-price ratio is undefined",
        );
    }

    let multiplier = ctx.config.value_multipliers.for_position(ctx.position);
    let minimum = ctx.cost.minimum_viable_price();
    let price = (own_score / value_to_price * multiplier).max(minimum);
    let confidence = if ctx.competitors.len() >= WELL_SAMPLED_VALUE_INPUTS
        && ctx.value_factors.len() >= WELL_SAMPLED_VALUE_INPUTS
    {
        VALUE_CONFIDENCE
    } else {
        VALUE_THIN_CONFIDENCE
    };

    ctx.recommend(
        StrategyKind::Value,
        StrategyBasis::Computed,
        price,
        confidence,
        format!(
            "Your value score of {own_score:.1}/10 against a market average of {average_value:.1}/10 \
             at ${average_price:.2} ({value_to_price:.3} value points per dollar), adjusted x{multiplier} \
             for a {} position.",
            ctx.position
        ),
    )
}

/// Revenue-optimal price for the segments' weighted elasticity
pub(crate) fn elasticity(
    ctx: &StrategyContext<'_>,
    cost_plus: &PriceRecommendation,
    competitor: &PriceRecommendation,
) -> PriceRecommendation {
    let reference = if ctx.competitors.is_empty() {
        cost_plus.price
    } else {
        competitor.price
    };

    let elasticity = ctx.segments.weighted_elasticity();
    let minimum = ctx.cost.minimum_viable_price();
    let price = ctx.segments.optimal_price(reference, minimum);
    let projected_demand = ctx
        .segments
        .demand_at(price, reference, ctx.config.base_demand);
    let confidence = if ctx.segments.is_empty() {
        ELASTICITY_THIN_CONFIDENCE
    } else {
        ELASTICITY_CONFIDENCE
    };

    ctx.recommend(
        StrategyKind::Elasticity,
        StrategyBasis::Computed,
        price,
        confidence,
        format!(
            "Weighted elasticity of {elasticity:.2} across {} segment(s) around a reference price of \
             ${reference:.2}; projected demand {projected_demand:.0} units against a base of {:.0}.",
            ctx.segments.len(),
            ctx.config.base_demand
        ),
    )
}

/// Base weights with thinly supported components shrunk, renormalised to sum to 1
pub(crate) fn blend_weights(ctx: &StrategyContext<'_>) -> BlendWeights {
    let policy = &ctx.config.thin_data;
    let mut weights = ctx.config.blend_weights;

    if ctx.competitors.len() < policy.min_competitors {
        weights.competitor = policy.shrunk_competitor_weight;
    }
    if ctx.value_factors.len() < policy.min_value_factors {
        weights.value = policy.shrunk_value_weight;
    }
    if ctx.segments.len() < policy.min_segments {
        weights.elasticity = policy.shrunk_elasticity_weight;
    }

    weights.normalized()
}

/// Weighted blend of the four component prices
pub(crate) fn optimal(
    ctx: &StrategyContext<'_>,
    components: [&PriceRecommendation; 4],
    weights: &BlendWeights,
) -> PriceRecommendation {
    let price: f64 = components
        .iter()
        .map(|r| weights.weight(r.strategy) * r.price)
        .sum();

    let parts = components
        .iter()
        .map(|r| {
            format!(
                "{} ${:.2} x {:.0}%",
                r.strategy,
                r.price,
                weights.weight(r.strategy) * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    ctx.recommend(
        StrategyKind::Optimal,
        StrategyBasis::Computed,
        price,
        OPTIMAL_CONFIDENCE,
        format!("Blend of all strategies ({parts})."),
    )
}

/// One recommendation per strategy plus the weights used for the blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRecommendations {
    pub cost_plus: PriceRecommendation,
    pub competitor: PriceRecommendation,
    pub value: PriceRecommendation,
    pub elasticity: PriceRecommendation,
    pub optimal: PriceRecommendation,
    /// Normalised weights applied to the components of the blend
    #[serde(default)]
    pub weights: BlendWeights,
}

impl StrategyRecommendations {
    pub fn get(&self, strategy: StrategyKind) -> &PriceRecommendation {
        match strategy {
            StrategyKind::CostPlus => &self.cost_plus,
            StrategyKind::Competitor => &self.competitor,
            StrategyKind::Value => &self.value,
            StrategyKind::Elasticity => &self.elasticity,
            StrategyKind::Optimal => &self.optimal,
        }
    }

    /// The four component recommendations, blend excluded
    pub fn components(&self) -> [&PriceRecommendation; 4] {
        [&self.cost_plus, &self.competitor, &self.value, &self.elasticity]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceRecommendation> {
        self.components().into_iter().chain(std::iter::once(&self.optimal))
    }
}

/// Run every strategy against the same inputs
pub(crate) fn recommend_all(ctx: &StrategyContext<'_>) -> StrategyRecommendations {
    let cost_plus = cost_plus(ctx);
    let competitor = competitor(ctx, &cost_plus);
    let value = value(ctx, &cost_plus);
    let elasticity = elasticity(ctx, &cost_plus, &competitor);
    let weights = blend_weights(ctx);
    let optimal = optimal(ctx, [&cost_plus, &competitor, &value, &elasticity], &weights);

    StrategyRecommendations {
        cost_plus,
        competitor,
        value,
        elasticity,
        optimal,
        weights,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
