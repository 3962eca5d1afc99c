//! Customer segment and elasticity model
//!
//! Segments carry a price elasticity on a -10..0 scale (more negative means
//! more price sensitive). Users enter a 1-10 sensitivity score instead, which
//! is converted on the way in and out.
//!
//! Demand follows a constant-elasticity approximation around a reference
//! `(base_price, base_demand)` point.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{PricingStrategyError, PricingStrategyResult};
use crate::models::{CustomerSegment, SegmentInput, round_currency};

/// Elasticity assumed when no segment data is available
pub const DEFAULT_ELASTICITY: f64 = -1.5;

/// Most sensitive elasticity on the internal scale
pub const MIN_ELASTICITY: f64 = -10.0;

/// Distance from -1 inside which the revenue-optimal formula is unstable
pub const UNIT_ELASTIC_BAND: f64 = 0.05;

/// Markup applied to the base price for near unit-elastic demand
pub const UNIT_ELASTIC_MARKUP: f64 = 1.05;

/// Convert a 1-10 sensitivity score to an elasticity
pub fn elasticity_from_sensitivity(sensitivity: f64) -> f64 {
    -(sensitivity / 10.0 * 9.5 + 0.5)
}

/// Inverse of [`elasticity_from_sensitivity`]
pub fn sensitivity_from_elasticity(elasticity: f64) -> f64 {
    (-elasticity - 0.5) / 9.5 * 10.0
}

/// Overall price sensitivity on a 1-10 scale, rescaled from -0.5..-10
pub fn price_sensitivity_score(elasticity: f64) -> f64 {
    let magnitude = (-elasticity).clamp(0.5, 10.0);
    1.0 + (magnitude - 0.5) / 9.5 * 9.0
}

/// Willingness to pay in [0, 2]; 1 at elasticity -5
pub fn willingness_to_pay(elasticity: f64) -> f64 {
    let clamped = elasticity.clamp(MIN_ELASTICITY, 0.0);
    2.0 - 2.0 * clamped / MIN_ELASTICITY
}

/// Expected demand at `price`, never negative
pub fn demand_at(price: f64, base_price: f64, base_demand: f64, elasticity: f64) -> f64 {
    if base_price <= 0.0 {
        return base_demand;
    }
    let relative_change = (price - base_price) / base_price;
    (base_demand * (1.0 + elasticity * relative_change)).max(0.0)
}

/// Revenue-maximising price, floored at `floor`
pub fn optimal_price(base_price: f64, elasticity: f64, floor: f64) -> f64 {
    let price = if (elasticity + 1.0).abs() <= UNIT_ELASTIC_BAND {
        base_price * UNIT_ELASTIC_MARKUP
    } else {
        base_price * (elasticity / (elasticity + 1.0)).abs()
    };
    price.max(floor)
}

/// Price for a segment with the given willingness to pay
pub fn segment_price(base_price: f64, willingness: f64) -> f64 {
    base_price * (0.5 + 0.5 * willingness)
}

impl CustomerSegment {
    /// Build a segment with a fresh id from user input
    pub fn from_input(input: SegmentInput) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            size: input.size,
            price_elasticity: elasticity_from_sensitivity(input.price_sensitivity),
        }
    }

    /// The 1-10 sensitivity score this segment was entered with
    pub fn price_sensitivity(&self) -> f64 {
        sensitivity_from_elasticity(self.price_elasticity)
    }

    pub fn willingness_to_pay(&self) -> f64 {
        willingness_to_pay(self.price_elasticity)
    }
}

/// Adjusted price for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPrice {
    #[ts(as = "String")]
    pub segment_id: Uuid,
    pub segment_name: String,
    pub base_price: f64,
    pub price: f64,
    pub willingness: f64,
    /// Positive for a premium, negative for a discount
    pub adjustment_percent: f64,
    pub is_premium: bool,
}

/// Immutable collection of customer segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerSegmentModel {
    segments: Vec<CustomerSegment>,
}

impl CustomerSegmentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<CustomerSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[CustomerSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CustomerSegment> {
        self.segments.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn add_segment(&self, input: SegmentInput) -> Self {
        let mut segments = self.segments.clone();
        segments.push(CustomerSegment::from_input(input));
        Self { segments }
    }

    /// Replace a segment's inputs, keeping its id
    pub fn update_segment(&self, id: Uuid, input: SegmentInput) -> PricingStrategyResult<Self> {
        let mut segments = self.segments.clone();
        let segment = segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(PricingStrategyError::SegmentNotFound(id))?;

        segment.name = input.name;
        segment.size = input.size;
        segment.price_elasticity = elasticity_from_sensitivity(input.price_sensitivity);

        Ok(Self { segments })
    }

    pub fn remove_segment(&self, id: Uuid) -> PricingStrategyResult<Self> {
        if self.get(id).is_none() {
            return Err(PricingStrategyError::SegmentNotFound(id));
        }
        let segments = self
            .segments
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        Ok(Self { segments })
    }

    /// Size-weighted mean elasticity, or [`DEFAULT_ELASTICITY`] without usable sizes
    pub fn weighted_elasticity(&self) -> f64 {
        let total_size: f64 = self.segments.iter().map(|s| s.size).sum();
        if self.segments.is_empty() || total_size <= 0.0 {
            tracing::debug!(
                segments = self.segments.len(),
                "No segment weight available, using default elasticity"
            );
            return DEFAULT_ELASTICITY;
        }

        let weighted: f64 = self
            .segments
            .iter()
            .map(|s| s.price_elasticity * s.size)
            .sum();
        weighted / total_size
    }

    /// Overall sensitivity on the 1-10 scale
    pub fn price_sensitivity(&self) -> f64 {
        price_sensitivity_score(self.weighted_elasticity())
    }

    pub fn demand_at(&self, price: f64, base_price: f64, base_demand: f64) -> f64 {
        demand_at(price, base_price, base_demand, self.weighted_elasticity())
    }

    pub fn optimal_price(&self, base_price: f64, minimum_viable_price: f64) -> f64 {
        optimal_price(base_price, self.weighted_elasticity(), minimum_viable_price)
    }

    /// One adjusted price per segment relative to `base_price`
    pub fn segment_prices(&self, base_price: f64) -> Vec<SegmentPrice> {
        self.segments
            .iter()
            .map(|segment| {
                let willingness = segment.willingness_to_pay();
                let price = round_currency(segment_price(base_price, willingness));
                let adjustment_percent = if base_price > 0.0 {
                    (price - base_price) / base_price * 100.0
                } else {
                    0.0
                };

                SegmentPrice {
                    segment_id: segment.id,
                    segment_name: segment.name.clone(),
                    base_price,
                    price,
                    willingness,
                    adjustment_percent,
                    is_premium: price > base_price,
                }
            })
            .collect()
    }
}
