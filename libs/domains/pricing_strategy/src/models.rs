use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};
use ts_rs::TS;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Overall value assumed for a competitor with no attribute scores
pub const NEUTRAL_VALUE_SCORE: f64 = 5.0;

/// Kind of business the cost structure describes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    TS,
    Hash,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BusinessType {
    #[default]
    Service,
    Product,
    Subscription,
}

/// Accounting period of an indirect cost
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    TS,
    Hash,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CostPeriod {
    #[default]
    Month,
    Year,
}

impl CostPeriod {
    /// Number of accounting periods per month (a yearly amount counts 1/12)
    pub fn monthly_factor(&self) -> f64 {
        match self {
            CostPeriod::Month => 1.0,
            CostPeriod::Year => 1.0 / 12.0,
        }
    }
}

/// Where the business positions itself relative to the market
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    TS,
    Hash,
)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MarketPosition {
    Budget,
    #[default]
    MidMarket,
    Premium,
}

/// Pricing strategy identifier
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    TS,
    Hash,
)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyKind {
    CostPlus,
    Competitor,
    Value,
    Elasticity,
    #[default]
    Optimal,
}

/// How a recommendation's price was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(tag = "type", content = "strategy", rename_all = "kebab-case")]
pub enum StrategyBasis {
    /// The strategy had enough data to produce its own answer
    #[default]
    Computed,
    /// The strategy lacked data and reused another strategy's answer
    FallenBackTo(StrategyKind),
}

impl StrategyBasis {
    pub fn is_fallback(&self) -> bool {
        matches!(self, StrategyBasis::FallenBackTo(_))
    }
}

/// Per-unit direct cost (materials, packaging, transaction fees)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DirectCost {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

impl DirectCost {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

/// Fixed overhead that is allocated across the expected volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCost {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub period: CostPeriod,
}

impl IndirectCost {
    pub fn new(name: impl Into<String>, amount: f64, period: CostPeriod) -> Self {
        Self {
            name: name.into(),
            amount,
            period,
        }
    }

    /// Amount normalised to one month
    pub fn monthly_amount(&self) -> f64 {
        self.amount * self.period.monthly_factor()
    }
}

/// Labour spent per unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TimeCost {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub rate: f64,
    #[validate(range(min = 0.0))]
    pub hours: f64,
}

impl TimeCost {
    pub fn new(name: impl Into<String>, rate: f64, hours: f64) -> Self {
        Self {
            name: name.into(),
            rate,
            hours,
        }
    }

    pub fn cost(&self) -> f64 {
        self.rate * self.hours
    }
}

/// Raw cost inputs of one offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CostStructure {
    pub business_type: BusinessType,
    pub direct_costs: Vec<DirectCost>,
    pub indirect_costs: Vec<IndirectCost>,
    pub time_costs: Vec<TimeCost>,
    /// Desired margin in [0, 1)
    pub target_margin: f64,
    /// Units sold per month
    pub expected_volume: f64,
}

impl Default for CostStructure {
    fn default() -> Self {
        Self {
            business_type: BusinessType::default(),
            direct_costs: Vec::new(),
            indirect_costs: Vec::new(),
            time_costs: Vec::new(),
            target_margin: 0.3,
            expected_volume: 100.0,
        }
    }
}

/// A competing offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    /// Attribute name to score (1-10)
    #[serde(default)]
    #[validate(custom(function = "validate_attribute_scores"))]
    pub attributes: BTreeMap<String, f64>,
}

impl Competitor {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>, score: f64) -> Self {
        self.attributes.insert(attribute.into(), score);
        self
    }

    /// Mean attribute score, or the neutral score when nothing was rated
    pub fn overall_value(&self) -> f64 {
        if self.attributes.is_empty() {
            return NEUTRAL_VALUE_SCORE;
        }
        let total: f64 = self.attributes.values().sum();
        (total / self.attributes.len() as f64).clamp(1.0, 10.0)
    }
}

fn validate_attribute_scores(attributes: &BTreeMap<String, f64>) -> Result<(), ValidationError> {
    if attributes
        .values()
        .all(|score| (1.0..=10.0).contains(score))
    {
        Ok(())
    } else {
        Err(ValidationError::new("attribute_score_range"))
    }
}

/// A differentiator of the business's own offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValueFactor {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1.0, max = 10.0))]
    pub importance: f64,
    #[validate(range(min = 1.0, max = 10.0))]
    pub score: f64,
}

impl ValueFactor {
    pub fn new(name: impl Into<String>, importance: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            importance,
            score,
        }
    }

    pub fn weighted_score(&self) -> f64 {
        self.importance * self.score
    }
}

/// DTO for creating or replacing a customer segment.
///
/// Sensitivity is the 1-10 scale shown to users; it is converted to an
/// elasticity when the segment is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub size: f64,
    /// Sent as `priceElasticity` on the wire, on the 1-10 sensitivity scale
    #[serde(rename = "priceElasticity", alias = "priceSensitivity")]
    #[validate(range(min = 1.0, max = 10.0))]
    pub price_sensitivity: f64,
}

impl SegmentInput {
    pub fn new(name: impl Into<String>, size: f64, price_sensitivity: f64) -> Self {
        Self {
            name: name.into(),
            size,
            price_sensitivity,
        }
    }
}

/// A customer segment with its elasticity on the internal -10..0 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    /// Relative size, not required to sum to any total
    pub size: f64,
    pub price_elasticity: f64,
}

/// A price suggested by one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceRecommendation {
    pub strategy: StrategyKind,
    pub basis: StrategyBasis,
    /// Infinite when the target margin leaves no viable price
    #[serde(with = "infinite_as_null")]
    #[ts(type = "number | null")]
    pub price: f64,
    pub margin: f64,
    /// Monthly units needed to cover fixed costs; infinite when unreachable
    #[serde(with = "infinite_as_null")]
    #[ts(type = "number | null")]
    pub break_even_volume: f64,
    pub confidence_level: f64,
    pub explanation: String,
}

impl Default for PriceRecommendation {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            basis: StrategyBasis::default(),
            price: 0.0,
            margin: 0.0,
            break_even_volume: f64::INFINITY,
            confidence_level: 0.0,
            explanation: String::new(),
        }
    }
}

/// Round a monetary amount to cents
pub fn round_currency(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

/// Serde adapter writing non-finite floats as `null` and reading `null` back as +inf.
///
/// JSON has no representation for infinity, and an unreachable break-even volume
/// must survive an export/import round trip.
pub mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
