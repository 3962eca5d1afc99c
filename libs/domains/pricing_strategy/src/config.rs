use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{MarketPosition, StrategyKind};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or_default};

/// Base weights of each component in the blended "optimal" price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BlendWeights {
    pub cost_plus: f64,
    pub competitor: f64,
    pub value: f64,
    pub elasticity: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            cost_plus: 0.30,
            competitor: 0.25,
            value: 0.25,
            elasticity: 0.20,
        }
    }
}

impl BlendWeights {
    pub fn sum(&self) -> f64 {
        self.cost_plus + self.competitor + self.value + self.elasticity
    }

    /// Scale the weights so they sum to 1.
    ///
    /// Negative weights count as zero; an all-zero set becomes an even split.
    pub fn normalized(&self) -> Self {
        let clamped = Self {
            cost_plus: self.cost_plus.max(0.0),
            competitor: self.competitor.max(0.0),
            value: self.value.max(0.0),
            elasticity: self.elasticity.max(0.0),
        };
        let total = clamped.sum();
        if !total.is_finite() || total <= 0.0 {
            return Self {
                cost_plus: 0.25,
                competitor: 0.25,
                value: 0.25,
                elasticity: 0.25,
            };
        }
        Self {
            cost_plus: clamped.cost_plus / total,
            competitor: clamped.competitor / total,
            value: clamped.value / total,
            elasticity: clamped.elasticity / total,
        }
    }

    /// Weight of a component strategy; the blend itself has none
    pub fn weight(&self, strategy: StrategyKind) -> f64 {
        match strategy {
            StrategyKind::CostPlus => self.cost_plus,
            StrategyKind::Competitor => self.competitor,
            StrategyKind::Value => self.value,
            StrategyKind::Elasticity => self.elasticity,
            StrategyKind::Optimal => 0.0,
        }
    }
}

/// When a component counts as thinly supported, and what weight it shrinks to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinDataPolicy {
    pub min_competitors: usize,
    pub min_value_factors: usize,
    pub min_segments: usize,
    pub shrunk_competitor_weight: f64,
    pub shrunk_value_weight: f64,
    pub shrunk_elasticity_weight: f64,
}

impl Default for ThinDataPolicy {
    fn default() -> Self {
        Self {
            min_competitors: 2,
            min_value_factors: 2,
            min_segments: 1,
            shrunk_competitor_weight: 0.1,
            shrunk_value_weight: 0.1,
            shrunk_elasticity_weight: 0.05,
        }
    }
}

/// Price multipliers for each market position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMultipliers {
    pub budget: f64,
    pub mid_market: f64,
    pub premium: f64,
}

impl PositionMultipliers {
    pub const fn new(budget: f64, mid_market: f64, premium: f64) -> Self {
        Self {
            budget,
            mid_market,
            premium,
        }
    }

    pub fn for_position(&self, position: MarketPosition) -> f64 {
        match position {
            MarketPosition::Budget => self.budget,
            MarketPosition::MidMarket => self.mid_market,
            MarketPosition::Premium => self.premium,
        }
    }
}

/// Tunable constants of the strategy engine
///
/// The defaults are empirically chosen; product owners may override them
/// per deployment (see the `config` feature).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub blend_weights: BlendWeights,
    pub thin_data: ThinDataPolicy,
    pub cost_plus_multipliers: PositionMultipliers,
    pub competitor_multipliers: PositionMultipliers,
    pub value_multipliers: PositionMultipliers,
    /// Reference monthly demand for demand projections
    pub base_demand: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            blend_weights: BlendWeights::default(),
            thin_data: ThinDataPolicy::default(),
            cost_plus_multipliers: PositionMultipliers::new(0.9, 1.0, 1.2),
            competitor_multipliers: PositionMultipliers::new(0.85, 1.0, 1.25),
            value_multipliers: PositionMultipliers::new(0.9, 1.0, 1.15),
            base_demand: 100.0,
        }
    }
}

/// Reads overrides from environment variables, keeping defaults for unset keys:
/// - `PRICING_WEIGHT_COST_PLUS` (default: 0.30)
/// - `PRICING_WEIGHT_COMPETITOR` (default: 0.25)
/// - `PRICING_WEIGHT_VALUE` (default: 0.25)
/// - `PRICING_WEIGHT_ELASTICITY` (default: 0.20)
/// - `PRICING_MIN_COMPETITORS` (default: 2)
/// - `PRICING_MIN_VALUE_FACTORS` (default: 2)
/// - `PRICING_MIN_SEGMENTS` (default: 1)
/// - `PRICING_BASE_DEMAND` (default: 100)
#[cfg(feature = "config")]
impl FromEnv for StrategyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let blend_weights = BlendWeights {
            cost_plus: env_parse_or_default(
                "PRICING_WEIGHT_COST_PLUS",
                defaults.blend_weights.cost_plus,
            )?,
            competitor: env_parse_or_default(
                "PRICING_WEIGHT_COMPETITOR",
                defaults.blend_weights.competitor,
            )?,
            value: env_parse_or_default("PRICING_WEIGHT_VALUE", defaults.blend_weights.value)?,
            elasticity: env_parse_or_default(
                "PRICING_WEIGHT_ELASTICITY",
                defaults.blend_weights.elasticity,
            )?,
        };

        let thin_data = ThinDataPolicy {
            min_competitors: env_parse_or_default(
                "PRICING_MIN_COMPETITORS",
                defaults.thin_data.min_competitors,
            )?,
            min_value_factors: env_parse_or_default(
                "PRICING_MIN_VALUE_FACTORS",
                defaults.thin_data.min_value_factors,
            )?,
            min_segments: env_parse_or_default(
                "PRICING_MIN_SEGMENTS",
                defaults.thin_data.min_segments,
            )?,
            ..defaults.thin_data
        };

        let base_demand = env_parse_or_default("PRICING_BASE_DEMAND", defaults.base_demand)?;

        Ok(Self {
            blend_weights,
            thin_data,
            base_demand,
            ..defaults
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((BlendWeights::default().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_weights_sum_to_one() {
        let weights = BlendWeights {
            cost_plus: 0.30,
            competitor: 0.1,
            value: 0.1,
            elasticity: 0.05,
        };
        let normalized = weights.normalized();
        assert!((normalized.sum() - 1.0).abs() < 1e-12);
        assert!((normalized.cost_plus - 0.30 / 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_degenerate_weights_split_evenly() {
        let weights = BlendWeights {
            cost_plus: 0.0,
            competitor: -1.0,
            value: 0.0,
            elasticity: 0.0,
        };
        let normalized = weights.normalized();
        assert_eq!(normalized.competitor, 0.25);
        assert!((normalized.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_position_multipliers() {
        let config = StrategyConfig::default();
        assert_eq!(
            config.cost_plus_multipliers.for_position(MarketPosition::Premium),
            1.2
        );
        assert_eq!(
            config.competitor_multipliers.for_position(MarketPosition::Budget),
            0.85
        );
        assert_eq!(
            config.value_multipliers.for_position(MarketPosition::MidMarket),
            1.0
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_strategy_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("PRICING_WEIGHT_COST_PLUS", None::<&str>),
                ("PRICING_WEIGHT_COMPETITOR", None::<&str>),
                ("PRICING_WEIGHT_VALUE", None::<&str>),
                ("PRICING_WEIGHT_ELASTICITY", None::<&str>),
                ("PRICING_MIN_COMPETITORS", None::<&str>),
                ("PRICING_MIN_VALUE_FACTORS", None::<&str>),
                ("PRICING_MIN_SEGMENTS", None::<&str>),
                ("PRICING_BASE_DEMAND", None::<&str>),
            ],
            || {
                let config = StrategyConfig::from_env().unwrap();
                assert_eq!(config, StrategyConfig::default());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_strategy_config_from_env_custom() {
        temp_env::with_vars(
            [
                ("PRICING_WEIGHT_COST_PLUS", Some("0.5")),
                ("PRICING_WEIGHT_VALUE", None),
                ("PRICING_MIN_COMPETITORS", Some("4")),
                ("PRICING_BASE_DEMAND", Some("250")),
            ],
            || {
                let config = StrategyConfig::from_env().unwrap();
                assert_eq!(config.blend_weights.cost_plus, 0.5);
                assert_eq!(config.thin_data.min_competitors, 4);
                assert_eq!(config.base_demand, 250.0);
                assert_eq!(config.thin_data.shrunk_value_weight, 0.1);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_strategy_config_from_env_invalid_number() {
        temp_env::with_var("PRICING_WEIGHT_VALUE", Some("lots"), || {
            let err = StrategyConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PRICING_WEIGHT_VALUE"));
        });
    }
}
