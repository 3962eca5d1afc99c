//! Pricing Strategy Domain
//!
//! Turns cost inputs, competitor prices, value scores and customer segments
//! into price recommendations, and saves them as comparable scenarios.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ ScenarioService │  ← Named snapshots, comparison, JSON import/export
//! └────────┬────────┘
//!          │ snapshot
//! ┌────────▼────────┐
//! │  PricingModel   │  ← Strategies, blended price, guidance
//! └───┬─────────┬───┘
//!     │         │
//! ┌───▼───┐ ┌───▼──────────────────┐
//! │ Cost  │ │ CustomerSegmentModel │  ← Allocation / elasticity math
//! └───────┘ └──────────────────────┘
//! ```
//!
//! Every model is immutable: setters return a new value with its derived
//! figures already recomputed. The crate performs no I/O; scenarios live in
//! a [`ScenarioStore`] supplied by the caller.

pub mod config;
pub mod cost;
pub mod error;
pub mod guidance;
pub mod models;
pub mod pricing;
pub mod scenario;
pub mod segment;
pub mod store;
pub mod strategy;
pub mod validation;

// Re-export commonly used types
pub use config::{BlendWeights, PositionMultipliers, StrategyConfig, ThinDataPolicy};
pub use cost::{CostBreakdown, CostModel, ProfitProjection};
pub use error::{PricingStrategyError, PricingStrategyResult};
pub use guidance::{GuidanceStep, GuidanceStepKind, ImplementationGuidance};
pub use models::{
    BusinessType, Competitor, CostPeriod, CostStructure, CustomerSegment, DirectCost,
    IndirectCost, MarketPosition, PriceRecommendation, SegmentInput, StrategyBasis, StrategyKind,
    TimeCost, ValueFactor,
};
pub use pricing::{PricingModel, PricingSnapshot};
pub use scenario::{
    ComparisonResult, CreateScenario, ImportSummary, Scenario, ScenarioDifference,
    ScenarioService, ScenarioSummary, UpdateScenario, ValueRange,
};
pub use segment::{CustomerSegmentModel, SegmentPrice};
pub use store::{InMemoryScenarioStore, ScenarioStore};
pub use strategy::StrategyRecommendations;
