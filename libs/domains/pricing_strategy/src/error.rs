use thiserror::Error;
use uuid::Uuid;

/// Result type for pricing strategy operations
pub type PricingStrategyResult<T> = Result<T, PricingStrategyError>;

/// Errors that can occur in the pricing strategy domain
///
/// Degenerate arithmetic (zero volume, thin competitor data, prices below cost)
/// never produces an error; those paths resolve to sentinel values instead.
#[derive(Debug, Error)]
pub enum PricingStrategyError {
    /// Scenario not found
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(Uuid),

    /// Customer segment not found
    #[error("Customer segment not found: {0}")]
    SegmentNotFound(Uuid),

    /// Comparison needs at least two scenarios
    #[error("At least 2 scenarios are required for a comparison, got {0}")]
    InsufficientScenarios(usize),

    /// Margin is undefined for a non-positive price
    #[error("Margin is undefined at price {0}")]
    UndefinedMargin(f64),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scenario document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for PricingStrategyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PricingStrategyError::InvalidInput(errors.to_string())
    }
}
