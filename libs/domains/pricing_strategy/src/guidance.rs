//! Implementation guidance for a chosen strategy

use serde::{Deserialize, Serialize};
use strum::Display;
use ts_rs::TS;

use crate::models::StrategyKind;
use crate::segment::CustomerSegmentModel;
use crate::strategy::StrategyRecommendations;

/// Sensitivity (1-10) above which tiered offerings are suggested
pub const TIERED_SENSITIVITY_THRESHOLD: f64 = 7.0;

/// Premium of the optimal over the cost-plus price that calls for stronger proof points
pub const PROOF_POINT_PREMIUM: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, TS, Hash)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GuidanceStepKind {
    DocumentValueProposition,
    HighlightDifferentiators,
    TieredOfferings,
    SegmentSpecificPricing,
    StrengthenProofPoints,
    TestWithSmallCohort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceStep {
    pub kind: GuidanceStepKind,
    pub title: String,
    pub detail: String,
}

impl GuidanceStep {
    fn new(kind: GuidanceStepKind, title: &str, detail: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationGuidance {
    pub strategy: StrategyKind,
    pub price: f64,
    /// Overall price sensitivity of the customer base (1-10)
    pub price_sensitivity: f64,
    pub steps: Vec<GuidanceStep>,
}

impl ImplementationGuidance {
    pub fn has_step(&self, kind: GuidanceStepKind) -> bool {
        self.steps.iter().any(|s| s.kind == kind)
    }
}

pub(crate) fn build_guidance(
    strategy: StrategyKind,
    recommendations: &StrategyRecommendations,
    segments: &CustomerSegmentModel,
) -> ImplementationGuidance {
    let chosen = recommendations.get(strategy);
    let sensitivity = segments.price_sensitivity();
    let mut steps = vec![GuidanceStep::new(
        GuidanceStepKind::DocumentValueProposition,
        "Document your value proposition",
        format!(
            "Write down why a customer should pay ${:.2}: the outcomes you deliver and what they \
             would cost to obtain elsewhere.",
            chosen.price
        ),
    )];

    if strategy == StrategyKind::Value {
        steps.push(GuidanceStep::new(
            GuidanceStepKind::HighlightDifferentiators,
            "Highlight your differentiators",
            "Lead sales material with the value factors you scored highest; value pricing only \
             holds while customers can see the difference."
                .to_string(),
        ));
    }

    if sensitivity > TIERED_SENSITIVITY_THRESHOLD || !segments.is_empty() {
        steps.push(GuidanceStep::new(
            GuidanceStepKind::TieredOfferings,
            "Offer tiered packages",
            format!(
                "With a price sensitivity of {sensitivity:.1}/10, give price-conscious buyers an \
                 entry tier while keeping a premium tier for the rest."
            ),
        ));
    }

    if !segments.is_empty() {
        steps.push(GuidanceStep::new(
            GuidanceStepKind::SegmentSpecificPricing,
            "Price by segment",
            format!(
                "Apply segment-specific prices or discounts across your {} customer segment(s).",
                segments.len()
            ),
        ));
    }

    let cost_plus = recommendations.cost_plus.price;
    let optimal = recommendations.optimal.price;
    if optimal > cost_plus * (1.0 + PROOF_POINT_PREMIUM) {
        steps.push(GuidanceStep::new(
            GuidanceStepKind::StrengthenProofPoints,
            "Strengthen proof points",
            format!(
                "The recommended ${optimal:.2} sits more than {:.0}% above the cost-plus price of \
                 ${cost_plus:.2}; back it with testimonials, case studies or guarantees.",
                PROOF_POINT_PREMIUM * 100.0
            ),
        ));
    }

    steps.push(GuidanceStep::new(
        GuidanceStepKind::TestWithSmallCohort,
        "Test with a small cohort",
        "Roll the new price out to a small group of customers first and measure conversion \
         before a full launch."
            .to_string(),
    ));

    ImplementationGuidance {
        strategy,
        price: chosen.price,
        price_sensitivity: sensitivity,
        steps,
    }
}
