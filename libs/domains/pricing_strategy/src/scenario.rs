//! Saved scenarios
//!
//! A [`Scenario`] freezes the cost structure, market inputs and one
//! recommendation of a [`PricingModel`] under a name. Scenarios hold plain
//! copies, so later changes to a live model never reach a saved scenario.
//! [`ScenarioService`] manages them on top of a [`ScenarioStore`], compares
//! any set of two or more, and moves the whole list in and out as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::config::StrategyConfig;
use crate::error::{PricingStrategyError, PricingStrategyResult};
use crate::models::{CostStructure, PriceRecommendation, StrategyKind};
use crate::pricing::{PricingModel, PricingSnapshot};
use crate::store::ScenarioStore;
use crate::validation::ensure_valid;

/// A named snapshot of pricing inputs and the recommendation they produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub strategy: StrategyKind,
    pub cost_structure: CostStructure,
    pub pricing: PricingSnapshot,
    #[serde(default)]
    pub recommendation: PriceRecommendation,
}

impl Scenario {
    /// Rebuild a live pricing model from this scenario's inputs
    pub fn to_pricing_model(&self, config: StrategyConfig) -> PricingModel {
        PricingModel::from_snapshot(self.cost_structure.clone(), self.pricing.clone(), config)
    }
}

/// DTO for saving the current state of a pricing model
#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateScenario {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub strategy: StrategyKind,
}

impl CreateScenario {
    pub fn new(name: impl Into<String>, strategy: StrategyKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            strategy,
        }
    }
}

/// DTO for renaming or re-describing a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScenario {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl ValueRange {
    fn from_values(values: &[f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Self { min, max, avg }
    }
}

/// The figures of one scenario that take part in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub strategy: StrategyKind,
    pub price: f64,
    pub margin: f64,
    pub confidence_level: f64,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(scenario: &Scenario) -> Self {
        Self {
            id: scenario.id,
            name: scenario.name.clone(),
            strategy: scenario.strategy,
            price: scenario.recommendation.price,
            margin: scenario.recommendation.margin,
            confidence_level: scenario.recommendation.confidence_level,
        }
    }
}

/// `first` minus `second`, absolute and as a percentage of `second`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDifference {
    #[ts(as = "String")]
    pub first_id: Uuid,
    #[ts(as = "String")]
    pub second_id: Uuid,
    pub price_difference: f64,
    pub price_difference_percent: f64,
    pub margin_difference: f64,
    pub margin_difference_percent: f64,
}

impl ScenarioDifference {
    fn between(first: &ScenarioSummary, second: &ScenarioSummary) -> Self {
        let price_difference = first.price - second.price;
        let margin_difference = first.margin - second.margin;
        Self {
            first_id: first.id,
            second_id: second.id,
            price_difference,
            price_difference_percent: percent_of(price_difference, second.price),
            margin_difference,
            margin_difference_percent: percent_of(margin_difference, second.margin),
        }
    }
}

fn percent_of(difference: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        difference / base * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub scenarios: Vec<ScenarioSummary>,
    pub price_range: ValueRange,
    pub margin_range: ValueRange,
    /// One entry per unordered pair, earlier scenario first
    pub differences: Vec<ScenarioDifference>,
}

impl ComparisonResult {
    /// Difference between two compared scenarios in either order
    pub fn difference(&self, first: Uuid, second: Uuid) -> Option<ScenarioDifference> {
        if let Some(stored) = self
            .differences
            .iter()
            .find(|d| d.first_id == first && d.second_id == second)
        {
            return Some(stored.clone());
        }

        // Reverse order: recompute so the percentage uses the right base
        self.differences
            .iter()
            .find(|d| d.first_id == second && d.second_id == first)?;
        let summary = |id: Uuid| self.scenarios.iter().find(|s| s.id == id);
        Some(ScenarioDifference::between(summary(first)?, summary(second)?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub dropped: usize,
}

/// Scenario lifecycle on top of a [`ScenarioStore`]
pub struct ScenarioService<S: ScenarioStore> {
    store: S,
}

impl<S: ScenarioStore> ScenarioService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Save the model's current state; the first scenario saved becomes active
    #[instrument(skip(self, input, model), fields(name = %input.name, strategy = %input.strategy))]
    pub fn create(
        &mut self,
        input: CreateScenario,
        model: &PricingModel,
    ) -> PricingStrategyResult<Scenario> {
        ensure_valid(&input)?;

        let now = Utc::now();
        let scenario = Scenario {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
            strategy: input.strategy,
            cost_structure: model.cost_model().structure().clone(),
            pricing: model.snapshot(),
            recommendation: model.recommendation(input.strategy).clone(),
        };

        self.store.insert(scenario.clone())?;
        if self.store.active_id()?.is_none() {
            self.store.set_active_id(Some(scenario.id))?;
        }

        tracing::info!(id = %scenario.id, price = scenario.recommendation.price, "Scenario created");
        Ok(scenario)
    }

    pub fn get(&self, id: Uuid) -> PricingStrategyResult<Scenario> {
        self.store
            .get(id)?
            .ok_or(PricingStrategyError::ScenarioNotFound(id))
    }

    pub fn list(&self) -> PricingStrategyResult<Vec<Scenario>> {
        self.store.list()
    }

    #[instrument(skip(self, input))]
    pub fn update(&mut self, id: Uuid, input: UpdateScenario) -> PricingStrategyResult<Scenario> {
        ensure_valid(&input)?;

        let mut scenario = self.get(id)?;
        if let Some(name) = input.name {
            scenario.name = name;
        }
        // An empty description clears it
        if let Some(description) = input.description {
            scenario.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        scenario.updated_at = Utc::now();

        if !self.store.update(scenario.clone())? {
            return Err(PricingStrategyError::ScenarioNotFound(id));
        }

        tracing::info!(name = %scenario.name, "Scenario updated");
        Ok(scenario)
    }

    /// Delete a scenario; deleting the active one promotes the first remaining
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: Uuid) -> PricingStrategyResult<Scenario> {
        let removed = self
            .store
            .remove(id)?
            .ok_or(PricingStrategyError::ScenarioNotFound(id))?;

        if self.store.active_id()? == Some(id) {
            let promoted = self.store.list()?.first().map(|s| s.id);
            self.store.set_active_id(promoted)?;
            tracing::info!(promoted = ?promoted, "Active scenario deleted");
        }

        tracing::info!(name = %removed.name, "Scenario deleted");
        Ok(removed)
    }

    pub fn set_active(&mut self, id: Uuid) -> PricingStrategyResult<()> {
        self.get(id)?;
        self.store.set_active_id(Some(id))
    }

    pub fn active(&self) -> PricingStrategyResult<Option<Scenario>> {
        match self.store.active_id()? {
            Some(id) => self.store.get(id),
            None => Ok(None),
        }
    }

    /// Price and margin ranges plus pairwise differences; repeated ids count once
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub fn compare(&self, ids: &[Uuid]) -> PricingStrategyResult<ComparisonResult> {
        let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.len() < 2 {
            return Err(PricingStrategyError::InsufficientScenarios(unique.len()));
        }

        let scenarios = unique
            .iter()
            .map(|id| self.get(*id).map(|s| ScenarioSummary::from(&s)))
            .collect::<PricingStrategyResult<Vec<_>>>()?;

        let prices: Vec<f64> = scenarios.iter().map(|s| s.price).collect();
        let margins: Vec<f64> = scenarios.iter().map(|s| s.margin).collect();

        let mut differences = Vec::new();
        for (i, first) in scenarios.iter().enumerate() {
            for second in &scenarios[i + 1..] {
                differences.push(ScenarioDifference::between(first, second));
            }
        }

        tracing::debug!(pairs = differences.len(), "Scenarios compared");
        Ok(ComparisonResult {
            price_range: ValueRange::from_values(&prices),
            margin_range: ValueRange::from_values(&margins),
            scenarios,
            differences,
        })
    }

    pub fn export_scenarios(&self) -> PricingStrategyResult<Vec<Scenario>> {
        self.list()
    }

    /// The full scenario list as one JSON array
    pub fn export_json(&self) -> PricingStrategyResult<String> {
        Ok(serde_json::to_string_pretty(&self.list()?)?)
    }

    /// Append already-decoded scenarios; nothing is replaced or deduplicated
    pub fn import_scenarios(&mut self, scenarios: Vec<Scenario>) -> PricingStrategyResult<usize> {
        let count = scenarios.len();
        for scenario in scenarios {
            self.store.insert(scenario)?;
        }
        tracing::info!(imported = count, "Scenarios imported");
        Ok(count)
    }

    /// Import a JSON array of scenarios.
    ///
    /// Fails only when the document is not a JSON array; individual records
    /// that cannot be decoded are dropped and counted.
    #[instrument(skip(self, document), fields(bytes = document.len()))]
    pub fn import_json(&mut self, document: &str) -> PricingStrategyResult<ImportSummary> {
        let records: Vec<serde_json::Value> = serde_json::from_str(document)?;
        self.import_records(records)
    }

    pub fn import_records(
        &mut self,
        records: Vec<serde_json::Value>,
    ) -> PricingStrategyResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for record in records {
            match serde_json::from_value::<Scenario>(record) {
                Ok(scenario) => {
                    self.store.insert(scenario)?;
                    summary.imported += 1;
                }
                Err(error) => {
                    tracing::warn!(%error, "Dropping malformed scenario record");
                    summary.dropped += 1;
                }
            }
        }

        tracing::info!(
            imported = summary.imported,
            dropped = summary.dropped,
            "Scenarios imported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostModel;
    use crate::models::{
        Competitor, CostPeriod, DirectCost, IndirectCost, SegmentInput, TimeCost,
    };
    use crate::store::{InMemoryScenarioStore, MockScenarioStore};

    // Cost-plus $28.57
    fn base_model() -> PricingModel {
        PricingModel::new(
            CostModel::default()
                .add_direct_cost(DirectCost::new("Materials", 10.0, "unit"))
                .add_indirect_cost(IndirectCost::new("Rent", 1000.0, CostPeriod::Month))
                .set_expected_volume(100.0)
                .set_target_margin(0.30),
        )
    }

    // Competitor price $35.00
    fn competitive_model() -> PricingModel {
        base_model().add_competitor(Competitor::new("Acme", 35.0))
    }

    fn service_with_pair() -> (ScenarioService<InMemoryScenarioStore>, Uuid, Uuid) {
        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        let a = service
            .create(CreateScenario::new("Cost plus", StrategyKind::CostPlus), &base_model())
            .unwrap();
        let b = service
            .create(
                CreateScenario::new("Match Acme", StrategyKind::Competitor),
                &competitive_model(),
            )
            .unwrap();
        (service, a.id, b.id)
    }

    #[test]
    fn test_create_snapshots_model_and_activates_first() {
        let (service, a, b) = service_with_pair();

        let first = service.get(a).unwrap();
        assert_eq!(first.recommendation.price, 28.57);
        assert_eq!(first.strategy, StrategyKind::CostPlus);
        assert_eq!(first.created_at, first.updated_at);
        assert!(first.pricing.competitors.is_empty());

        let second = service.get(b).unwrap();
        assert_eq!(second.recommendation.price, 35.0);
        assert_eq!(second.pricing.competitors.len(), 1);

        assert_eq!(service.active().unwrap().map(|s| s.id), Some(a));
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        let result = service.create(CreateScenario::new("", StrategyKind::Optimal), &base_model());
        assert!(matches!(result, Err(PricingStrategyError::InvalidInput(_))));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_compare_reference_pair() {
        let (service, a, b) = service_with_pair();
        let result = service.compare(&[a, b]).unwrap();

        assert_eq!(result.price_range.min, 28.57);
        assert_eq!(result.price_range.max, 35.0);
        assert!((result.price_range.avg - 31.785).abs() < 1e-9);
        assert_eq!(result.differences.len(), 1);

        let diff = result.difference(a, b).unwrap();
        assert!((diff.price_difference + 6.43).abs() < 1e-9);
        assert!((diff.price_difference_percent + 18.3714).abs() < 1e-3);
        assert!(diff.margin_difference < 0.0);
    }

    #[test]
    fn test_difference_is_antisymmetric() {
        let (service, a, b) = service_with_pair();
        let result = service.compare(&[a, b]).unwrap();

        let forward = result.difference(a, b).unwrap();
        let backward = result.difference(b, a).unwrap();
        assert_eq!(forward.price_difference, -backward.price_difference);
        assert_eq!(forward.margin_difference, -backward.margin_difference);
        assert_eq!(backward.first_id, b);
        assert!(result.difference(a, Uuid::now_v7()).is_none());
    }

    #[test]
    fn test_compare_covers_every_pair() {
        let (mut service, a, b) = service_with_pair();
        let c = service
            .create(CreateScenario::new("Blend", StrategyKind::Optimal), &competitive_model())
            .unwrap()
            .id;

        let result = service.compare(&[a, b, c, a]).unwrap();
        assert_eq!(result.scenarios.len(), 3);
        assert_eq!(result.differences.len(), 3);
        for (first, second) in [(a, b), (a, c), (b, c)] {
            assert!(result.difference(first, second).is_some());
        }
    }

    #[test]
    fn test_compare_requires_two_known_scenarios() {
        let (service, a, _) = service_with_pair();
        assert!(matches!(
            service.compare(&[a]),
            Err(PricingStrategyError::InsufficientScenarios(1))
        ));
        assert!(matches!(
            service.compare(&[a, a]),
            Err(PricingStrategyError::InsufficientScenarios(1))
        ));

        let unknown = Uuid::now_v7();
        assert!(matches!(
            service.compare(&[a, unknown]),
            Err(PricingStrategyError::ScenarioNotFound(id)) if id == unknown
        ));
    }

    #[test]
    fn test_percentage_against_zero_base_is_zero() {
        let zero = ScenarioSummary {
            id: Uuid::now_v7(),
            name: "Free".to_string(),
            strategy: StrategyKind::CostPlus,
            price: 0.0,
            margin: 0.0,
            confidence_level: 0.8,
        };
        let paid = ScenarioSummary {
            id: Uuid::now_v7(),
            price: 10.0,
            margin: 0.5,
            ..zero.clone()
        };
        let diff = ScenarioDifference::between(&paid, &zero);
        assert_eq!(diff.price_difference, 10.0);
        assert_eq!(diff.price_difference_percent, 0.0);
        assert_eq!(diff.margin_difference_percent, 0.0);
    }

    #[test]
    fn test_update_renames_scenario() {
        let (mut service, a, _) = service_with_pair();
        let before = service.get(a).unwrap();

        let updated = service
            .update(
                a,
                UpdateScenario {
                    name: Some("Floor price".to_string()),
                    description: Some("Never go below this".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Floor price");
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at >= before.updated_at);
        assert_eq!(updated.recommendation, before.recommendation);
        assert_eq!(service.get(a).unwrap(), updated);

        let empty = UpdateScenario {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(a, empty),
            Err(PricingStrategyError::InvalidInput(_))
        ));
        assert!(matches!(
            service.update(Uuid::now_v7(), UpdateScenario::default()),
            Err(PricingStrategyError::ScenarioNotFound(_))
        ));
    }

    #[test]
    fn test_update_with_empty_description_clears_it() {
        let (mut service, a, _) = service_with_pair();
        let described = UpdateScenario {
            description: Some("Launch price".to_string()),
            ..Default::default()
        };
        assert!(service.update(a, described).unwrap().description.is_some());

        let cleared = UpdateScenario {
            description: Some("  ".to_string()),
            ..Default::default()
        };
        let updated = service.update(a, cleared).unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(service.get(a).unwrap().description, None);
    }

    #[test]
    fn test_delete_active_promotes_first_remaining() {
        let (mut service, a, b) = service_with_pair();

        service.delete(a).unwrap();
        assert_eq!(service.active().unwrap().map(|s| s.id), Some(b));

        service.delete(b).unwrap();
        assert!(service.active().unwrap().is_none());
        assert!(matches!(
            service.delete(b),
            Err(PricingStrategyError::ScenarioNotFound(_))
        ));
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let (mut service, a, b) = service_with_pair();
        service.set_active(b).unwrap();
        service.delete(a).unwrap();
        assert_eq!(service.active().unwrap().map(|s| s.id), Some(b));
        assert!(service.set_active(a).is_err());
    }

    #[test]
    fn test_scenario_is_isolated_from_later_model_changes() {
        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        let model = competitive_model();
        let saved = service
            .create(CreateScenario::new("Before", StrategyKind::Optimal), &model)
            .unwrap();

        let _changed = model
            .remove_competitor(0)
            .add_segment(SegmentInput::new("Students", 40.0, 9.0));

        let stored = service.get(saved.id).unwrap();
        assert_eq!(stored, saved);
        assert_eq!(stored.pricing.competitors.len(), 1);
        assert!(stored.pricing.segments.is_empty());
    }

    #[test]
    fn test_scenario_rebuilds_pricing_model() {
        let (service, _, b) = service_with_pair();
        let scenario = service.get(b).unwrap();
        let model = scenario.to_pricing_model(StrategyConfig::default());
        assert_eq!(model.recommendation(scenario.strategy), &scenario.recommendation);
    }

    #[test]
    fn test_export_import_round_trip() {
        let (service, _, _) = service_with_pair();
        let document = service.export_json().unwrap();

        let mut restored = ScenarioService::new(InMemoryScenarioStore::new());
        let summary = restored.import_json(&document).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, dropped: 0 });
        assert_eq!(restored.list().unwrap(), service.list().unwrap());
        // Import does not pick an active scenario
        assert!(restored.active().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_keeps_non_terminating_figures() {
        // Overhead of 2300 over 1200 units gives long decimal expansions
        let model = PricingModel::new(
            CostModel::default()
                .add_direct_cost(DirectCost::new("Flour", 3.0, "loaf"))
                .add_time_cost(TimeCost::new("Baking", 24.0, 0.25))
                .add_indirect_cost(IndirectCost::new("Rent", 1800.0, CostPeriod::Month))
                .add_indirect_cost(IndirectCost::new("Oven", 6000.0, CostPeriod::Year))
                .set_expected_volume(1200.0)
                .set_target_margin(0.35),
        )
        .add_competitor(Competitor::new("Corner Bakery", 11.0).with_attribute("taste", 6.0))
        .add_competitor(Competitor::new("Artisan Co", 14.0).with_attribute("taste", 9.0))
        .add_segment(SegmentInput::new("Regulars", 60.0, 3.0));

        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        for strategy in [StrategyKind::Optimal, StrategyKind::Elasticity] {
            service
                .create(CreateScenario::new(strategy.to_string(), strategy), &model)
                .unwrap();
        }
        let saved = service.list().unwrap();
        assert!(saved.iter().all(|s| s.recommendation.break_even_volume.is_finite()));

        let mut restored = ScenarioService::new(InMemoryScenarioStore::new());
        restored.import_json(&service.export_json().unwrap()).unwrap();
        let imported = restored.list().unwrap();
        for (before, after) in saved.iter().zip(&imported) {
            assert_eq!(
                after.recommendation.margin.to_bits(),
                before.recommendation.margin.to_bits()
            );
            assert_eq!(
                after.recommendation.break_even_volume.to_bits(),
                before.recommendation.break_even_volume.to_bits()
            );
        }
        assert_eq!(imported, saved);
    }

    #[test]
    fn test_infinite_price_survives_export() {
        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        let unreachable = base_model().with_cost_model(
            base_model().cost_model().set_target_margin(1.0),
        );
        let saved = service
            .create(CreateScenario::new("All margin", StrategyKind::CostPlus), &unreachable)
            .unwrap();
        assert!(saved.recommendation.price.is_infinite());

        let mut restored = ScenarioService::new(InMemoryScenarioStore::new());
        let summary = restored.import_json(&service.export_json().unwrap()).unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, dropped: 0 });
        let imported = &restored.list().unwrap()[0];
        assert!(imported.recommendation.price.is_infinite());
        assert_eq!(imported.cost_structure.target_margin, 1.0);
    }

    #[test]
    fn test_import_is_additive() {
        let (mut service, _, _) = service_with_pair();
        let exported = service.export_scenarios().unwrap();
        assert_eq!(service.import_scenarios(exported.clone()).unwrap(), 2);

        let all = service.list().unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(&all[2..], exported.as_slice());
    }

    #[test]
    fn test_import_drops_incomplete_records() {
        let (service, a, _) = service_with_pair();
        let scenario = service.get(a).unwrap();

        let complete = serde_json::to_value(&scenario).unwrap();
        let mut missing_pricing = complete.clone();
        missing_pricing.as_object_mut().unwrap().remove("pricing");
        let mut missing_id = complete.clone();
        missing_id.as_object_mut().unwrap().remove("id");
        let document = serde_json::json!([complete, missing_pricing, missing_id, "garbage"]);

        let mut target = ScenarioService::new(InMemoryScenarioStore::new());
        let summary = target.import_json(&document.to_string()).unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, dropped: 3 });
        assert_eq!(target.list().unwrap(), vec![scenario]);
    }

    #[test]
    fn test_import_rejects_non_array_document() {
        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        assert!(matches!(
            service.import_json("{\"id\": 1}"),
            Err(PricingStrategyError::Serialization(_))
        ));
        assert!(matches!(
            service.import_json("not json"),
            Err(PricingStrategyError::Serialization(_))
        ));
    }

    #[test]
    fn test_infinite_break_even_survives_export() {
        let mut service = ScenarioService::new(InMemoryScenarioStore::new());
        let unprofitable = base_model().with_cost_model(
            base_model().cost_model().set_target_margin(0.0),
        );
        let saved = service
            .create(CreateScenario::new("At cost", StrategyKind::CostPlus), &unprofitable)
            .unwrap();
        assert!(saved.recommendation.break_even_volume.is_infinite());

        let document = service.export_json().unwrap();
        assert!(document.contains("\"breakEvenVolume\": null"));

        let mut restored = ScenarioService::new(InMemoryScenarioStore::new());
        restored.import_json(&document).unwrap();
        assert!(restored.list().unwrap()[0].recommendation.break_even_volume.is_infinite());
    }

    #[test]
    fn test_get_missing_scenario_with_mock_store() {
        let mut store = MockScenarioStore::new();
        store.expect_get().returning(|_| Ok(None));

        let service = ScenarioService::new(store);
        let id = Uuid::now_v7();
        assert!(matches!(
            service.get(id),
            Err(PricingStrategyError::ScenarioNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_create_keeps_existing_active_with_mock_store() {
        let existing = Uuid::now_v7();
        let mut store = MockScenarioStore::new();
        store.expect_insert().times(1).returning(|_| Ok(()));
        store
            .expect_active_id()
            .times(1)
            .returning(move || Ok(Some(existing)));
        store.expect_set_active_id().never();

        let mut service = ScenarioService::new(store);
        let scenario = service
            .create(CreateScenario::new("Second", StrategyKind::Value), &base_model())
            .unwrap();
        assert!(scenario.recommendation.basis.is_fallback());
    }
}
