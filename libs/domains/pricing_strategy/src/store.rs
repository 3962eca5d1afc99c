use uuid::Uuid;

use crate::error::PricingStrategyResult;
use crate::scenario::Scenario;

/// Storage trait for saved scenarios
///
/// Durability is up to the implementation; the engine only needs list order,
/// lookup by id and a single active-scenario slot.
#[cfg_attr(test, mockall::automock)]
pub trait ScenarioStore {
    /// All scenarios in insertion order
    fn list(&self) -> PricingStrategyResult<Vec<Scenario>>;

    /// Get a scenario by ID
    fn get(&self, id: Uuid) -> PricingStrategyResult<Option<Scenario>>;

    /// Append a scenario
    fn insert(&mut self, scenario: Scenario) -> PricingStrategyResult<()>;

    /// Replace the scenario with the same ID; false when none exists
    fn update(&mut self, scenario: Scenario) -> PricingStrategyResult<bool>;

    /// Remove a scenario by ID, returning it
    fn remove(&mut self, id: Uuid) -> PricingStrategyResult<Option<Scenario>>;

    fn active_id(&self) -> PricingStrategyResult<Option<Uuid>>;

    fn set_active_id(&mut self, id: Option<Uuid>) -> PricingStrategyResult<()>;
}

/// Vec-backed store; the default for callers that persist elsewhere
#[derive(Debug, Clone, Default)]
pub struct InMemoryScenarioStore {
    scenarios: Vec<Scenario>,
    active: Option<Uuid>,
}

impl InMemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for InMemoryScenarioStore {
    fn list(&self) -> PricingStrategyResult<Vec<Scenario>> {
        Ok(self.scenarios.clone())
    }

    fn get(&self, id: Uuid) -> PricingStrategyResult<Option<Scenario>> {
        Ok(self.scenarios.iter().find(|s| s.id == id).cloned())
    }

    fn insert(&mut self, scenario: Scenario) -> PricingStrategyResult<()> {
        self.scenarios.push(scenario);
        Ok(())
    }

    fn update(&mut self, scenario: Scenario) -> PricingStrategyResult<bool> {
        match self.scenarios.iter_mut().find(|s| s.id == scenario.id) {
            Some(existing) => {
                *existing = scenario;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self, id: Uuid) -> PricingStrategyResult<Option<Scenario>> {
        let position = self.scenarios.iter().position(|s| s.id == id);
        Ok(position.map(|index| self.scenarios.remove(index)))
    }

    fn active_id(&self) -> PricingStrategyResult<Option<Uuid>> {
        Ok(self.active)
    }

    fn set_active_id(&mut self, id: Option<Uuid>) -> PricingStrategyResult<()> {
        self.active = id;
        Ok(())
    }
}
