use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{
    StatusError,
    StatusResult,
};
use crate::provider::{
    StatusParams,
    StatusProvider,
};
use crate::types::StatusCategory;

/// Constructor for a status provider over a shared context `C`
pub type ProviderFactory<C> = fn(Arc<C>, StatusParams) -> Box<dyn StatusProvider>;

/// Status registry - maps category names to provider constructors
pub struct StatusRegistry<C> {
    factories: HashMap<StatusCategory, ProviderFactory<C>>,
}

impl<C> StatusRegistry<C> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a provider constructor for a category
    pub fn register(&mut self, category: StatusCategory, factory: ProviderFactory<C>) {
        self.factories.insert(category, factory);
    }

    /// Build the provider for a category
    pub fn create(
        &self, category: StatusCategory, context: Arc<C>, params: StatusParams,
    ) -> StatusResult<Box<dyn StatusProvider>> {
        let factory = self
            .factories
            .get(&category)
            .ok_or_else(|| StatusError::UnknownCategory(category.to_string()))?;
        Ok(factory(context, params))
    }

    /// Build the provider for a category name such as `"quota-usage"`
    pub fn create_by_name(
        &self, name: &str, context: Arc<C>, params: StatusParams,
    ) -> StatusResult<Box<dyn StatusProvider>> {
        let category = name
            .parse::<StatusCategory>()
            .map_err(|_| StatusError::UnknownCategory(name.to_string()))?;
        self.create(category, context, params)
    }

    /// Registered categories, in dispatch-table order
    pub fn categories(&self) -> Vec<StatusCategory> {
        StatusCategory::ALL
            .iter()
            .copied()
            .filter(|category| self.factories.contains_key(category))
            .collect()
    }

    /// Get count of registered categories
    pub fn count(&self) -> usize {
        self.factories.len()
    }
}

impl<C> Default for StatusRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
