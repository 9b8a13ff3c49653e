//! Map-backed [`ActionOracle`] implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::action::{ActionConfig, ActionId, ActionLogic};
use crate::error::CatalogError;

use super::{ActionOracle, ReservedActions};

/// In-memory action catalog.
///
/// Configs are stored behind `Arc` so running instances can hold on to their
/// definition without borrowing the catalog.
#[derive(Clone, Debug)]
pub struct ActionCatalog {
    actions: HashMap<ActionId, Arc<ActionConfig>>,
    reserved: ReservedActions,
}

impl ActionCatalog {
    pub fn new(reserved: ReservedActions) -> Self {
        Self {
            actions: HashMap::new(),
            reserved,
        }
    }

    /// Builds and validates a catalog in one step.
    pub fn from_configs(
        reserved: ReservedActions,
        configs: impl IntoIterator<Item = ActionConfig>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(reserved);
        for config in configs {
            let id = config.id;
            if catalog.insert(config).is_some() {
                return Err(CatalogError::DuplicateAction { id });
            }
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Inserts or replaces a definition, returning the previous one.
    pub fn insert(&mut self, config: ActionConfig) -> Option<Arc<ActionConfig>> {
        self.actions.insert(config.id, Arc::new(config))
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionConfig> {
        self.actions.get(&id).map(Arc::as_ref)
    }

    /// Returns all registered ids in ascending order.
    pub fn ids(&self) -> Vec<ActionId> {
        let mut ids: Vec<_> = self.actions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Checks the reserved ids and per-action timing.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let reserved = [
            ("acquire target", self.reserved.acquire_target, ActionLogic::Target),
            ("move to target", self.reserved.move_to_target, ActionLogic::Chase),
            ("stunned", self.reserved.stunned, ActionLogic::Stunned),
        ];
        for (role, id, expected) in reserved {
            let config = self
                .get(id)
                .ok_or(CatalogError::MissingReservedAction { role, id })?;
            if config.logic != expected {
                return Err(CatalogError::ReservedLogicMismatch {
                    role,
                    id,
                    expected,
                    found: config.logic,
                });
            }
        }

        for id in self.ids() {
            let Some(config) = self.get(id) else { continue };
            let timings = [
                ("duration_seconds", config.duration_seconds),
                ("exec_time_seconds", config.exec_time_seconds),
                ("effect_duration_seconds", config.effect_duration_seconds),
                ("reuse_time_seconds", config.reuse_time_seconds),
            ];
            if let Some((field, value)) = timings.into_iter().find(|(_, value)| *value < 0.0) {
                return Err(CatalogError::NegativeTiming { id, field, value });
            }
            if config.can_be_interrupted_by(id) {
                return Err(CatalogError::SelfInterrupt { id });
            }
        }
        Ok(())
    }
}

impl ActionOracle for ActionCatalog {
    fn action_config(&self, id: ActionId) -> Option<Arc<ActionConfig>> {
        self.actions.get(&id).cloned()
    }

    fn reserved(&self) -> ReservedActions {
        self.reserved
    }
}
