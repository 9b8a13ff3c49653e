//! Action catalog loader.
//!
//! A catalog file names the reserved ids and lists action definitions:
//!
//! ```ron
//! (
//!     reserved: (acquire_target: 1, move_to_target: 2, stunned: 3),
//!     actions: [
//!         (id: 1, name: "general_target", logic: Target, blocking_mode: OnlyDuringExecTime),
//!     ],
//! )
//! ```
//!
//! Omitted action fields take their `ActionConfig::default()` values.

use std::path::Path;

use action_core::{ActionCatalog, ActionConfig, ReservedActions};

use crate::loaders::{LoadResult, read_file};

/// On-disk shape of a catalog.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct CatalogFile {
    pub reserved: ReservedActions,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

/// Loader for action catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ActionCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse and validate a catalog. `source` only labels error messages.
    pub fn parse(content: &str, source: &str) -> LoadResult<ActionCatalog> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", source, e))?;
        Self::build(file.reserved, file.actions, source)
    }

    /// Parse a bare list of action definitions.
    pub fn parse_actions(content: &str, source: &str) -> LoadResult<Vec<ActionConfig>> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", source, e))
    }

    fn build(
        reserved: ReservedActions,
        actions: Vec<ActionConfig>,
        source: &str,
    ) -> LoadResult<ActionCatalog> {
        let catalog = ActionCatalog::from_configs(reserved, actions)
            .map_err(|e| anyhow::anyhow!("Invalid action catalog {}: {}", source, e))?;
        tracing::debug!(source, actions = catalog.len(), "loaded action catalog");
        Ok(catalog)
    }
}

/// Loads the action catalog embedded in this crate.
pub fn load_default_catalog() -> LoadResult<ActionCatalog> {
    // Reserved ids and the actions the engine synthesizes on its own
    let reserved_ron = include_str!("../../data/actions/reserved.ron");
    let file: CatalogFile = ron::from_str(reserved_ron)
        .map_err(|e| anyhow::anyhow!("Failed to parse reserved.ron: {}", e))?;
    let mut actions = file.actions;

    // Attacks (melee, trample, dash, projectiles)
    let combat_ron = include_str!("../../data/actions/combat.ron");
    actions.extend(CatalogLoader::parse_actions(combat_ron, "combat.ron")?);

    // Defensive, utility and social actions
    let support_ron = include_str!("../../data/actions/support.ron");
    actions.extend(CatalogLoader::parse_actions(support_ron, "support.ron")?);

    CatalogLoader::build(file.reserved, actions, "default catalog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_core::{
        ActionId, ActionLogic, ActionOracle, BlockingMode, BuffModifier, BuffableValue,
    };

    #[test]
    fn default_catalog_covers_every_logic() {
        let catalog = load_default_catalog().expect("Failed to load default catalog");

        let reserved = catalog.reserved();
        assert_eq!(catalog.get(reserved.acquire_target).map(|c| c.logic), Some(ActionLogic::Target));
        assert_eq!(catalog.get(reserved.move_to_target).map(|c| c.logic), Some(ActionLogic::Chase));
        assert_eq!(catalog.get(reserved.stunned).map(|c| c.logic), Some(ActionLogic::Stunned));

        let logics: Vec<_> = catalog
            .ids()
            .into_iter()
            .filter_map(|id| catalog.get(id).map(|c| c.logic))
            .collect();
        for logic in [
            ActionLogic::Melee,
            ActionLogic::Emote,
            ActionLogic::ChargedShield,
            ActionLogic::StealthMode,
            ActionLogic::LaunchProjectile,
            ActionLogic::ChargedLaunchProjectile,
            ActionLogic::RangedFxTargeted,
            ActionLogic::Aoe,
            ActionLogic::Buff,
            ActionLogic::Trample,
            ActionLogic::Revive,
            ActionLogic::DashAttack,
        ] {
            assert!(logics.contains(&logic), "no {logic} action in default catalog");
        }
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let catalog = CatalogLoader::parse(
            r#"(
                reserved: (acquire_target: 1, move_to_target: 2, stunned: 3),
                actions: [
                    (id: 1, name: "target", logic: Target, blocking_mode: OnlyDuringExecTime),
                    (id: 2, name: "chase", logic: Chase),
                    (id: 3, name: "stunned", logic: Stunned, duration_seconds: 2.0, amount: 2),
                    (
                        id: 7,
                        name: "rally",
                        logic: Buff,
                        duration_seconds: 4.0,
                        buff: Some((value: PercentDamageReceived, modifier: Multiply(0.5))),
                    ),
                ],
            )"#,
            "inline",
        )
        .unwrap();

        let chase = catalog.get(ActionId(2)).unwrap();
        assert_eq!(chase.blocking_mode, BlockingMode::EntireDuration);
        assert_eq!(chase.duration_seconds, 0.0);
        assert!(!chase.action_interruptible);

        let rally = catalog.get(ActionId(7)).unwrap();
        let buff = rally.buff.unwrap();
        assert_eq!(buff.value, BuffableValue::PercentDamageReceived);
        assert_eq!(buff.modifier, BuffModifier::Multiply(0.5));
    }

    #[test]
    fn invalid_catalog_reports_source() {
        // reserved stunned id is missing
        let err = CatalogLoader::parse(
            r#"(
                reserved: (acquire_target: 1, move_to_target: 2, stunned: 3),
                actions: [
                    (id: 1, name: "target", logic: Target),
                    (id: 2, name: "chase", logic: Chase),
                ],
            )"#,
            "broken.ron",
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid action catalog broken.ron"), "{message}");

        let err = CatalogLoader::parse("(reserved: ", "truncated.ron").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse truncated.ron"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.ron");
        std::fs::write(&path, include_str!("../../data/actions/reserved.ron")).unwrap();

        let catalog = CatalogLoader::load(&path).unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
