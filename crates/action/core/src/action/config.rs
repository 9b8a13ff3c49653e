//! Static, catalog-owned description of an action.

use super::buff::BuffEffect;
use super::kind::{ActionId, ActionLogic, BlockingMode};

/// Projectile spawned by the projectile-launching logics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileInfo {
    /// Content key of the projectile prefab; opaque to the engine.
    pub prefab: String,
    pub speed: f32,
    pub range: f32,
    pub damage: i32,
    /// How many entities it may pass through before despawning.
    pub max_victims: u32,
}

impl Default for ProjectileInfo {
    fn default() -> Self {
        Self {
            prefab: String::new(),
            speed: 10.0,
            range: 10.0,
            damage: 0,
            max_victims: 1,
        }
    }
}

/// Static configuration for one catalog entry.
///
/// Timing fields are in simulated seconds. A non-positive `duration_seconds`
/// means the action never expires on its own and runs until its logic ends it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionConfig {
    pub id: ActionId,
    pub name: String,
    pub logic: ActionLogic,

    /// Logic-specific magnitude: damage, heal, stun multiplier, chase range.
    pub amount: i32,
    pub range: f32,
    pub radius: f32,

    pub duration_seconds: f32,
    pub exec_time_seconds: f32,
    pub effect_duration_seconds: f32,
    pub reuse_time_seconds: f32,
    pub blocking_mode: BlockingMode,

    /// Whether any new non-queued action may preempt this one, and whether
    /// starting it stops the character's movement.
    pub action_interruptible: bool,
    /// Actions allowed to preempt this one even when it is not interruptible.
    pub interruptible_by: Vec<ActionId>,

    pub splash_damage: i32,
    pub move_speed: f32,
    pub knockback_speed: f32,
    pub knockback_duration: f32,
    pub is_friendly: bool,

    pub anim: Option<String>,
    pub anim2: Option<String>,
    pub react_anim: Option<String>,

    pub projectiles: Vec<ProjectileInfo>,
    pub buff: Option<BuffEffect>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            id: ActionId(0),
            name: String::new(),
            logic: ActionLogic::Emote,
            amount: 0,
            range: 0.0,
            radius: 0.0,
            duration_seconds: 0.0,
            exec_time_seconds: 0.0,
            effect_duration_seconds: 0.0,
            reuse_time_seconds: 0.0,
            blocking_mode: BlockingMode::EntireDuration,
            action_interruptible: false,
            interruptible_by: Vec::new(),
            splash_damage: 0,
            move_speed: 0.0,
            knockback_speed: 0.0,
            knockback_duration: 0.0,
            is_friendly: false,
            anim: None,
            anim2: None,
            react_anim: None,
            projectiles: Vec::new(),
            buff: None,
        }
    }
}

impl ActionConfig {
    pub fn new(id: ActionId, name: impl Into<String>, logic: ActionLogic) -> Self {
        Self {
            id,
            name: name.into(),
            logic,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timing(mut self, duration_seconds: f32, exec_time_seconds: f32) -> Self {
        self.duration_seconds = duration_seconds;
        self.exec_time_seconds = exec_time_seconds;
        self
    }

    #[must_use]
    pub fn with_blocking_mode(mut self, mode: BlockingMode) -> Self {
        self.blocking_mode = mode;
        self
    }

    #[must_use]
    pub fn with_reuse_time(mut self, reuse_time_seconds: f32) -> Self {
        self.reuse_time_seconds = reuse_time_seconds;
        self
    }

    #[must_use]
    pub fn with_effect_duration(mut self, effect_duration_seconds: f32) -> Self {
        self.effect_duration_seconds = effect_duration_seconds;
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn interruptible(mut self, interruptible: bool) -> Self {
        self.action_interruptible = interruptible;
        self
    }

    #[must_use]
    pub fn with_interruptible_by(mut self, ids: impl IntoIterator<Item = ActionId>) -> Self {
        self.interruptible_by = ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_anims(mut self, anim: Option<&str>, anim2: Option<&str>) -> Self {
        self.anim = anim.map(str::to_owned);
        self.anim2 = anim2.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_buff(mut self, buff: BuffEffect) -> Self {
        self.buff = Some(buff);
        self
    }

    #[must_use]
    pub fn with_projectile(mut self, projectile: ProjectileInfo) -> Self {
        self.projectiles.push(projectile);
        self
    }

    /// Returns true if `other` is explicitly allowed to preempt this action.
    pub fn can_be_interrupted_by(&self, other: ActionId) -> bool {
        self.interruptible_by.contains(&other)
    }

    /// Seconds this action is expected to hold the blocking slot.
    pub fn blocking_estimate(&self) -> f32 {
        match self.blocking_mode {
            BlockingMode::OnlyDuringExecTime => self.exec_time_seconds,
            BlockingMode::EntireDuration => self.duration_seconds,
        }
    }

    /// Returns true when the action leaves the blocking slot as soon as it starts.
    pub fn is_instant_non_blocking(&self) -> bool {
        self.blocking_mode == BlockingMode::OnlyDuringExecTime && self.exec_time_seconds == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_estimate_follows_mode() {
        let config = ActionConfig::new(ActionId(1), "swing", ActionLogic::Melee).with_timing(1.5, 0.5);
        assert_eq!(config.blocking_estimate(), 1.5);

        let config = config.with_blocking_mode(BlockingMode::OnlyDuringExecTime);
        assert_eq!(config.blocking_estimate(), 0.5);
    }

    #[test]
    fn interrupt_list_is_checked_by_id() {
        let config = ActionConfig::new(ActionId(3), "shield", ActionLogic::ChargedShield)
            .with_interruptible_by([ActionId(9)]);

        assert!(config.can_be_interrupted_by(ActionId(9)));
        assert!(!config.can_be_interrupted_by(ActionId(4)));
    }

    #[test]
    fn zero_exec_only_during_exec_is_instantly_non_blocking() {
        let config = ActionConfig::new(ActionId(2), "target", ActionLogic::Target)
            .with_blocking_mode(BlockingMode::OnlyDuringExecTime);
        assert!(config.is_instant_non_blocking());
        assert!(!config.with_timing(0.0, 0.25).is_instant_non_blocking());
    }
}
