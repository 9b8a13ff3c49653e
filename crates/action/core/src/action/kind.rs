//! Action identifiers and the closed set of behavior families.

/// Catalog key for an action definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionId(pub u32);

impl core::fmt::Display for ActionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Behavior family of an action.
///
/// Every catalog entry names one logic; the player instantiates the matching
/// behavior variant when the action is queued.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionLogic {
    /// Switches the tracked target.
    Target,
    /// Moves into range of a target.
    Chase,
    Melee,
    Emote,
    Stunned,
    ChargedShield,
    StealthMode,
    LaunchProjectile,
    /// Projectile launch whose strength grows while the key is held.
    ChargedLaunchProjectile,
    /// Always-hit beam; damage lands after a flight time computed at start.
    RangedFxTargeted,
    /// Strike on every foe around a requested point.
    Aoe,
    /// Data-driven modifier applied to a buffable value while running.
    Buff,
    Trample,
    Revive,
    DashAttack,
}

/// Determines how long an action occupies the blocking slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockingMode {
    /// Blocks for the whole duration.
    #[default]
    EntireDuration,
    /// Blocks until the execution point, then keeps running in the background.
    OnlyDuringExecTime,
}
