//! Shared values that running actions may modify, and the gameplay events they react to.

/// A gameplay value that running actions can adjust through `buff_value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffableValue {
    /// Multiplier applied to incoming healing.
    PercentHealingReceived,
    /// Multiplier applied to incoming damage.
    PercentDamageReceived,
    /// Probability that a trampling attacker is stunned on impact.
    ChanceToStunTramplers,
}

/// Something that happened to the character which running actions may care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameplayActivity {
    AttackedByEnemy,
    Healed,
    StoppedChargingUp,
    UsingAttackAction,
}

/// Modification a data-driven buff applies to one value.
///
/// Modifiers are applied in the order the owning actions are visited, so the
/// result of mixing `Flat` and `Multiply` depends on that order.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffModifier {
    /// Adds a constant.
    Flat(f32),
    /// Multiplies by a factor.
    Multiply(f32),
    /// Replaces the value outright.
    Set(f32),
}

impl BuffModifier {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Self::Flat(delta) => value + delta,
            Self::Multiply(factor) => value * factor,
            Self::Set(replacement) => replacement,
        }
    }
}

/// A modifier bound to the value it targets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffEffect {
    pub value: BuffableValue,
    pub modifier: BuffModifier,
}

impl BuffEffect {
    pub const fn new(value: BuffableValue, modifier: BuffModifier) -> Self {
        Self { value, modifier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_do_not_commute() {
        let base = 10.0;
        let doubled_then_flat = BuffModifier::Flat(1.0).apply(BuffModifier::Multiply(2.0).apply(base));
        let flat_then_doubled = BuffModifier::Multiply(2.0).apply(BuffModifier::Flat(1.0).apply(base));

        assert_eq!(doubled_then_flat, 21.0); // 10 * 2 + 1
        assert_eq!(flat_then_doubled, 22.0); // (10 + 1) * 2
    }

    #[test]
    fn set_ignores_previous_value() {
        assert_eq!(BuffModifier::Set(0.0).apply(42.0), 0.0);
    }
}
