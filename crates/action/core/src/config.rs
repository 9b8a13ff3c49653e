use crate::action::BuffableValue;

/// Unbuffed starting points for [`BuffableValue`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffBaselines {
    pub percent_healing_received: f32,
    pub percent_damage_received: f32,
    pub chance_to_stun_tramplers: f32,
}

impl BuffBaselines {
    pub const fn get(&self, kind: BuffableValue) -> f32 {
        match kind {
            BuffableValue::PercentHealingReceived => self.percent_healing_received,
            BuffableValue::PercentDamageReceived => self.percent_damage_received,
            BuffableValue::ChanceToStunTramplers => self.chance_to_stun_tramplers,
        }
    }

    pub fn set(&mut self, kind: BuffableValue, value: f32) {
        match kind {
            BuffableValue::PercentHealingReceived => self.percent_healing_received = value,
            BuffableValue::PercentDamageReceived => self.percent_damage_received = value,
            BuffableValue::ChanceToStunTramplers => self.chance_to_stun_tramplers = value,
        }
    }
}

impl Default for BuffBaselines {
    fn default() -> Self {
        Self {
            percent_healing_received: 1.0,
            percent_damage_received: 1.0,
            chance_to_stun_tramplers: 0.0,
        }
    }
}

/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Admission ceiling, in simulated seconds, for the estimated blocking time
    /// already waiting in a character's queue.
    pub max_queue_time_depth: f32,
    /// Number of lifecycle events a player keeps before dropping the oldest.
    /// Zero disables the journal.
    pub event_journal_capacity: usize,
    /// Instance slots reserved up front in each player's pool.
    pub initial_pool_capacity: usize,
    pub buff_baselines: BuffBaselines,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_TARGETS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_QUEUE_TIME_DEPTH: f32 = 1.6;
    pub const DEFAULT_EVENT_JOURNAL_CAPACITY: usize = 256;
    pub const DEFAULT_INITIAL_POOL_CAPACITY: usize = 8;

    pub fn new() -> Self {
        Self {
            max_queue_time_depth: Self::DEFAULT_MAX_QUEUE_TIME_DEPTH,
            event_journal_capacity: Self::DEFAULT_EVENT_JOURNAL_CAPACITY,
            initial_pool_capacity: Self::DEFAULT_INITIAL_POOL_CAPACITY,
            buff_baselines: BuffBaselines::default(),
        }
    }

    #[must_use]
    pub fn with_max_queue_time_depth(mut self, seconds: f32) -> Self {
        self.max_queue_time_depth = seconds;
        self
    }

    #[must_use]
    pub fn with_event_journal_capacity(mut self, capacity: usize) -> Self {
        self.event_journal_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_buff_baseline(mut self, kind: BuffableValue, value: f32) -> Self {
        self.buff_baselines.set(kind, value);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_queue_time_depth, 1.6);
        assert_eq!(
            config.buff_baselines.get(BuffableValue::PercentDamageReceived),
            1.0
        );
        assert_eq!(
            config.buff_baselines.get(BuffableValue::ChanceToStunTramplers),
            0.0
        );
    }

    #[test]
    fn baseline_override_only_touches_one_value() {
        let config = EngineConfig::new().with_buff_baseline(BuffableValue::PercentDamageReceived, 10.0);
        assert_eq!(
            config.buff_baselines.get(BuffableValue::PercentDamageReceived),
            10.0
        );
        assert_eq!(
            config.buff_baselines.get(BuffableValue::PercentHealingReceived),
            1.0
        );
    }
}
