/// End-of-parse cooldown export — built when the feed delivers `Complete`.
///
/// Serialised as JSON for whatever consumes the analysis (rule modules,
/// timelines, result presentation).
use crate::catalog::{AbilityId, ActionCatalog, ActorId};
use crate::tracker::{CooldownTracker, Interval};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityReport {
    pub ability_id:          AbilityId,
    pub name:                String,
    /// Interval still running (or lapsed but never archived) at completion.
    pub current:             Option<Interval>,
    pub history:             Vec<Interval>,
    pub time_on_cooldown_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownReport {
    pub actor_id:        ActorId,
    pub completed_at_ms: u64,
    /// Sorted by ability id.
    pub abilities:       Vec<AbilityReport>,
}

impl CooldownReport {
    pub fn build<C: ActionCatalog>(tracker: &CooldownTracker<C>, actor_id: ActorId, completed_at_ms: u64) -> Self {
        let abilities = tracker
            .tracked()
            .into_iter()
            .map(|ability_id| {
                let state = tracker.query(ability_id);
                AbilityReport {
                    ability_id,
                    name: tracker
                        .catalog()
                        .action(ability_id)
                        .map(|a| a.name.clone())
                        .unwrap_or_default(),
                    current: state.current,
                    history: state.history,
                    time_on_cooldown_ms: tracker.time_on_cooldown_ms(ability_id, completed_at_ms),
                }
            })
            .collect();

        Self { actor_id, completed_at_ms, abilities }
    }

    pub fn ability(&self, ability_id: AbilityId) -> Option<&AbilityReport> {
        self.abilities.iter().find(|a| a.ability_id == ability_id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
