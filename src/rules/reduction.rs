/// Applies catalog-declared cooldown side effects when an action executes.
///
/// An action can list abilities whose cooldown it shortens (`reduces`) or
/// clears outright (`resets`). Red Mage's Manafication resetting
/// Corps-a-corps and Displacement is the canonical example.
///
/// Effects fire on Execute only. A Prepare is a cast that has not landed yet.
/// A reset target that already came off cooldown keeps its natural end.
use super::{RuleInput, RuleOutput};
use crate::{catalog::ActionCatalog, events::CombatEvent, tracker::CooldownTracker};

pub const KEY: &str = "cooldown_reduction";

pub fn evaluate<C: ActionCatalog>(input: &RuleInput, tracker: &mut CooldownTracker<C>) -> RuleOutput {
    let CombatEvent::Execute { ability_id, .. } = input.event else {
        return Ok(());
    };

    let Some(action) = tracker.catalog().action(*ability_id) else {
        return Ok(());
    };
    if action.reduces.is_empty() && action.resets.is_empty() {
        return Ok(());
    }

    let reduces = action.reduces.clone();
    let resets  = action.resets.clone();

    for reduction in reduces {
        tracing::debug!("[{}] {} reduces {} by {}ms", KEY, ability_id, reduction.ability, reduction.amount_ms);
        tracker.reduce(reduction.ability, reduction.amount_ms, input.now_ms);
    }
    for target in resets {
        tracing::debug!("[{}] {} resets {}", KEY, ability_id, target);
        // Files a lapsed interval unchanged before the reset can stretch it.
        tracker.reduce(target, 0, input.now_ms);
        tracker.reset(target, input.now_ms);
    }
    Ok(())
}
