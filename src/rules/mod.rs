pub mod reduction;

use crate::events::CombatEvent;
use crate::error::Result;

/// The current event being evaluated, after the tracker has handled it.
pub struct RuleInput<'a> {
    pub event:  &'a CombatEvent,
    pub now_ms: u64,
}

/// Rules mutate the tracker directly; the only failure they can surface is
/// a catalog defect reported by `start`.
pub type RuleOutput = Result<()>;
