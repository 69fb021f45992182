/// Cooldown reconstruction — the per-ability recast timeline for one actor.
///
/// All state lives in a single `CooldownTracker` owned by the session.
/// No locking is needed because the session is single-threaded.
///
/// Abilities in the same cooldown group share one timeline. Intervals live in
/// an arena and each ability's `current` slot stores an index into it, so a
/// group started together holds the *same* interval: shrinking it through one
/// member is visible through every other member.
///
/// Elapsed intervals are archived lazily. Nothing moves into history just
/// because time passed; it moves when `start`, `reduce` or `reset` next
/// touches the ability.
use crate::catalog::{AbilityId, Action, ActionCatalog};
use crate::error::{CooldownError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One cooldown occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start_ms:    u64,
    pub duration_ms: u64,
}

impl Interval {
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }
}

/// Read-only snapshot of one ability's cooldown timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownState {
    pub current: Option<Interval>,
    /// Finished intervals, oldest first.
    pub history: Vec<Interval>,
}

/// How far `reduce` and `reset` reach when the ability belongs to a group.
///
/// `start` always covers the whole group. With `PerMember`, archiving only
/// happens on the ability passed in; the other members keep pointing at the
/// (still shared) interval until they are started again. History stores a
/// copy taken at archive time, so later changes through a stale member never
/// rewrite a partner's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupScope {
    #[default]
    Group,
    PerMember,
}

// ---------------------------------------------------------------------------
// Internal storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntervalId(usize);

#[derive(Debug, Default)]
struct Slot {
    current: Option<IntervalId>,
    history: Vec<Interval>,
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CooldownTracker<C> {
    catalog:         C,
    scope:           GroupScope,
    intervals:       Vec<Interval>,
    cooldowns:       HashMap<AbilityId, Slot>,
    /// Ability mid-cast whose cooldown was already started on Prepare.
    pending_prepare: Option<AbilityId>,
}

impl<C: ActionCatalog> CooldownTracker<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_scope(catalog, GroupScope::default())
    }

    pub fn with_scope(catalog: C, scope: GroupScope) -> Self {
        Self {
            catalog,
            scope,
            intervals:       Vec::new(),
            cooldowns:       HashMap::new(),
            pending_prepare: None,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn scope(&self) -> GroupScope {
        self.scope
    }

    pub fn pending_prepare(&self) -> Option<AbilityId> {
        self.pending_prepare
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    /// Cast-start. The cooldown begins here, not when the cast lands.
    pub fn on_prepare(&mut self, ability_id: AbilityId, timestamp_ms: u64) -> Result<()> {
        if self.catalog.lookup(ability_id).is_none() {
            return Ok(());
        }
        self.pending_prepare = Some(ability_id);
        self.start(ability_id, timestamp_ms)
    }

    pub fn on_execute(&mut self, ability_id: AbilityId, timestamp_ms: u64) -> Result<()> {
        if self.catalog.lookup(ability_id).is_none() {
            return Ok(());
        }

        let finishing_prepare = self.pending_prepare.take() == Some(ability_id);
        if finishing_prepare {
            tracing::debug!("Cast of {} completed at {}ms; cooldown already running", ability_id, timestamp_ms);
            return Ok(());
        }

        self.start(ability_id, timestamp_ms)
    }

    pub fn on_complete(&mut self, timestamp_ms: u64) {
        tracing::debug!(
            "Cooldown tracking complete at {}ms: {} abilities, {} intervals",
            timestamp_ms,
            self.cooldowns.len(),
            self.intervals.len()
        );
    }

    // -----------------------------------------------------------------------
    // Mutation API
    // -----------------------------------------------------------------------

    /// Start the cooldown for `ability_id` and every other member of its
    /// group, all sharing one new interval. Any running interval is archived
    /// without checking whether it had lapsed.
    pub fn start(&mut self, ability_id: AbilityId, now_ms: u64) -> Result<()> {
        let (length_ms, group) = match self.catalog.action(ability_id) {
            Some(Action { cooldown_ms: Some(length), cooldown_group, .. }) if *length > 0 => {
                (*length, *cooldown_group)
            }
            other => {
                return Err(CooldownError::Configuration {
                    ability_id,
                    name: other
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|| "unknown action".to_owned()),
                })
            }
        };

        let mut affected = vec![ability_id];
        if let Some(group) = group {
            affected.extend(
                self.catalog
                    .group_members(group)
                    .iter()
                    .copied()
                    .filter(|&id| id != ability_id),
            );
        }

        let id = IntervalId(self.intervals.len());
        self.intervals.push(Interval { start_ms: now_ms, duration_ms: length_ms });

        for member in &affected {
            let slot = self.cooldowns.entry(*member).or_default();
            if let Some(previous) = slot.current.replace(id) {
                slot.history.push(self.intervals[previous.0]);
            }
        }

        tracing::debug!("Cooldown {} started at {}ms for {}ms ({} members)", ability_id, now_ms, length_ms, affected.len());
        Ok(())
    }

    /// Shorten the running cooldown by `amount_ms`. Reduction past `now_ms`
    /// resets the cooldown; the excess is discarded.
    pub fn reduce(&mut self, ability_id: AbilityId, amount_ms: u64, now_ms: u64) {
        let Some(id) = self.current_id(ability_id) else {
            return;
        };

        // Lapsed but never archived: file it as-is, nothing left to reduce.
        if self.intervals[id.0].end_ms() < now_ms {
            self.archive(ability_id, id);
            tracing::debug!("Cooldown {} had lapsed by {}ms; archived", ability_id, now_ms);
            return;
        }

        let interval = &mut self.intervals[id.0];
        interval.duration_ms = interval.duration_ms.saturating_sub(amount_ms);
        let overshot = interval.duration_ms == 0 || interval.end_ms() < now_ms;
        tracing::debug!("Cooldown {} reduced by {}ms at {}ms → {}ms", ability_id, amount_ms, now_ms, interval.duration_ms);

        if overshot {
            self.reset(ability_id, now_ms);
        }
    }

    /// End the running cooldown at exactly `now_ms` and archive it.
    pub fn reset(&mut self, ability_id: AbilityId, now_ms: u64) {
        let Some(id) = self.current_id(ability_id) else {
            return;
        };

        let interval = &mut self.intervals[id.0];
        interval.duration_ms = now_ms.saturating_sub(interval.start_ms);
        self.archive(ability_id, id);
        tracing::debug!("Cooldown {} reset at {}ms", ability_id, now_ms);
    }

    // -----------------------------------------------------------------------
    // Query API
    // -----------------------------------------------------------------------

    /// Snapshot of one ability. Never-started abilities yield an empty state.
    pub fn query(&self, ability_id: AbilityId) -> CooldownState {
        let Some(slot) = self.cooldowns.get(&ability_id) else {
            return CooldownState::default();
        };
        CooldownState {
            current: slot.current.map(|id| self.intervals[id.0]),
            history: slot.history.clone(),
        }
    }

    /// Time left on the current interval as of `now_ms` (0 when idle or lapsed).
    pub fn remaining_ms(&self, ability_id: AbilityId, now_ms: u64) -> u64 {
        self.query(ability_id)
            .current
            .map(|c| c.end_ms().saturating_sub(now_ms))
            .unwrap_or(0)
    }

    pub fn is_on_cooldown(&self, ability_id: AbilityId, now_ms: u64) -> bool {
        self.remaining_ms(ability_id, now_ms) > 0
    }

    /// Total time spent on cooldown up to `now_ms`, counting only the elapsed
    /// part of the current interval.
    pub fn time_on_cooldown_ms(&self, ability_id: AbilityId, now_ms: u64) -> u64 {
        let state = self.query(ability_id);
        let archived: u64 = state.history.iter().map(|i| i.duration_ms).sum();
        let running = state
            .current
            .map(|c| c.duration_ms.min(now_ms.saturating_sub(c.start_ms)))
            .unwrap_or(0);
        archived + running
    }

    /// Every ability that has ever had a cooldown started, ascending.
    pub fn tracked(&self) -> Vec<AbilityId> {
        let mut ids: Vec<AbilityId> = self.cooldowns.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn current_id(&self, ability_id: AbilityId) -> Option<IntervalId> {
        self.cooldowns.get(&ability_id).and_then(|s| s.current)
    }

    /// Abilities whose slots `reduce`/`reset` act on for `ability_id`.
    fn scope_members(&self, ability_id: AbilityId) -> Vec<AbilityId> {
        let mut members = vec![ability_id];
        if self.scope == GroupScope::PerMember {
            return members;
        }
        if let Some(group) = self.catalog.action(ability_id).and_then(|a| a.cooldown_group) {
            members.extend(
                self.catalog
                    .group_members(group)
                    .iter()
                    .copied()
                    .filter(|&id| id != ability_id),
            );
        }
        members
    }

    /// Move `interval` from current to history on every in-scope member still
    /// holding it.
    fn archive(&mut self, ability_id: AbilityId, interval: IntervalId) {
        for member in self.scope_members(ability_id) {
            if let Some(slot) = self.cooldowns.get_mut(&member) {
                if slot.current == Some(interval) {
                    slot.current = None;
                    slot.history.push(self.intervals[interval.0]);
                }
            }
        }
    }
}
