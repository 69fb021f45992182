/// Cooldown session — the single owner of tracker state for one analysis.
///
/// Receives typed `CombatEvent`s in feed order, drops events from other
/// actors, lets the tracker handle the event, then runs the rule modules
/// against the same event. On `Complete` the accumulated timelines are
/// exported as a `CooldownReport`.
///
/// Catalog defects (`start` on an ability with no cooldown) are never
/// swallowed: `handle` returns them and `run` logs them and stops.
use crate::{
    catalog::{self, ActionCatalog, ActorId, Catalog},
    config::SessionConfig,
    error::{CooldownError, Result},
    events::CombatEvent,
    report::CooldownReport,
    rules::{reduction, RuleInput},
    tracker::{CooldownTracker, GroupScope},
};
use tokio::sync::mpsc::{Receiver, Sender};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session<C> {
    tracker:           CooldownTracker<C>,
    actor_id:          ActorId,
    strict_ordering:   bool,
    last_timestamp_ms: Option<u64>,
}

impl<C: ActionCatalog> Session<C> {
    pub fn new(catalog: C, actor_id: ActorId) -> Self {
        Self::with_scope(catalog, actor_id, GroupScope::default())
    }

    pub fn with_scope(catalog: C, actor_id: ActorId, scope: GroupScope) -> Self {
        Self {
            tracker:           CooldownTracker::with_scope(catalog, scope),
            actor_id,
            strict_ordering:   false,
            last_timestamp_ms: None,
        }
    }

    /// Reject out-of-order events instead of logging and carrying on.
    pub fn strict(mut self, strict_ordering: bool) -> Self {
        self.strict_ordering = strict_ordering;
        self
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn tracker(&self) -> &CooldownTracker<C> {
        &self.tracker
    }

    /// Direct access for rule modules that live outside this crate.
    pub fn tracker_mut(&mut self) -> &mut CooldownTracker<C> {
        &mut self.tracker
    }

    pub fn handle(&mut self, event: &CombatEvent) -> Result<Option<CooldownReport>> {
        if let Some(source_id) = event.source_id() {
            if source_id != self.actor_id {
                return Ok(None);
            }
        }

        let now_ms = event.timestamp_ms();
        self.check_order(now_ms)?;

        match *event {
            CombatEvent::Prepare { ability_id, .. } => self.tracker.on_prepare(ability_id, now_ms)?,
            CombatEvent::Execute { ability_id, .. } => self.tracker.on_execute(ability_id, now_ms)?,
            CombatEvent::Complete { .. }            => self.tracker.on_complete(now_ms),
        }

        let input = RuleInput { event, now_ms };
        reduction::evaluate(&input, &mut self.tracker)?;

        if let CombatEvent::Complete { .. } = event {
            return Ok(Some(CooldownReport::build(&self.tracker, self.actor_id, now_ms)));
        }
        Ok(None)
    }

    fn check_order(&mut self, now_ms: u64) -> Result<()> {
        match self.last_timestamp_ms {
            Some(previous_ms) if now_ms < previous_ms => {
                if self.strict_ordering {
                    return Err(CooldownError::OutOfOrder { previous_ms, timestamp_ms: now_ms });
                }
                tracing::warn!("Event at {}ms arrived after {}ms; processing as-is", now_ms, previous_ms);
            }
            _ => self.last_timestamp_ms = Some(now_ms),
        }
        Ok(())
    }
}

impl Session<&'static Catalog> {
    /// Build a session on one of the embedded job catalogs.
    pub fn from_config(cfg: &SessionConfig) -> anyhow::Result<Self> {
        let catalog = catalog::load_job(&cfg.job)
            .ok_or_else(|| anyhow::anyhow!("No embedded action catalog for job '{}'", cfg.job))?;
        tracing::info!("Cooldown session for actor {} using {} catalog", cfg.actor_id, cfg.job);
        Ok(Self::with_scope(catalog, cfg.actor_id, cfg.group_scope).strict(cfg.strict_ordering))
    }
}

// ---------------------------------------------------------------------------
// Main engine task
// ---------------------------------------------------------------------------

/// Drain the event channel in order, forwarding a report on every `Complete`.
/// The first session error is logged and returned to the caller.
pub async fn run<C: ActionCatalog>(
    mut event_rx: Receiver<CombatEvent>,
    report_tx:    Sender<CooldownReport>,
    mut session:  Session<C>,
) -> anyhow::Result<()> {
    while let Some(event) = event_rx.recv().await {
        match session.handle(&event) {
            Ok(Some(report)) => {
                tracing::info!(
                    "Parse complete at {}ms: {} abilities tracked",
                    report.completed_at_ms,
                    report.abilities.len()
                );
                if report_tx.send(report).await.is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Cooldown session failed at {}ms: {}", event.timestamp_ms(), e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}
