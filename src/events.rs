/// Lifecycle events delivered to the cooldown tracker.
///
/// The feed is a pre-captured, time-ordered stream. Events arrive one JSON
/// object per line, tagged by `type`:
///
///   {"type":"Prepare","timestamp_ms":1000,"source_id":7,"ability_id":92}
///   {"type":"Execute","timestamp_ms":1000,"source_id":7,"ability_id":92}
///   {"type":"Complete","timestamp_ms":90000}
///
/// `Prepare` is cast-start, `Execute` is cast/activation completion, and
/// `Complete` marks the end of the parse.
use crate::catalog::{AbilityId, ActorId};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    Prepare {
        timestamp_ms: u64,
        source_id:    ActorId,
        ability_id:   AbilityId,
    },
    Execute {
        timestamp_ms: u64,
        source_id:    ActorId,
        ability_id:   AbilityId,
    },
    Complete {
        timestamp_ms: u64,
    },
}

impl CombatEvent {
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Prepare  { timestamp_ms, .. } => *timestamp_ms,
            Self::Execute  { timestamp_ms, .. } => *timestamp_ms,
            Self::Complete { timestamp_ms }     => *timestamp_ms,
        }
    }

    /// Actor that used the ability. `Complete` belongs to no actor.
    pub fn source_id(&self) -> Option<ActorId> {
        match self {
            Self::Prepare { source_id, .. } => Some(*source_id),
            Self::Execute { source_id, .. } => Some(*source_id),
            Self::Complete { .. }           => None,
        }
    }

    pub fn ability_id(&self) -> Option<AbilityId> {
        match self {
            Self::Prepare { ability_id, .. } => Some(*ability_id),
            Self::Execute { ability_id, .. } => Some(*ability_id),
            Self::Complete { .. }            => None,
        }
    }
}

/// Decode one line of a JSON-lines event stream. Blank lines yield `None`.
pub fn from_json_line(raw: &str) -> Result<Option<CombatEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Async pipeline task: receive raw lines, decode, forward typed events.
/// Undecodable lines are logged and skipped.
pub async fn run(mut rx: Receiver<String>, tx: Sender<CombatEvent>) -> anyhow::Result<()> {
    while let Some(line) = rx.recv().await {
        match from_json_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping undecodable event line: {}", e),
        }
    }
    Ok(())
}
