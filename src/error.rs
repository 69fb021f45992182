/// Error taxonomy for the cooldown engine.
///
/// Only `start` can fail at runtime (an ability with no cooldown length).
/// Everything else that can go wrong happens while loading catalog data.
use crate::catalog::AbilityId;

pub type Result<T> = std::result::Result<T, CooldownError>;

#[derive(Debug, thiserror::Error)]
pub enum CooldownError {
    /// `start` was asked to begin a cooldown the catalog does not define.
    #[error("tried to start cooldown for {name} ({ability_id}), which has no cooldown")]
    Configuration { ability_id: AbilityId, name: String },

    /// The feed delivered an event earlier than one already processed.
    #[error("event at {timestamp_ms}ms arrived after {previous_ms}ms")]
    OutOfOrder { previous_ms: u64, timestamp_ms: u64 },

    #[error("catalog validation error: {0}")]
    CatalogValidation(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
