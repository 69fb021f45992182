/// Session configuration — persisted as `config.toml` in a caller-chosen directory.
///
/// Picks the actor whose cooldowns are reconstructed, the embedded job catalog
/// to use, and how cooldown-group reductions behave.
///
/// NOTE: `group_scope = "per_member"` reproduces the older behaviour where
/// `reduce`/`reset` only archive the ability they were called with. Leave it
/// on `group` unless a downstream rule depends on the old behaviour.
use crate::tracker::GroupScope;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Actor whose Prepare/Execute events are tracked. Others are dropped.
    #[serde(default)]
    pub actor_id: u32,

    /// Embedded job catalog key, e.g. "DRG" or "RDM".
    #[serde(default)]
    pub job: String,

    #[serde(default)]
    pub group_scope: GroupScope,

    /// Fail the session on an out-of-order timestamp instead of logging it.
    #[serde(default)]
    pub strict_ordering: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            actor_id:        0,
            job:             String::new(),
            group_scope:     GroupScope::default(),
            strict_ordering: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

pub fn load_or_default(config_dir: &Path) -> Result<SessionConfig> {
    let path = config_dir.join("config.toml");
    if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        let cfg: SessionConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Config parse error: {}", e))?;
        Ok(cfg)
    } else {
        tracing::debug!("No config at {:?}, using defaults", path);
        Ok(SessionConfig::default())
    }
}

pub fn save(config: &SessionConfig, config_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let raw = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("Config serialize error: {}", e))?;
    std::fs::write(config_dir.join("config.toml"), raw)?;
    Ok(())
}
