/// Action catalog — read-only metadata the cooldown tracker consults.
///
/// Job catalogs are embedded at compile time from `data/actions/*.toml` and
/// parsed once on first use. Callers that bring their own action data can
/// build a `Catalog` directly or implement `ActionCatalog` themselves.
///
/// An action with no `cooldown_ms` is still listed (it may be referenced by
/// events), but the tracker treats it exactly like an unknown id.
use crate::error::{CooldownError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type AbilityId = u32;
pub type ActorId   = u32;
pub type GroupId   = u32;

// ---------------------------------------------------------------------------
// Embedded TOML data
// ---------------------------------------------------------------------------

const DRAGOON:  &str = include_str!("../data/actions/drg.toml");
const RED_MAGE: &str = include_str!("../data/actions/rdm.toml");

static ALL_JOB_DATA: &[&str] = &[DRAGOON, RED_MAGE];

static JOB_CATALOGS: Lazy<Vec<(JobInfo, Catalog)>> = Lazy::new(parse_all);

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A cooldown reduction one action applies to another when it executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reduction {
    pub ability:   AbilityId,
    pub amount_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id:   AbilityId,
    pub name: String,
    /// Recast length. `None` means the action is never tracked.
    #[serde(default)]
    pub cooldown_ms:    Option<u64>,
    /// Actions sharing a group id share a single recast timer.
    #[serde(default)]
    pub cooldown_group: Option<GroupId>,
    #[serde(default)]
    pub reduces:        Vec<Reduction>,
    /// Abilities whose cooldown is cleared when this action executes.
    #[serde(default)]
    pub resets:         Vec<AbilityId>,
}

impl Action {
    /// Shorthand for a plain tracked action with no group or side effects.
    pub fn new(id: AbilityId, name: &str, cooldown_ms: Option<u64>) -> Self {
        Self {
            id,
            name:           name.to_owned(),
            cooldown_ms,
            cooldown_group: None,
            reduces:        Vec::new(),
            resets:         Vec::new(),
        }
    }

    pub fn in_group(mut self, group: GroupId) -> Self {
        self.cooldown_group = Some(group);
        self
    }

    pub fn has_cooldown(&self) -> bool {
        self.cooldown_ms.is_some()
    }
}

/// Lookup surface the tracker needs. Read-only; never mutated by the tracker.
pub trait ActionCatalog {
    fn action(&self, id: AbilityId) -> Option<&Action>;

    /// Every member of `group`, including the one being asked about.
    fn group_members(&self, group: GroupId) -> &[AbilityId];

    /// The action, but only if it has a cooldown. A miss and a missing
    /// cooldown length are indistinguishable to callers.
    fn lookup(&self, id: AbilityId) -> Option<&Action> {
        self.action(id).filter(|a| a.has_cooldown())
    }
}

impl<T: ActionCatalog + ?Sized> ActionCatalog for &T {
    fn action(&self, id: AbilityId) -> Option<&Action> {
        (**self).action(id)
    }

    fn group_members(&self, group: GroupId) -> &[AbilityId] {
        (**self).group_members(group)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    actions: HashMap<AbilityId, Action>,
    groups:  HashMap<GroupId, Vec<AbilityId>>,
}

impl Catalog {
    /// Build and validate a catalog. Group member order follows input order.
    pub fn new(actions: Vec<Action>) -> Result<Self> {
        let mut by_id  = HashMap::with_capacity(actions.len());
        let mut groups: HashMap<GroupId, Vec<AbilityId>> = HashMap::new();

        for action in actions {
            if action.cooldown_ms == Some(0) {
                return Err(CooldownError::CatalogValidation(format!(
                    "{} ({}) has a zero-length cooldown",
                    action.name, action.id
                )));
            }
            if let Some(group) = action.cooldown_group {
                groups.entry(group).or_default().push(action.id);
            }
            let id = action.id;
            if by_id.insert(id, action).is_some() {
                return Err(CooldownError::CatalogValidation(format!(
                    "duplicate action id {}",
                    id
                )));
            }
        }

        let known: HashSet<AbilityId> = by_id.keys().copied().collect();
        for action in by_id.values() {
            let targets = action
                .reduces
                .iter()
                .map(|r| r.ability)
                .chain(action.resets.iter().copied());
            for target in targets {
                if !known.contains(&target) {
                    return Err(CooldownError::CatalogValidation(format!(
                        "{} ({}) affects unknown action {}",
                        action.name, action.id, target
                    )));
                }
            }
        }

        Ok(Self { actions: by_id, groups })
    }

    /// Parse a catalog from TOML `[[action]]` tables.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: TomlFile = toml::from_str(raw)?;
        Self::new(file.action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ActionCatalog for Catalog {
    fn action(&self, id: AbilityId) -> Option<&Action> {
        self.actions.get(&id)
    }

    fn group_members(&self, group: GroupId) -> &[AbilityId] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Lightweight job descriptor for listing the embedded catalogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub key:  String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// TOML deserialization structs (private)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TomlFile {
    job:    Option<JobInfo>,
    #[serde(default)]
    action: Vec<Action>,
}

fn parse_all() -> Vec<(JobInfo, Catalog)> {
    ALL_JOB_DATA
        .iter()
        .filter_map(|raw| {
            let file: TomlFile = toml::from_str(raw)
                .map_err(|e| tracing::warn!("Failed to parse action TOML: {}", e))
                .ok()?;
            let Some(job) = file.job else {
                tracing::warn!("Embedded action TOML has no [job] table");
                return None;
            };
            let catalog = Catalog::new(file.action)
                .map_err(|e| tracing::warn!("Invalid {} catalog: {}", job.key, e))
                .ok()?;
            Some((job, catalog))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn list_jobs() -> Vec<JobInfo> {
    JOB_CATALOGS.iter().map(|(job, _)| job.clone()).collect()
}

/// Load an embedded job catalog by key (case-insensitive), e.g. "DRG".
pub fn load_job(key: &str) -> Option<&'static Catalog> {
    JOB_CATALOGS
        .iter()
        .find(|(job, _)| job.key.eq_ignore_ascii_case(key))
        .map(|(_, catalog)| catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_embedded_jobs() {
        let keys: Vec<String> = list_jobs().into_iter().map(|j| j.key).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"DRG".to_owned()));
        assert!(keys.contains(&"RDM".to_owned()));
    }

    #[test]
    fn loads_dragoon_jump_group() {
        let drg = load_job("drg").expect("should load");
        let jump = drg.lookup(92).expect("Jump has a cooldown");
        assert_eq!(jump.cooldown_ms, Some(30_000));
        assert_eq!(drg.group_members(1), &[92, 16478]);
    }

    #[test]
    fn actions_without_cooldown_are_not_looked_up() {
        let drg = load_job("DRG").unwrap();
        assert!(drg.action(75).is_some());
        assert!(drg.lookup(75).is_none());
        assert!(drg.lookup(999_999).is_none());
    }

    #[test]
    fn red_mage_manafication_resets() {
        let rdm = load_job("RDM").unwrap();
        let mana = rdm.lookup(7521).unwrap();
        assert_eq!(mana.resets, vec![7506, 7515]);
    }

    #[test]
    fn returns_none_for_unknown_job() {
        assert!(load_job("BLU").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            Action::new(1, "A", Some(1_000)),
            Action::new(1, "B", Some(2_000)),
        ])
        .unwrap_err();
        assert!(matches!(err, CooldownError::CatalogValidation(_)));
    }

    #[test]
    fn rejects_zero_cooldown() {
        assert!(Catalog::new(vec![Action::new(1, "A", Some(0))]).is_err());
    }

    #[test]
    fn rejects_unknown_reset_target() {
        let mut a = Action::new(1, "A", Some(1_000));
        a.resets.push(42);
        assert!(Catalog::new(vec![a]).is_err());
    }

    #[test]
    fn parses_toml_without_job_table() {
        let raw = r#"
            [[action]]
            id = 10
            name = "Ten"
            cooldown_ms = 10000

            [[action]]
            id = 11
            name = "Eleven"
            cooldown_ms = 10000
            cooldown_group = 7
            reduces = [{ ability = 10, amount_ms = 2500 }]
        "#;
        let catalog = Catalog::from_toml_str(raw).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.group_members(7), &[11]);
        assert_eq!(catalog.group_members(8), &[] as &[AbilityId]);
        assert_eq!(
            catalog.action(11).unwrap().reduces,
            vec![Reduction { ability: 10, amount_ms: 2_500 }]
        );
    }
}
