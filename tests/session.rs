use cooldown_ledger::{
    catalog, events, Action, Catalog, CombatEvent, CooldownError, CooldownTracker, GroupScope, Interval, Session,
};

const RDM_LOG: &str = r#"
{"type":"Execute","timestamp_ms":1000,"source_id":7,"ability_id":7506}
{"type":"Execute","timestamp_ms":2000,"source_id":7,"ability_id":16527}
{"type":"Execute","timestamp_ms":2500,"source_id":9,"ability_id":7520}
{"type":"Prepare","timestamp_ms":4000,"source_id":7,"ability_id":7503}
{"type":"Execute","timestamp_ms":6000,"source_id":7,"ability_id":7503}
{"type":"Execute","timestamp_ms":10000,"source_id":7,"ability_id":7521}
{"type":"Execute","timestamp_ms":12000,"source_id":7,"ability_id":7515}
{"type":"Complete","timestamp_ms":60000}
"#;

fn iv(start_ms: u64, duration_ms: u64) -> Interval {
    Interval { start_ms, duration_ms }
}

#[test]
fn replays_red_mage_log_with_manafication_reset() {
    let mut session = Session::new(catalog::load_job("RDM").unwrap(), 7);
    let mut report = None;
    for line in RDM_LOG.lines() {
        if let Some(event) = events::from_json_line(line).unwrap() {
            report = session.handle(&event).unwrap().or(report);
        }
    }
    let report = report.expect("Complete should export a report");

    // Corps-a-corps: used at 1s, reset by Manafication at 10s.
    let corps = report.ability(7506).unwrap();
    assert!(corps.current.is_none());
    assert_eq!(corps.history, vec![iv(1_000, 9_000)]);

    // Engagement started the shared recast; Manafication cleared it for both,
    // then Displacement started a fresh one for both.
    for id in [7515, 16527] {
        let a = report.ability(id).unwrap();
        assert_eq!(a.history, vec![iv(2_000, 8_000)]);
        assert_eq!(a.current, Some(iv(12_000, 35_000)));
    }

    // Another actor's Embolden never shows up.
    assert!(report.ability(7520).is_none());
    // Jolt has no recast.
    assert!(report.ability(7503).is_none());
}

#[test]
fn manafication_after_corps_a_corps_lapsed_keeps_recast_length() {
    let mut session = Session::new(catalog::load_job("RDM").unwrap(), 7);
    session.handle(&CombatEvent::Execute { timestamp_ms: 1_000, source_id: 7, ability_id: 7506 }).unwrap();
    session.handle(&CombatEvent::Execute { timestamp_ms: 50_000, source_id: 7, ability_id: 7521 }).unwrap();
    let report = session
        .handle(&CombatEvent::Complete { timestamp_ms: 60_000 })
        .unwrap()
        .expect("report");

    let corps = report.ability(7506).unwrap();
    assert_eq!(corps.history, vec![iv(1_000, 35_000)]);
    assert_eq!(corps.time_on_cooldown_ms, 35_000);
}

#[test]
fn per_member_scope_leaves_partner_pointing_at_shared_interval() {
    let rdm = catalog::load_job("RDM").unwrap();
    let mut t = CooldownTracker::with_scope(rdm, GroupScope::PerMember);
    t.start(16527, 2_000).unwrap();
    t.reset(7515, 10_000);

    assert_eq!(t.query(7515).history, vec![iv(2_000, 8_000)]);
    assert_eq!(t.query(16527).current, Some(iv(2_000, 8_000)));
    assert!(t.query(16527).history.is_empty());
}

#[test]
fn dragoon_jump_and_high_jump_share_recast() {
    let mut session = Session::new(catalog::load_job("DRG").unwrap(), 1);
    session
        .handle(&CombatEvent::Execute { timestamp_ms: 1_000, source_id: 1, ability_id: 16478 })
        .unwrap();
    session.tracker_mut().reduce(92, 10_000, 5_000);

    assert_eq!(session.tracker().query(92).current, Some(iv(1_000, 20_000)));
    assert_eq!(session.tracker().query(16478).current, Some(iv(1_000, 20_000)));
}

#[test]
fn catalog_defect_surfaces_from_start() {
    let catalog = Catalog::new(vec![Action::new(1, "Sprint", None)]).unwrap();
    let mut t = CooldownTracker::new(catalog);
    match t.start(1, 0) {
        Err(CooldownError::Configuration { ability_id, name }) => {
            assert_eq!(ability_id, 1);
            assert_eq!(name, "Sprint");
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn logging_writes_into_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let guard = cooldown_ledger::init_logging(&log_dir).unwrap();
    tracing::info!("hello from the test");
    drop(guard);
    assert!(log_dir.is_dir());
}
