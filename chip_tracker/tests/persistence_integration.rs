//! Save, restore and discard tests across engine restarts.

use anyhow::Result;
use chip_tracker::{
    EngineConfig, FileStore, MemoryStore, Phase, Player, SESSION_KEY, Session, SessionEngine,
    SessionError, SessionEvent, SessionStore,
};
use chrono::Duration;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn store_with_blob(blob: &[u8]) -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .set(SESSION_KEY, blob, Duration::days(1))
        .expect("memory store never fails");
    store
}

fn played_store() -> Result<MemoryStore> {
    let mut engine = SessionEngine::with_defaults(MemoryStore::new());
    engine.set_player_name(0, "Ann")?;
    engine.set_player_balance(0, "100")?;
    engine.set_player_name(1, "Bo")?;
    engine.set_player_balance(1, "80")?;
    engine.start_session()?;
    engine.place_bet(1, "30")?;
    engine.place_bet(2, "20")?;
    Ok(engine.into_store())
}

#[test]
fn test_restore_matches_saved_data() -> Result<()> {
    let saved = Session {
        players: vec![Player::new(1, "A", 100)],
        pot: 0,
    };
    let store = store_with_blob(&serde_json::to_vec(&saved)?);

    let mut engine = SessionEngine::with_defaults(store);
    assert!(engine.awaiting_restore_choice());
    assert_eq!(engine.phase(), Phase::Setup);

    engine.restore_session()?;
    assert_eq!(engine.phase(), Phase::Active);
    assert_eq!(engine.session(), Some(&saved));
    assert!(!engine.awaiting_restore_choice());
    Ok(())
}

#[test]
fn test_restore_after_restart_continues_play() -> Result<()> {
    let store = played_store()?;

    let mut engine = SessionEngine::with_defaults(store);
    engine.restore_session()?;
    assert_eq!(engine.pot(), 50);
    assert_eq!(engine.player(1).map(|p| p.balance), Some(70));
    assert_eq!(engine.player(2).map(|p| p.name.as_str()), Some("Bo"));
    assert_eq!(engine.total_chips(), Some(180));

    engine.assign_pot_to_winner(2)?;
    assert_eq!(engine.player(2).map(|p| p.balance), Some(110));
    assert!(engine.is_conserved());

    let events = engine.drain_events();
    assert_eq!(
        events.front(),
        Some(&SessionEvent::SessionRestored { players: 2, pot: 50 })
    );
    Ok(())
}

#[test]
fn test_restore_renews_expiry() -> Result<()> {
    let mut store = MemoryStore::new();
    store.set(
        SESSION_KEY,
        br#"{"players":[{"id":1,"name":"A","balance":100}],"pot":20}"#,
        Duration::minutes(5),
    )?;

    let mut engine = SessionEngine::with_defaults(store);
    engine.restore_session()?;
    assert!(engine.take_persistence_error().is_none());

    let expires_at = engine
        .store()
        .expires_at(SESSION_KEY)
        .expect("session saved");
    assert!(expires_at - chrono::Utc::now() > Duration::hours(23));

    let blob = engine.store().get(SESSION_KEY)?.expect("session saved");
    let saved: Session = serde_json::from_slice(&blob)?;
    assert_eq!(engine.session(), Some(&saved));
    Ok(())
}

#[test]
fn test_restore_accepts_original_blob_format() -> Result<()> {
    let blob = br#"{"players":[{"id":1,"name":"Spieler 1","balance":40},{"id":2,"name":"Kim","balance":0}],"pot":60}"#;
    let mut engine = SessionEngine::with_defaults(store_with_blob(blob));
    engine.restore_session()?;
    assert_eq!(engine.pot(), 60);
    assert_eq!(engine.players().len(), 2);
    Ok(())
}

#[test]
fn test_corrupt_blob_falls_back_to_setup() {
    let cases: [&[u8]; 8] = [
        b"{not json",
        br#"{"players":"nope","pot":0}"#,
        br#"{"players":[{"id":1,"name":"A","balance":"100"}],"pot":0}"#,
        br#"{"players":[{"id":1,"name":"A","balance":100}],"pot":-5}"#,
        br#"{"players":[{"id":1,"name":"A","balance":1},{"id":1,"name":"B","balance":1}],"pot":0}"#,
        br#"{"players":[],"pot":0}"#,
        br#"{"players":[{"id":7,"name":"A","balance":1},{"id":3,"name":"B","balance":1}],"pot":0}"#,
        br#"{"players":[{"id":0,"name":"A","balance":1}],"pot":0}"#,
    ];

    init_logging();
    for blob in cases {
        let mut engine = SessionEngine::with_defaults(store_with_blob(blob));
        let err = engine.restore_session().unwrap_err();
        assert!(
            matches!(err, SessionError::CorruptSession(_)),
            "blob {:?} gave {err:?}",
            String::from_utf8_lossy(blob)
        );
        assert_eq!(engine.phase(), Phase::Setup);
        assert!(!engine.awaiting_restore_choice());

        // Setup is usable right away.
        engine.set_player_count(1).unwrap();
        engine.start_session().unwrap();
        assert_eq!(engine.phase(), Phase::Active);

        // The unusable blob is gone.
        let store = engine.into_store();
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }
}

#[test]
fn test_discard_removes_saved_session() -> Result<()> {
    let store = played_store()?;

    let mut engine = SessionEngine::with_defaults(store);
    engine.discard_session()?;
    assert_eq!(engine.phase(), Phase::Setup);
    assert_eq!(engine.drain_events().back(), Some(&SessionEvent::SessionDiscarded));

    let engine = SessionEngine::with_defaults(engine.into_store());
    assert!(!engine.awaiting_restore_choice());
    Ok(())
}

#[test]
fn test_choice_offered_once() -> Result<()> {
    let mut engine = SessionEngine::with_defaults(played_store()?);
    engine.restore_session()?;

    assert!(matches!(
        engine.restore_session(),
        Err(SessionError::Validation(_))
    ));
    assert!(matches!(
        engine.discard_session(),
        Err(SessionError::Validation(_))
    ));
    assert_eq!(engine.phase(), Phase::Active);
    Ok(())
}

#[test]
fn test_no_saved_session_no_choice() {
    let mut engine = SessionEngine::with_defaults(MemoryStore::new());
    assert!(!engine.awaiting_restore_choice());
    assert!(matches!(
        engine.restore_session(),
        Err(SessionError::Validation(_))
    ));
}

#[test]
fn test_expired_session_not_offered() {
    let mut store = MemoryStore::new();
    store
        .set(SESSION_KEY, br#"{"players":[],"pot":0}"#, Duration::zero())
        .unwrap();
    let engine = SessionEngine::with_defaults(store);
    assert!(!engine.awaiting_restore_choice());
}

#[test]
fn test_saved_with_configured_ttl() -> Result<()> {
    let config = EngineConfig {
        session_ttl_days: 3,
        ..EngineConfig::default()
    };
    let mut engine = SessionEngine::new(MemoryStore::new(), config);
    engine.start_session()?;
    engine.assign_pot_to_winner(1)?;

    let expires_at = engine
        .store()
        .expires_at(SESSION_KEY)
        .expect("session saved");
    let remaining = expires_at - chrono::Utc::now();
    assert!(remaining > Duration::days(2));
    assert!(remaining <= Duration::days(3));
    Ok(())
}

#[test]
fn test_file_store_survives_restart() -> Result<()> {
    init_logging();
    let dir = tempfile::tempdir()?;

    {
        let mut engine = SessionEngine::with_defaults(FileStore::new(dir.path())?);
        engine.set_player_count(3)?;
        engine.set_player_balance(0, "500")?;
        engine.set_player_balance(1, "500")?;
        engine.set_player_balance(2, "500")?;
        engine.start_session()?;
        engine.place_bet(3, "125")?;
    }

    let mut engine = SessionEngine::with_defaults(FileStore::new(dir.path())?);
    assert!(engine.awaiting_restore_choice());
    engine.restore_session()?;
    assert_eq!(engine.pot(), 125);
    assert_eq!(engine.player(3).map(|p| p.balance), Some(375));
    assert_eq!(engine.total_chips(), Some(1500));
    Ok(())
}
