//! End-to-end Pomodoro scenarios.
//!
//! Drives the engine tick by tick and forwards completions to the in-memory
//! log and an in-memory SQLite database, the way a host application would.

use studydash_core::{
    dispatch, ConfigError, Database, Event, PomodoroEngine, SessionLog, TimerConfiguration,
    TimerMode,
};

fn classic() -> TimerConfiguration {
    TimerConfiguration {
        work_minutes: 25,
        short_break_minutes: 5,
        long_break_minutes: 15,
        sessions_before_long_break: 4,
        auto_start_breaks: false,
        auto_start_work: false,
    }
}

/// Start the current interval and tick it to completion, recording it.
fn run_interval(engine: &mut PomodoroEngine, log: &mut SessionLog, db: &mut Database) -> Event {
    engine.start();
    loop {
        if let Some(event) = engine.tick() {
            dispatch(&event, &mut [&mut *log, &mut *db]).unwrap();
            return event;
        }
    }
}

#[test]
fn first_work_session_leads_to_short_break() {
    let mut engine = PomodoroEngine::new(classic()).unwrap();
    let mut log = SessionLog::new();
    let mut db = Database::open_memory().unwrap();

    engine.start();
    let mut ticks = 0;
    while engine.is_running() {
        ticks += 1;
        if let Some(event) = engine.tick() {
            dispatch(&event, &mut [&mut log, &mut db]).unwrap();
        }
    }

    assert_eq!(ticks, 1500);
    assert_eq!(engine.completed_work_sessions(), 1);
    assert_eq!(engine.mode(), TimerMode::ShortBreak);
    assert_eq!(engine.remaining_seconds(), 300);
    assert!(!engine.is_running());

    assert_eq!(log.len(), 1);
    assert_eq!(log.records()[0].mode, TimerMode::Work);
    assert_eq!(log.records()[0].duration_minutes, 25);
    assert_eq!(db.sessions().unwrap(), log.records());
}

#[test]
fn fourth_completion_is_a_long_break() {
    let mut engine = PomodoroEngine::new(classic()).unwrap();
    let mut log = SessionLog::new();
    let mut db = Database::open_memory().unwrap();

    for _ in 0..3 {
        run_interval(&mut engine, &mut log, &mut db);
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        run_interval(&mut engine, &mut log, &mut db);
        assert_eq!(engine.mode(), TimerMode::Work);
    }
    match run_interval(&mut engine, &mut log, &mut db) {
        Event::IntervalCompleted {
            next_mode,
            completed_work_sessions,
            ..
        } => {
            assert_eq!(next_mode, TimerMode::LongBreak);
            assert_eq!(completed_work_sessions, 4);
        }
        other => panic!("expected IntervalCompleted, got {other:?}"),
    }
    assert_eq!(engine.mode(), TimerMode::LongBreak);
    assert_eq!(engine.remaining_seconds(), 900);

    let stats = db.stats_all().unwrap();
    assert_eq!(stats.work_sessions, 4);
    assert_eq!(stats.short_breaks, 3);
    assert_eq!(stats.total_work_minutes, 100);
    assert_eq!(stats.total_break_minutes, 15);
    assert_eq!(log.stats(), stats);
}

#[test]
fn auto_start_breaks_needs_no_start() {
    let mut engine = PomodoroEngine::new(TimerConfiguration {
        auto_start_breaks: true,
        ..classic()
    })
    .unwrap();
    let mut log = SessionLog::new();
    let mut db = Database::open_memory().unwrap();

    match run_interval(&mut engine, &mut log, &mut db) {
        Event::IntervalCompleted { auto_started, .. } => assert!(auto_started),
        other => panic!("expected IntervalCompleted, got {other:?}"),
    }
    assert_eq!(engine.mode(), TimerMode::ShortBreak);
    assert!(engine.is_running());

    // Keep ticking without calling start(): the break runs down too.
    let mut completion = None;
    for _ in 0..300 {
        completion = completion.or(engine.tick());
    }
    assert!(completion.is_some());
    assert_eq!(engine.mode(), TimerMode::Work);
    assert!(!engine.is_running());
}

#[test]
fn zero_work_minutes_is_rejected_without_touching_prior_state() {
    let mut engine = PomodoroEngine::new(classic()).unwrap();
    engine.start();
    engine.tick();
    let before = engine.clone();

    let bad = TimerConfiguration {
        work_minutes: 0,
        ..classic()
    };
    assert!(matches!(
        PomodoroEngine::new(bad),
        Err(ConfigError::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        engine.update_config(bad),
        Err(ConfigError::InvalidConfiguration { .. })
    ));
    assert_eq!(engine, before);
}

#[test]
fn recent_sessions_match_between_log_and_database() {
    let mut engine = PomodoroEngine::new(TimerConfiguration {
        work_minutes: 1,
        short_break_minutes: 1,
        ..classic()
    })
    .unwrap();
    let mut log = SessionLog::new();
    let mut db = Database::open_memory().unwrap();

    for _ in 0..6 {
        run_interval(&mut engine, &mut log, &mut db);
    }
    assert_eq!(log.recent(5), db.recent_sessions(5).unwrap());
    assert_eq!(log.recent(5).len(), 5);
}
