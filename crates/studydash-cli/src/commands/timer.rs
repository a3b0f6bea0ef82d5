use std::io;
use std::time::Duration;

use clap::Subcommand;
use studydash_core::storage::Database;
use studydash_core::{
    dispatch, Config, Event, PomodoroEngine, SessionObserver, Ticker, TimerCommand, TimerMode,
};
use tokio::sync::mpsc;

use crate::notify::Notifier;

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the current interval
    Start,
    /// Pause the current interval
    Pause,
    /// Rewind the current interval to its full length
    Reset,
    /// Switch to another mode (work, short-break, long-break)
    Switch {
        mode: TimerMode,
    },
    /// Deliver elapsed seconds to a running timer by hand
    Tick {
        #[arg(long, default_value = "1")]
        count: u64,
    },
    /// Run the timer in the foreground until the interval ends or Ctrl-C
    Run {
        /// Length of one tick in milliseconds
        #[arg(long, default_value = "1000")]
        period_ms: u64,
    },
    /// Start a new day: clear the completed work-session counter
    NewDay,
    /// Print current timer state as JSON
    Status,
}

/// Restore the persisted engine, or build a fresh one from the config file.
///
/// A timer configuration edited on disk since the last save replaces the
/// engine's configuration.
pub(crate) fn load_engine(db: &Database, config: &Config) -> Result<PomodoroEngine, Box<dyn std::error::Error>> {
    let stored = match db.kv_get(ENGINE_KEY)? {
        Some(json) => match serde_json::from_str::<PomodoroEngine>(&json) {
            Ok(engine) => Some(engine),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable timer state");
                None
            }
        },
        None => None,
    };

    match stored {
        Some(mut engine) => {
            if engine.config() != &config.timer {
                tracing::info!("timer configuration changed on disk, applying");
                engine.update_config(config.timer)?;
            }
            Ok(engine)
        }
        None => Ok(PomodoroEngine::new(config.timer)?),
    }
}

pub(crate) fn save_engine(db: &Database, engine: &PomodoroEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Print the event, or the current snapshot if the command was a no-op.
fn print_or_snapshot(event: Option<Event>, engine: &PomodoroEngine) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_event(&event),
        None => print_event(&engine.snapshot()),
    }
}

/// Store a completed interval and notify the user on stderr.
fn record_completion(db: &mut Database, notifier: &mut Notifier<io::Stderr>, event: &Event) {
    let mut observers: [&mut dyn SessionObserver; 2] = [db, notifier];
    if let Err(e) = dispatch(event, &mut observers) {
        tracing::error!(error = %e, "failed to record completed interval");
    }
}

fn run_foreground(
    db: &mut Database,
    notifier: &mut Notifier<io::Stderr>,
    mut engine: PomodoroEngine,
    period: Duration,
) -> Result<PomodoroEngine, Box<dyn std::error::Error>> {
    if let Some(event) = engine.start() {
        println!("{}", serde_json::to_string(&event)?);
    }
    if !engine.is_running() {
        return Ok(engine);
    }

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    rt.block_on(async {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
        let ticker = tokio::spawn(Ticker::new(engine, period).stop_when_idle(true).run(cmd_rx, ev_tx));

        let interrupt_tx = cmd_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = interrupt_tx.send(TimerCommand::Pause);
                let _ = interrupt_tx.send(TimerCommand::Shutdown);
            }
        });

        while let Some(event) = ev_rx.recv().await {
            println!("{}", serde_json::to_string(&event)?);
            record_completion(db, notifier, &event);
        }
        Ok::<_, Box<dyn std::error::Error>>(ticker.await?)
    })
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut db = Database::open()?;
    let mut engine = load_engine(&db, &config)?;
    let mut notifier = Notifier::new(config.notifications.clone(), io::stderr());

    match action {
        TimerAction::Start => {
            let event = engine.start();
            print_or_snapshot(event, &engine)?;
        }
        TimerAction::Pause => {
            let event = engine.pause();
            print_or_snapshot(event, &engine)?;
        }
        TimerAction::Reset => {
            let event = engine.reset();
            print_or_snapshot(event, &engine)?;
        }
        TimerAction::Switch { mode } => {
            let event = engine.switch_mode(mode);
            print_or_snapshot(event, &engine)?;
        }
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if let Some(event) = engine.tick() {
                    print_event(&event)?;
                    record_completion(&mut db, &mut notifier, &event);
                }
            }
            print_event(&engine.snapshot())?;
        }
        TimerAction::Run { period_ms } => {
            let period = Duration::from_millis(period_ms.max(1));
            engine = run_foreground(&mut db, &mut notifier, engine, period)?;
        }
        TimerAction::NewDay => {
            let event = engine.reset_sessions();
            print_or_snapshot(event, &engine)?;
        }
        TimerAction::Status => {
            print_event(&engine.snapshot())?;
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
