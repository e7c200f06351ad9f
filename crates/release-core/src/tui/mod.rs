//! Interactive terminal flow.
//!
//! One tokio task consumes a single mpsc queue of messages: key input and
//! resizes forwarded by a reader thread, step completions posted by
//! spawned step tasks, and spinner ticks. The `Session` is the only
//! mutable state and only the consumer writes it. Each scheduled step
//! posts exactly one completion message; the controller never schedules a
//! new step before consuming the previous completion.

pub mod flow;
mod view;

use crate::{manifest, process, project, script};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flow::{Action, Msg, Session, StateMsg, Step};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Fixed pause between visible steps, for perceived progress only.
const STEP_PAUSE: Duration = Duration::from_secs(2);

/// Spinner frame interval.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Run the interactive release flow for the project at `root`.
pub async fn run(root: &Path) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_input_reader(tx.clone());

    let mut session = Session::new();
    let result = event_loop(&mut terminal, &mut session, tx, rx, root).await;

    // Restore terminal before surfacing any error
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Forward crossterm events into the message queue from a blocking thread.
/// The thread ends with the process; once the receiver is gone the send
/// fails and the loop stops.
fn spawn_input_reader(tx: mpsc::UnboundedSender<Msg>) {
    std::thread::spawn(move || loop {
        let msg = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
            Ok(Event::Resize(w, h)) => Msg::Resize(w, h),
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.send(msg).is_err() {
            break;
        }
    });
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    tx: mpsc::UnboundedSender<Msg>,
    mut rx: mpsc::UnboundedReceiver<Msg>,
    root: &Path,
) -> Result<()> {
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    if let Action::Run(step) = session.start() {
        spawn_step(step, root.to_path_buf(), tx.clone());
    }

    loop {
        terminal.draw(|frame| view::render(frame, session))?;

        let msg = tokio::select! {
            msg = rx.recv() => match msg {
                Some(msg) => msg,
                // We hold a sender, so this only happens on shutdown
                None => return Ok(()),
            },
            _ = ticker.tick() => Msg::Tick,
        };

        match session.handle(msg) {
            Some(Action::Run(step)) => spawn_step(step, root.to_path_buf(), tx.clone()),
            Some(Action::Quit) => return Ok(()),
            Some(Action::Fail(e)) => return Err(e.into()),
            None => {}
        }
    }
}

/// Run one step in the background and post its single completion message.
fn spawn_step(step: Step, root: PathBuf, tx: mpsc::UnboundedSender<Msg>) {
    tokio::spawn(async move {
        let result = run_step(step, &root).await;
        let _ = tx.send(Msg::Step(result));
    });
}

/// Execute one unit of work and report the state it reached. Steps read
/// the filesystem and run processes but never see the `Session`.
async fn run_step(step: Step, root: &Path) -> Result<StateMsg, crate::StepError> {
    match step {
        Step::Init => {
            project::ensure_config_dir(root).await?;
            tokio::time::sleep(STEP_PAUSE).await;
            Ok(StateMsg::Initialized)
        }
        Step::StartFileCheck => Ok(StateMsg::CheckingFiles),
        Step::StartPathCollection => Ok(StateMsg::CollectIosPath),
        Step::CheckFiles => {
            if project::sync_script_exists(root).await? {
                Ok(StateMsg::ScriptFound)
            } else {
                Ok(StateMsg::ScriptMissing)
            }
        }
        Step::WriteScript {
            ios_plist,
            android_gradle,
        } => {
            script::write_sync_script(root, &ios_plist, &android_gradle).await?;
            tokio::time::sleep(STEP_PAUSE).await;
            Ok(StateMsg::ScriptWritten)
        }
        Step::ReadManifest => {
            let version = manifest::read_project_version(root).await?;
            tokio::time::sleep(STEP_PAUSE).await;
            Ok(StateMsg::VersionLoaded(version))
        }
        Step::Bump(increment) => {
            process::bump_version(root, increment).await?;
            Ok(StateMsg::VersionBumped)
        }
        Step::SyncPlatform => {
            process::run_sync_script(root).await?;
            tokio::time::sleep(STEP_PAUSE).await;
            Ok(StateMsg::PlatformSynced)
        }
    }
}
