//! The interactive flow: one `Session` driven through a strictly ordered
//! set of asynchronous steps.
//!
//! The controller is [`Session::handle`]: a function of (current state,
//! message) producing zero or one follow-up [`Action`]. Step functions run
//! elsewhere and never touch the `Session`; each posts exactly one
//! completion message, and the controller applies the state change and any
//! accompanying field updates atomically when it arrives. Every state
//! transition performs exactly one side effect, so the flow stays
//! auditable step by step.

use crate::error::StepError;
use crate::version::{Increment, PREVIEW_UNKNOWN};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use semver::Version;

/// Title shown above the increment list.
pub const SELECT_TITLE: &str = "What semver increment do you want to do?";

/// States of the release flow, entered strictly in order. The path
/// collection branch only runs when the sync script does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Init,
    Initialized,
    CheckingFiles,
    FilesChecked,
    FilesNotFound,
    CollectIosPath,
    CollectAndroidPath,
    CreatingScripts,
    CreatedScripts,
    SelectingIncrement,
    IncrementApplied,
    SyncingPlatform,
    Done,
}

/// Which of the two script locations is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathField {
    IosPlist,
    AndroidGradle,
}

/// Completion event posted by a step function: the state reached, plus any
/// data produced on the way there.
#[derive(Debug)]
pub enum StateMsg {
    Initialized,
    CheckingFiles,
    ScriptFound,
    ScriptMissing,
    CollectIosPath,
    ScriptWritten,
    VersionLoaded(Version),
    VersionBumped,
    PlatformSynced,
}

/// Everything the event loop can deliver to the controller.
#[derive(Debug)]
pub enum Msg {
    /// A step function finished, successfully or fatally.
    Step(Result<StateMsg, StepError>),
    /// A key press.
    Key(KeyEvent),
    /// Terminal resized; the next draw picks up the new size.
    Resize(u16, u16),
    /// Spinner frame tick.
    Tick,
}

/// Background work item the controller schedules. At most one is in
/// flight at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create the config directory.
    Init,
    /// Perceived-progress delay before the file check.
    StartFileCheck,
    /// List the config directory for the sync script.
    CheckFiles,
    /// Hand over to the first path prompt.
    StartPathCollection,
    /// Render and write the sync script.
    WriteScript {
        ios_plist: String,
        android_gradle: String,
    },
    /// Read and parse the project manifest.
    ReadManifest,
    /// Run the external version bump command.
    Bump(Increment),
    /// Run the generated sync script.
    SyncPlatform,
}

/// Follow-up produced by the controller for one message.
#[derive(Debug)]
pub enum Action {
    /// Spawn this step in the background.
    Run(Step),
    /// Terminate the event loop successfully.
    Quit,
    /// Terminate the event loop with a fatal error.
    Fail(StepError),
}

// Fatal errors compare by kind only; the payloads are for display.
impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Action::Run(a), Action::Run(b)) => a == b,
            (Action::Quit, Action::Quit) => true,
            (Action::Fail(a), Action::Fail(b)) => {
                std::mem::discriminant(a) == std::mem::discriminant(b)
            }
            _ => false,
        }
    }
}

impl Eq for Action {}

/// One row of the increment selection list.
#[derive(Debug, Clone)]
pub struct IncrementChoice {
    pub kind: Increment,
    pub preview: String,
}

/// Single-line text input state.
#[derive(Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            // Step back over one char, not one byte
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor -= prev;
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Take the current value, leaving the field empty for the next prompt.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}

/// The whole interactive session. Created once at startup, written only by
/// [`Session::handle`], discarded at process exit.
#[derive(Debug)]
pub struct Session {
    pub state: FlowState,
    pub process_label: &'static str,
    pub manifest_version: Option<Version>,
    pub selected_increment: Option<Increment>,
    pub scripts_needed: bool,
    pub pending_field: Option<PathField>,
    pub ios_plist: String,
    pub android_gradle: String,
    pub choices: Vec<IncrementChoice>,
    pub cursor: usize,
    pub input: InputField,
    pub tick: usize,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: FlowState::Init,
            process_label: "Initializing",
            manifest_version: None,
            selected_increment: None,
            scripts_needed: false,
            pending_field: None,
            ios_plist: String::new(),
            android_gradle: String::new(),
            choices: Vec::new(),
            cursor: 0,
            input: InputField::default(),
            tick: 0,
        }
    }

    /// First step to schedule when the loop starts.
    pub fn start(&self) -> Action {
        Action::Run(Step::Init)
    }

    /// Apply one message. Returns the single follow-up action, if any.
    pub fn handle(&mut self, msg: Msg) -> Option<Action> {
        match msg {
            Msg::Tick => {
                self.tick = self.tick.wrapping_add(1);
                None
            }
            Msg::Resize(_, _) => None,
            Msg::Key(key) => self.handle_key(key),
            Msg::Step(Ok(state)) => self.apply(state),
            Msg::Step(Err(e)) => Some(Action::Fail(e)),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Force quit, regardless of state; no in-flight step is awaited
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match key.code {
            KeyCode::Enter => self.confirm(),
            code => {
                self.feed(code);
                None
            }
        }
    }

    /// Handle the confirm key for whichever widget is active.
    fn confirm(&mut self) -> Option<Action> {
        match self.state {
            FlowState::CollectIosPath => {
                let value = self.input.take();
                if value.is_empty() {
                    return None;
                }
                self.ios_plist = value;
                self.pending_field = Some(PathField::AndroidGradle);
                self.state = FlowState::CollectAndroidPath;
                None
            }
            FlowState::CollectAndroidPath => {
                let value = self.input.take();
                if value.is_empty() {
                    return None;
                }
                self.android_gradle = value;
                self.pending_field = None;
                self.state = FlowState::CreatingScripts;
                self.process_label = "Creating Scripts";
                Some(Action::Run(Step::WriteScript {
                    ios_plist: self.ios_plist.clone(),
                    android_gradle: self.android_gradle.clone(),
                }))
            }
            FlowState::SelectingIncrement => {
                let kind = self.choices.get(self.cursor)?.kind;
                self.selected_increment = Some(kind);
                self.state = FlowState::IncrementApplied;
                self.process_label = "Bumping version";
                Some(Action::Run(Step::Bump(kind)))
            }
            _ => None,
        }
    }

    /// Feed a non-confirm key to the active widget.
    fn feed(&mut self, code: KeyCode) {
        match self.state {
            FlowState::CollectIosPath | FlowState::CollectAndroidPath => match code {
                KeyCode::Char(c) => self.input.insert(c),
                KeyCode::Backspace => self.input.delete_back(),
                KeyCode::Left => self.input.move_left(),
                KeyCode::Right => self.input.move_right(),
                _ => {}
            },
            FlowState::SelectingIncrement => match code {
                KeyCode::Up => {
                    self.cursor = self.cursor.saturating_sub(1);
                }
                KeyCode::Down => {
                    if self.cursor + 1 < self.choices.len() {
                        self.cursor += 1;
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Apply a step completion: enter the state it reports and schedule the
    /// next step, if the new state starts one.
    fn apply(&mut self, msg: StateMsg) -> Option<Action> {
        match msg {
            StateMsg::Initialized => {
                self.state = FlowState::Initialized;
                self.process_label = "Initialized";
                Some(Action::Run(Step::StartFileCheck))
            }
            StateMsg::CheckingFiles => {
                self.state = FlowState::CheckingFiles;
                self.process_label = "Check if script exists";
                Some(Action::Run(Step::CheckFiles))
            }
            StateMsg::ScriptFound => {
                self.state = FlowState::FilesChecked;
                self.process_label = "Looking for versioning data";
                Some(Action::Run(Step::ReadManifest))
            }
            StateMsg::ScriptMissing => {
                self.scripts_needed = true;
                self.state = FlowState::FilesNotFound;
                Some(Action::Run(Step::StartPathCollection))
            }
            StateMsg::CollectIosPath => {
                self.pending_field = Some(PathField::IosPlist);
                self.state = FlowState::CollectIosPath;
                None
            }
            StateMsg::ScriptWritten => {
                self.scripts_needed = false;
                self.state = FlowState::CreatedScripts;
                self.process_label = "Looking for versioning data";
                Some(Action::Run(Step::ReadManifest))
            }
            StateMsg::VersionLoaded(version) => {
                self.choices = build_choices(&version);
                self.cursor = 0;
                self.manifest_version = Some(version);
                self.state = FlowState::SelectingIncrement;
                None
            }
            StateMsg::VersionBumped => {
                self.state = FlowState::SyncingPlatform;
                self.process_label = "Syncing version with platform files";
                Some(Action::Run(Step::SyncPlatform))
            }
            StateMsg::PlatformSynced => {
                self.state = FlowState::Done;
                Some(Action::Quit)
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Annotate every increment kind with its predicted result, or the fixed
/// placeholder where prediction is not supported.
fn build_choices(current: &Version) -> Vec<IncrementChoice> {
    Increment::ALL
        .iter()
        .map(|&kind| IncrementChoice {
            kind,
            preview: kind
                .preview(current)
                .map(|v| v.to_string())
                .unwrap_or_else(|| PREVIEW_UNKNOWN.to_string()),
        })
        .collect()
}
