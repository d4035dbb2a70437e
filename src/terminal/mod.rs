// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The terminal engine.
//!
//! [`Terminal`] owns the output buffer, the program history and the active session. Every
//! mutation goes through `&mut self`, so the engine is driven from one thread and a command
//! always observes the completed effects of the previous one.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::api::TechnologyApi;
use crate::ascii::clamp_width;
use crate::auth::AuthSubscription;
use crate::config::TerminalConfig;
use crate::technology::Technology;

mod actions;
pub mod boot;
mod dispatch;
pub mod output;
pub mod program;
mod programs;
pub mod scroll;
mod search;
pub mod session;

pub use boot::{BootEvent, BootHandle, BootRequest, BootSequence};
pub use output::{LineAction, LineId, OutputLine, RichSpan, Rgb, Severity};
pub use program::{ProgramContext, ProgramId, ProgramKind, ProgramRegistry, TerminalProgram};
pub use scroll::{ScrollController, WheelDirection, WheelOutcome};
pub use session::{EditField, Session};

pub const PROMPT: &str = "EXO>";

/// A snapshot taken when a clearing program replaces the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: Option<ProgramId>,
    pub output: Vec<OutputLine>,
    pub technology: Option<Arc<Technology>>,
}

/// A local image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// An icon waiting for Save or Discard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPreview {
    pub technology: Arc<Technology>,
    pub file: IconFile,
}

/// State shared with running programs through [`ProgramContext`].
#[derive(Debug)]
pub(crate) struct TerminalState {
    pub(crate) output: Vec<OutputLine>,
    pub(crate) ascii_width: u16,
    pub(crate) prompt_enabled: bool,
    pub(crate) queued_commands: VecDeque<String>,
    pub(crate) know_executed: bool,
    pub(crate) session: Session,
    pub(crate) boot_request: Option<BootRequest>,
    pub(crate) icon_preview: Option<IconPreview>,
    pub(crate) draft_icon: Option<IconFile>,
}

impl TerminalState {
    fn new(config: &TerminalConfig) -> Self {
        Self {
            output: Vec::new(),
            ascii_width: clamp_width(i64::from(config.ascii_width)),
            prompt_enabled: true,
            queued_commands: VecDeque::new(),
            know_executed: false,
            session: Session::None,
            boot_request: None,
            icon_preview: None,
            draft_icon: None,
        }
    }
}

struct RunningBoot {
    _handle: BootHandle,
    events: UnboundedReceiver<BootEvent>,
}

pub struct Terminal {
    api: Arc<dyn TechnologyApi>,
    auth: AuthSubscription,
    config: TerminalConfig,
    registry: ProgramRegistry,
    state: TerminalState,
    history: Vec<HistoryEntry>,
    current_program: Option<ProgramId>,
    program_names: HashMap<ProgramId, String>,
    active_tech: Option<Arc<Technology>>,
    selected: Option<usize>,
    input: String,
    pending_open: Option<String>,
    boot: Option<RunningBoot>,
    /// Bumped on every visible change; the host redraws when it moves.
    rev: u64,
}

impl Terminal {
    pub fn new(api: Arc<dyn TechnologyApi>, auth: AuthSubscription, config: TerminalConfig) -> Self {
        let state = TerminalState::new(&config);
        Self {
            api,
            auth,
            config,
            registry: ProgramRegistry::builtin(),
            state,
            history: Vec::new(),
            current_program: None,
            program_names: HashMap::new(),
            active_tech: None,
            selected: None,
            input: String::new(),
            pending_open: None,
            boot: None,
            rev: 0,
        }
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProgramRegistry {
        &self.registry
    }

    pub fn output(&self) -> &[OutputLine] {
        &self.state.output
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn current_program(&self) -> Option<&ProgramId> {
        self.current_program.as_ref()
    }

    pub fn active_technology(&self) -> Option<&Arc<Technology>> {
        self.active_tech.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn icon_preview(&self) -> Option<&IconPreview> {
        self.state.icon_preview.as_ref()
    }

    pub fn ascii_width(&self) -> u16 {
        self.state.ascii_width
    }

    pub fn prompt_enabled(&self) -> bool {
        self.state.prompt_enabled
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn is_admin(&mut self) -> bool {
        if self.auth.take_changed() {
            debug!(admin = self.auth.is_admin(), "auth state changed");
            self.touch();
        }
        self.auth.is_admin()
    }

    /// Display name recorded for `id` when it last ran.
    pub fn program_name(&self, id: &str) -> Option<&str> {
        self.program_names.get(id).map(String::as_str)
    }

    pub fn take_open_url(&mut self) -> Option<String> {
        self.pending_open.take()
    }

    fn touch(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn push_char(&mut self, ch: char) {
        if !self.state.prompt_enabled {
            return;
        }
        self.input.push(ch);
        self.selected = None;
        self.touch();
    }

    /// Removes the last input character unless a line is selected.
    pub fn backspace(&mut self) {
        if !self.state.prompt_enabled || self.selected.is_some() {
            return;
        }
        self.input.pop();
        self.touch();
    }

    pub fn select_previous(&mut self) {
        if !self.state.prompt_enabled || self.state.output.is_empty() {
            return;
        }
        let last = self.state.output.len() - 1;
        self.selected = Some(match self.selected {
            None => last,
            Some(index) => index.saturating_sub(1).min(last),
        });
        self.touch();
    }

    pub fn select_next(&mut self) {
        if !self.state.prompt_enabled || self.state.output.is_empty() {
            return;
        }
        let last = self.state.output.len() - 1;
        self.selected = Some(match self.selected {
            None => 0,
            Some(index) => (index + 1).min(last),
        });
        self.touch();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.touch();
    }

    /// Enter: activates the selected line, otherwise submits non-empty input.
    pub fn submit(&mut self) {
        if !self.state.prompt_enabled {
            return;
        }
        if let Some(index) = self.selected {
            self.activate_line(index);
            return;
        }
        let input = std::mem::take(&mut self.input);
        if input.trim().is_empty() {
            self.input = input;
            return;
        }
        self.execute_command(&input);
    }

    /// Runs `program`, handling screen clearing, history and the trailing navigation lines.
    pub fn run_program(&mut self, program: &TerminalProgram, args: &[String]) {
        let is_admin = self.is_admin();
        debug!(program = %program.id(), ?args, "run program");
        self.program_names
            .insert(program.id().clone(), program.display_name().to_owned());

        if program.id() == program::EXO_PROGRAM_ID {
            self.history.clear();
            self.current_program = None;
            self.active_tech = None;
            self.state.session = Session::None;
            self.state.icon_preview = None;
            self.run_in_context(program, args, is_admin);
            self.reset_prompt();
            return;
        }

        let first_know = program.id() == program::KNOW_PROGRAM_ID && !self.state.know_executed;
        let will_clear = program.clears() && !first_know;
        let had_current = self.current_program.is_some();

        if will_clear {
            let output = std::mem::take(&mut self.state.output);
            if had_current {
                self.history.push(HistoryEntry {
                    id: self.current_program.clone(),
                    output,
                    technology: self.active_tech.clone(),
                });
            }
            self.active_tech = program.technology().cloned();
        }

        self.run_in_context(program, args, is_admin);

        if is_admin && program.is_details() {
            if let Some(tech) = program.technology() {
                self.state
                    .output
                    .push(OutputLine::edit("Edit", LineAction::EditMenu, tech));
            }
        }

        if will_clear && (!self.history.is_empty() || had_current) {
            let target = self
                .history
                .last()
                .and_then(|entry| entry.id.as_ref())
                .and_then(|id| self.program_names.get(id))
                .map(String::as_str);
            self.state.output.push(OutputLine::back(target));
        }

        if will_clear || !had_current {
            self.current_program = Some(program.id().clone());
        }
        self.reset_prompt();
    }

    fn run_in_context(&mut self, program: &TerminalProgram, args: &[String], is_admin: bool) {
        let api = Arc::clone(&self.api);
        let mut ctx = ProgramContext::new(&mut self.state, api.as_ref(), is_admin);
        program.run(args, &mut ctx);
        self.touch();
    }

    fn reset_prompt(&mut self) {
        self.selected = None;
        self.input.clear();
    }

    /// Restores the previous screen. Returns `false` when there is nothing to go back to.
    pub fn go_back(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };
        debug!(to = ?entry.id, "back");
        self.state.output = entry.output;
        self.current_program = entry.id;
        self.active_tech = entry.technology;
        self.state.session = Session::None;
        self.state.icon_preview = None;
        self.reset_prompt();
        self.touch();
        true
    }

    /// Wipes output, history and the current program.
    pub fn nuke(&mut self) {
        self.state.output.clear();
        self.history.clear();
        self.current_program = None;
        self.active_tech = None;
        self.touch();
    }

    pub fn set_ascii_width(&mut self, width: i64) -> u16 {
        self.state.ascii_width = clamp_width(width);
        self.touch();
        self.state.ascii_width
    }

    /// Queues the boot animation followed by the configured autorun command.
    pub fn boot(&mut self) {
        self.state.output.clear();
        self.state.prompt_enabled = false;
        self.state.boot_request = Some(BootRequest {
            autorun: self.config.autorun_command.clone(),
        });
        self.touch();
    }

    pub fn has_pending_boot(&self) -> bool {
        self.state.boot_request.is_some()
    }

    pub fn is_booting(&self) -> bool {
        self.boot.is_some()
    }

    /// Starts a pending boot request as an animated task on `runtime`.
    ///
    /// A boot already in flight is aborted.
    pub fn spawn_pending_boot(&mut self, runtime: &tokio::runtime::Handle) {
        let Some(request) = self.state.boot_request.take() else {
            return;
        };
        let sequence = BootSequence::new(&self.config, request.autorun);
        let (handle, events) = boot::spawn_boot_sequence(runtime, sequence);
        self.boot = Some(RunningBoot {
            _handle: handle,
            events,
        });
    }

    /// Plays a pending boot request to completion without delays.
    pub fn complete_pending_boot(&mut self) {
        self.boot = None;
        let Some(request) = self.state.boot_request.take() else {
            return;
        };
        let sequence = BootSequence::new(&self.config, request.autorun);
        for event in sequence.steps() {
            self.apply_boot_event(event);
        }
    }

    /// Applies every boot event received so far. Returns `true` if anything changed.
    pub fn pump_boot(&mut self) -> bool {
        let mut events = Vec::new();
        let mut finished = false;
        if let Some(running) = self.boot.as_mut() {
            loop {
                match running.events.try_recv() {
                    Ok(event) => events.push(event),
                    Err(tokio::sync::mpsc::error::TryRecvError::Empty) => break,
                    Err(tokio::sync::mpsc::error::TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        let changed = !events.is_empty();
        for event in events {
            if event == BootEvent::Finished {
                finished = true;
            }
            self.apply_boot_event(event);
        }
        if finished {
            self.boot = None;
        }
        changed
    }

    pub fn apply_boot_event(&mut self, event: BootEvent) {
        match event {
            BootEvent::Line(text) => self.state.output.push(OutputLine::init(text)),
            BootEvent::Typed(text) => self.input = text,
            BootEvent::Submit(command) => {
                self.input.clear();
                self.execute_command(&command);
            }
            BootEvent::Finished => {
                self.input.clear();
                self.state.prompt_enabled = true;
            }
        }
        self.touch();
    }
}

#[cfg(test)]
mod tests;
