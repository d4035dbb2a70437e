// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command dispatch and interactive sessions.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, warn};

use super::output::{LineAction, OutputLine};
use super::program::TerminalProgram;
use super::programs::icon_lines;
use super::session::{is_cancel, Confirmation, EditField, Session};
use super::{IconFile, IconPreview, Terminal};
use crate::ascii::{MAX_ASCII_WIDTH, MIN_ASCII_WIDTH};
use crate::technology::{Technology, TechnologyField};

/// Largest icon file accepted for upload.
const MAX_ICON_BYTES: u64 = 5 * 1024 * 1024;

fn resolution_regex() -> Option<&'static Regex> {
    static RESOLUTION: OnceLock<Option<Regex>> = OnceLock::new();
    RESOLUTION
        .get_or_init(|| Regex::new(r"(?i)^(?:enhance|resolution)(?:\s+(\S+))?$").ok())
        .as_ref()
}

fn parse_field(arg: &str) -> Option<FieldTarget> {
    match arg.to_lowercase().as_str() {
        "name" => Some(FieldTarget::Text(TechnologyField::Name)),
        "description" => Some(FieldTarget::Text(TechnologyField::Description)),
        "link" => Some(FieldTarget::Text(TechnologyField::Link)),
        "icon" => Some(FieldTarget::Icon),
        "category" => Some(FieldTarget::Category),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldTarget {
    Text(TechnologyField),
    Icon,
    Category,
}

fn unknown_command(command: &str) -> OutputLine {
    OutputLine::error(format!("Unknown command: '{command}' (try 'info')"))
}

impl Terminal {
    /// Interprets one submitted line, then any commands programs queued while it ran.
    pub fn execute_command(&mut self, raw: &str) {
        self.dispatch(raw);
        while let Some(next) = self.state.queued_commands.pop_front() {
            self.dispatch(&next);
        }
    }

    fn dispatch(&mut self, raw: &str) {
        let input = raw.trim();
        if input.is_empty() {
            return;
        }
        debug!(input, "dispatch");
        self.state
            .output
            .push(OutputLine::echo(raw.trim_end_matches(['\r', '\n'])));

        match self.state.session.clone() {
            Session::FieldEdit { tech, field } => self.handle_field_input(&tech, field, input),
            Session::ConfirmDelete { tech } => self.handle_delete_input(&tech, input),
            Session::None => self.handle_command(input),
        }

        self.input.clear();
        self.selected = None;
        self.touch();
    }

    fn handle_command(&mut self, input: &str) {
        let mut tokens = input.split_whitespace();
        let Some(first) = tokens.next() else {
            return;
        };
        let command = first.to_lowercase();
        let args = tokens.map(str::to_owned).collect::<Vec<_>>();

        match command.as_str() {
            "nuke" | "clear" => self.nuke(),
            "undo" | "back" => {
                if !self.go_back() {
                    self.state.output.push(OutputLine::warning("Nothing to go back to."));
                }
            }
            "edit" if self.is_admin() => self.edit_command(args.first().map(String::as_str)),
            "delete" if self.is_admin() => match self.active_tech.clone() {
                Some(tech) if !tech.is_draft() => self.run_program(&TerminalProgram::delete(&tech), &[]),
                _ => self.state.output.push(OutputLine::error("No technology selected.")),
            },
            "add" if self.is_admin() => self.start_creation(),
            "edit" | "delete" | "add" => self.state.output.push(unknown_command(&command)),
            _ => {
                if let Some(captures) = resolution_regex().and_then(|re| re.captures(input)) {
                    let requested = captures.get(1).and_then(|m| m.as_str().parse::<i64>().ok());
                    self.resolution_command(requested);
                    return;
                }
                match self.registry.find(&command).cloned() {
                    Some(program) => self.run_program(&program, &args),
                    None => self.state.output.push(unknown_command(&command)),
                }
            }
        }
    }

    fn resolution_command(&mut self, requested: Option<i64>) {
        match requested {
            Some(width) => {
                let width = self.set_ascii_width(width);
                self.state
                    .output
                    .push(OutputLine::success(format!("ASCII width set to {width}.")));
            }
            None => self.state.output.push(OutputLine::warning(format!(
                "Usage: enhance <n> (n between {MIN_ASCII_WIDTH} and {MAX_ASCII_WIDTH})"
            ))),
        }
    }

    fn edit_command(&mut self, arg: Option<&str>) {
        let Some(tech) = self.active_tech.clone() else {
            self.state
                .output
                .push(OutputLine::error("No technology selected. Open one first."));
            return;
        };
        let program = match arg.and_then(parse_field) {
            Some(FieldTarget::Text(field)) => TerminalProgram::field_edit(&tech, field),
            Some(FieldTarget::Icon) => TerminalProgram::icon_edit(&tech),
            Some(FieldTarget::Category) => TerminalProgram::category_edit(&tech),
            None => TerminalProgram::edit_menu(&tech),
        };
        self.run_program(&program, &[]);
    }

    pub(super) fn start_creation(&mut self) {
        self.state.draft_icon = None;
        let draft = Arc::new(Technology::draft());
        self.run_program(&TerminalProgram::edit_menu(&draft), &[]);
    }

    /// Detail view for stored technologies, creation menu for drafts.
    pub(super) fn show_technology(&mut self, tech: &Arc<Technology>) {
        let program = if tech.is_draft() {
            TerminalProgram::edit_menu(tech)
        } else {
            TerminalProgram::details(tech)
        };
        self.run_program(&program, &[]);
    }

    /// Leaves an editing flow: the editing screens for `tech` are dropped from history and its
    /// detail view takes their place, so back returns to where editing started.
    pub(super) fn finish_editing(&mut self, tech: &Arc<Technology>) {
        if tech.id.is_none() {
            self.show_technology(tech);
            return;
        }
        while self
            .history
            .last()
            .and_then(|entry| entry.technology.as_ref())
            .is_some_and(|previous| previous.id == tech.id)
        {
            self.history.pop();
        }
        self.current_program = None;
        self.show_technology(tech);
    }

    fn handle_field_input(&mut self, tech: &Arc<Technology>, field: EditField, input: &str) {
        if is_cancel(input) {
            debug!(field = field.label(), "edit cancelled");
            self.state.session = Session::None;
            self.finish_editing(tech);
            return;
        }
        match field {
            EditField::Text(field) => self.apply_field(tech, field, input),
            EditField::IconFile => self.preview_icon_file(tech, input),
        }
    }

    /// Stores `value` into `field`: locally for drafts, through the service otherwise.
    pub(super) fn apply_field(&mut self, tech: &Arc<Technology>, field: TechnologyField, value: &str) {
        let Some(id) = tech.id else {
            self.state.session = Session::None;
            let draft = Arc::new(tech.with_field(field, value));
            self.run_program(&TerminalProgram::edit_menu(&draft), &[]);
            return;
        };

        let result = match field {
            TechnologyField::IconPath => self.api.update_icon_path(id, value),
            _ => self.api.update(id, &tech.with_field(field, value).to_request()),
        };
        match result {
            Ok(updated) => {
                let refreshed = self.api.get(id).unwrap_or(updated);
                let refreshed = Arc::new(refreshed);
                self.state.session = Session::None;
                self.active_tech = Some(Arc::clone(&refreshed));
                self.finish_editing(&refreshed);
                self.state
                    .output
                    .push(OutputLine::success(format!("{} updated.", field.pretty())));
            }
            Err(err) => {
                warn!(id, field = %field, error = %err, "update failed");
                self.state.session = Session::FieldEdit {
                    tech: Arc::clone(tech),
                    field: EditField::Text(field),
                };
                self.state.output.extend([
                    OutputLine::error(format!("Error: failed to update {field}: {err}")),
                    OutputLine::new(format!("Type the new {field} again, or 'cancel' to abort.")),
                ]);
            }
        }
    }

    fn preview_icon_file(&mut self, tech: &Arc<Technology>, input: &str) {
        let path = Path::new(input.trim_matches(|c| c == '"' || c == '\''));
        let file = match read_icon_file(path) {
            Ok(file) => file,
            Err(message) => {
                self.state.output.extend([
                    OutputLine::error(message),
                    OutputLine::new("Type another path, or 'cancel' to abort."),
                ]);
                return;
            }
        };

        let preview = icon_lines(&file.bytes, self.state.ascii_width);
        if preview.is_empty() {
            self.state.output.extend([
                OutputLine::error(format!("Error: '{}' is not a readable image", file.file_name)),
                OutputLine::new("Type another path, or 'cancel' to abort."),
            ]);
            return;
        }

        self.state.session = Session::None;
        self.state.output.extend(preview);
        self.state.output.extend([
            OutputLine::blank(),
            OutputLine::edit("Save", LineAction::IconSave, tech),
            OutputLine::edit("Discard", LineAction::IconDiscard, tech),
        ]);
        self.state.icon_preview = Some(IconPreview {
            technology: Arc::clone(tech),
            file,
        });
    }

    fn handle_delete_input(&mut self, tech: &Arc<Technology>, input: &str) {
        match Confirmation::parse(input) {
            Confirmation::Yes => self.confirm_delete(tech),
            Confirmation::No => self.cancel_delete(tech),
            Confirmation::Unrecognized => self
                .state
                .output
                .push(OutputLine::warning("Please type 'y' to confirm or 'n' to cancel.")),
        }
    }

    pub(super) fn confirm_delete(&mut self, tech: &Arc<Technology>) {
        self.state.session = Session::None;
        let Some(id) = tech.id else {
            return;
        };
        match self.api.delete(id) {
            Ok(()) => {
                debug!(id, "technology deleted");
                self.active_tech = None;
                if let Some(know) = self.registry.find("know").cloned() {
                    self.run_program(&know, &[]);
                }
                self.state
                    .output
                    .push(OutputLine::success(format!("Deleted '{}'.", tech.name)));
            }
            Err(err) => {
                warn!(id, error = %err, "delete failed");
                self.state
                    .output
                    .push(OutputLine::error(format!("Error: failed to delete '{}': {err}", tech.name)));
            }
        }
    }

    pub(super) fn cancel_delete(&mut self, tech: &Arc<Technology>) {
        self.state.session = Session::None;
        self.finish_editing(tech);
    }
}

fn read_icon_file(path: &Path) -> Result<IconFile, String> {
    let metadata =
        std::fs::metadata(path).map_err(|err| format!("Error: cannot open '{}': {err}", path.display()))?;
    if !metadata.is_file() {
        return Err(format!("Error: '{}' is not a file", path.display()));
    }
    if metadata.len() > MAX_ICON_BYTES {
        return Err(format!("Error: '{}' is larger than 5 MB", path.display()));
    }
    let bytes =
        std::fs::read(path).map_err(|err| format!("Error: cannot read '{}': {err}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icon".to_owned());
    Ok(IconFile { file_name, bytes })
}
