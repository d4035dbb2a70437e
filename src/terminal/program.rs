// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Programs, the registry of built-in commands, and the context a program runs against.

use std::sync::Arc;

use smol_str::{format_smolstr, SmolStr};

use super::boot::BootRequest;
use super::output::{next_line_id, LineId, OutputLine};
use super::session::{EditField, Session};
use super::{IconFile, IconPreview, TerminalState};
use crate::api::TechnologyApi;
use crate::ascii::clamp_width;
use crate::technology::{Technology, TechnologyField};

pub type ProgramId = SmolStr;

pub const EXO_PROGRAM_ID: &str = "exo";
pub const KNOW_PROGRAM_ID: &str = "know";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramKind {
    Exo,
    Info,
    Know,
    Technologies,
    Find,
    Details(Arc<Technology>),
    /// Edit menu; doubles as the creation menu for drafts.
    EditMenu(Arc<Technology>),
    FieldEdit {
        tech: Arc<Technology>,
        field: TechnologyField,
    },
    IconEdit(Arc<Technology>),
    CategoryEdit(Arc<Technology>),
    DeleteTechnology(Arc<Technology>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalProgram {
    id: ProgramId,
    display_name: String,
    aliases: &'static [&'static str],
    clear: bool,
    kind: ProgramKind,
}

impl TerminalProgram {
    fn builtin(
        id: &'static str,
        display_name: &str,
        aliases: &'static [&'static str],
        clear: bool,
        kind: ProgramKind,
    ) -> Self {
        Self {
            id: SmolStr::new_static(id),
            display_name: display_name.to_owned(),
            aliases,
            clear,
            kind,
        }
    }

    fn bound(id: ProgramId, display_name: String, kind: ProgramKind) -> Self {
        Self {
            id,
            display_name,
            aliases: &[],
            clear: true,
            kind,
        }
    }

    pub fn exo() -> Self {
        Self::builtin(EXO_PROGRAM_ID, "EXO Intro", &["exo"], true, ProgramKind::Exo)
    }

    pub fn info() -> Self {
        Self::builtin("info", "Info", &["info", "help", "?"], false, ProgramKind::Info)
    }

    pub fn know() -> Self {
        Self::builtin(KNOW_PROGRAM_ID, "Know", &["know", "k"], true, ProgramKind::Know)
    }

    pub fn technologies() -> Self {
        Self::builtin(
            "technologies",
            "Technologies",
            &["technologies", "tech", "technology"],
            true,
            ProgramKind::Technologies,
        )
    }

    pub fn find() -> Self {
        Self::builtin("find", "Find", &["find", "search"], true, ProgramKind::Find)
    }

    pub fn details(tech: &Arc<Technology>) -> Self {
        Self::bound(
            format_smolstr!("tech-detail-{}", tech.program_key()),
            tech.name.clone(),
            ProgramKind::Details(Arc::clone(tech)),
        )
    }

    pub fn edit_menu(tech: &Arc<Technology>) -> Self {
        let display_name = if tech.is_draft() {
            "Creating Technology".to_owned()
        } else {
            format!("Editing {}", tech.name)
        };
        Self::bound(
            format_smolstr!("tech-edit-{}", tech.program_key()),
            display_name,
            ProgramKind::EditMenu(Arc::clone(tech)),
        )
    }

    pub fn field_edit(tech: &Arc<Technology>, field: TechnologyField) -> Self {
        Self::bound(
            format_smolstr!("edit-field-{field}-{}", tech.program_key()),
            format!("Edit {}", field.pretty()),
            ProgramKind::FieldEdit {
                tech: Arc::clone(tech),
                field,
            },
        )
    }

    pub fn icon_edit(tech: &Arc<Technology>) -> Self {
        let display_name = if tech.is_draft() { "Set Icon" } else { "Edit Icon" };
        Self::bound(
            format_smolstr!("icon-edit-{}", tech.program_key()),
            display_name.to_owned(),
            ProgramKind::IconEdit(Arc::clone(tech)),
        )
    }

    pub fn category_edit(tech: &Arc<Technology>) -> Self {
        let display_name = if tech.is_draft() { "Set Category" } else { "Edit Category" };
        Self::bound(
            format_smolstr!("category-edit-{}", tech.program_key()),
            display_name.to_owned(),
            ProgramKind::CategoryEdit(Arc::clone(tech)),
        )
    }

    pub fn delete(tech: &Arc<Technology>) -> Self {
        Self::bound(
            format_smolstr!("delete-tech-{}", tech.program_key()),
            format!("Delete {}", tech.name),
            ProgramKind::DeleteTechnology(Arc::clone(tech)),
        )
    }

    pub fn id(&self) -> &ProgramId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    pub fn clears(&self) -> bool {
        self.clear
    }

    pub fn kind(&self) -> &ProgramKind {
        &self.kind
    }

    pub fn is_details(&self) -> bool {
        matches!(self.kind, ProgramKind::Details(_))
    }

    pub fn technology(&self) -> Option<&Arc<Technology>> {
        match &self.kind {
            ProgramKind::Exo
            | ProgramKind::Info
            | ProgramKind::Know
            | ProgramKind::Technologies
            | ProgramKind::Find => None,
            ProgramKind::Details(tech)
            | ProgramKind::EditMenu(tech)
            | ProgramKind::FieldEdit { tech, .. }
            | ProgramKind::IconEdit(tech)
            | ProgramKind::CategoryEdit(tech)
            | ProgramKind::DeleteTechnology(tech) => Some(tech),
        }
    }

    /// `token` must already be lowercased.
    pub fn matches_alias(&self, token: &str) -> bool {
        self.aliases.iter().any(|alias| *alias == token)
    }

    pub fn run(&self, args: &[String], ctx: &mut ProgramContext<'_>) {
        super::programs::run(self, args, ctx);
    }
}

/// Programs reachable by typing one of their aliases.
#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    programs: Vec<TerminalProgram>,
}

impl Default for ProgramRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProgramRegistry {
    pub fn builtin() -> Self {
        Self {
            programs: vec![
                TerminalProgram::exo(),
                TerminalProgram::info(),
                TerminalProgram::know(),
                TerminalProgram::technologies(),
                TerminalProgram::find(),
            ],
        }
    }

    /// First program whose alias equals `command` (case-insensitive).
    pub fn find(&self, command: &str) -> Option<&TerminalProgram> {
        let token = command.to_lowercase();
        self.programs.iter().find(|program| program.matches_alias(&token))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerminalProgram> {
        self.programs.iter()
    }
}

/// The only channel through which a running program touches terminal state.
pub struct ProgramContext<'a> {
    state: &'a mut TerminalState,
    api: &'a dyn TechnologyApi,
    is_admin: bool,
}

impl<'a> ProgramContext<'a> {
    pub(super) fn new(
        state: &'a mut TerminalState,
        api: &'a dyn TechnologyApi,
        is_admin: bool,
    ) -> Self {
        Self {
            state,
            api,
            is_admin,
        }
    }

    pub fn append(&mut self, line: OutputLine) {
        self.state.output.push(line);
    }

    pub fn append_lines(&mut self, lines: impl IntoIterator<Item = OutputLine>) {
        self.state.output.extend(lines);
    }

    pub fn set_output(&mut self, lines: Vec<OutputLine>) {
        self.state.output = lines;
    }

    pub fn clear_output(&mut self) {
        self.state.output.clear();
    }

    pub fn ascii_width(&self) -> u16 {
        self.state.ascii_width
    }

    pub fn set_ascii_width(&mut self, width: u16) {
        self.state.ascii_width = clamp_width(i64::from(width));
    }

    pub fn set_prompt_enabled(&mut self, enabled: bool) {
        self.state.prompt_enabled = enabled;
    }

    /// Queues `command`; it runs after the current command has finished.
    pub fn execute_command(&mut self, command: impl Into<String>) {
        self.state.queued_commands.push_back(command.into());
    }

    pub fn technologies_executed_once(&self) -> bool {
        self.state.know_executed
    }

    pub fn mark_technologies_executed(&mut self) {
        self.state.know_executed = true;
    }

    pub fn next_id(&self) -> LineId {
        next_line_id()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn start_field_edit_session(&mut self, tech: &Arc<Technology>, field: EditField) {
        self.state.session = Session::FieldEdit {
            tech: Arc::clone(tech),
            field,
        };
    }

    pub fn start_delete_session(&mut self, tech: &Arc<Technology>) {
        self.state.session = Session::ConfirmDelete {
            tech: Arc::clone(tech),
        };
    }

    pub fn request_boot(&mut self, autorun: Option<String>) {
        self.state.boot_request = Some(BootRequest { autorun });
    }

    pub fn api(&self) -> &dyn TechnologyApi {
        self.api
    }

    pub fn icon_preview(&self) -> Option<&IconPreview> {
        self.state.icon_preview.as_ref()
    }

    pub fn draft_icon(&self) -> Option<&IconFile> {
        self.state.draft_icon.as_ref()
    }
}
