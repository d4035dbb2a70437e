// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line activation (click or Enter on a selected line).

use std::sync::Arc;

use tracing::{debug, warn};

use super::output::{LineAction, OutputLine};
use super::program::TerminalProgram;
use super::session::{EditField, Session};
use super::Terminal;
use crate::technology::{Technology, TechnologyField};

impl Terminal {
    /// Resolves the line at `index`: link, back line, admin action, technology, else selection.
    pub fn activate_line(&mut self, index: usize) {
        let Some(line) = self.state.output.get(index).cloned() else {
            return;
        };

        if let Some(url) = line.link_url() {
            debug!(url, "open link");
            self.pending_open = Some(url.to_owned());
            self.touch();
            return;
        }

        if line.is_back_line() {
            self.go_back();
            return;
        }

        if line.is_edit_line() && self.is_admin() {
            if let Some(action) = line.action() {
                self.perform_action(action, line.technology());
                return;
            }
        }

        if let Some(tech) = line.technology() {
            self.show_technology(tech);
            return;
        }

        self.selected = if self.selected == Some(index) { None } else { Some(index) };
        self.touch();
    }

    fn perform_action(&mut self, action: &LineAction, tech: Option<&Arc<Technology>>) {
        debug!(%action, "line action");
        if let LineAction::AddTechnology = action {
            self.start_creation();
            return;
        }
        let Some(tech) = tech.cloned() else {
            warn!(%action, "action line without technology");
            return;
        };

        match action {
            LineAction::EditMenu => self.run_program(&TerminalProgram::edit_menu(&tech), &[]),
            LineAction::EditField(TechnologyField::Category) | LineAction::EditCategory => {
                self.run_program(&TerminalProgram::category_edit(&tech), &[]);
            }
            LineAction::EditField(field) => {
                self.run_program(&TerminalProgram::field_edit(&tech, *field), &[]);
            }
            LineAction::EditIcon => self.run_program(&TerminalProgram::icon_edit(&tech), &[]),
            LineAction::UploadIcon => self.start_icon_upload(&tech),
            LineAction::SelectCategory(category) => {
                self.apply_field(&tech, TechnologyField::Category, category);
            }
            LineAction::DeleteTechnology => self.run_program(&TerminalProgram::delete(&tech), &[]),
            LineAction::ConfirmDelete => self.confirm_delete(&tech),
            LineAction::CancelDelete => self.cancel_delete(&tech),
            LineAction::IconSave => self.save_icon_preview(),
            LineAction::IconDiscard => {
                self.state.icon_preview = None;
                self.run_program(&TerminalProgram::icon_edit(&tech), &[]);
            }
            LineAction::CreateSave => self.save_draft(&tech),
            LineAction::CreateCancel => {
                self.state.draft_icon = None;
                self.active_tech = None;
                if let Some(know) = self.registry.find("know").cloned() {
                    self.run_program(&know, &[]);
                }
            }
            LineAction::AddTechnology => self.start_creation(),
        }
    }

    fn start_icon_upload(&mut self, tech: &Arc<Technology>) {
        self.state.session = Session::FieldEdit {
            tech: Arc::clone(tech),
            field: EditField::IconFile,
        };
        self.state.output.extend([
            OutputLine::blank(),
            OutputLine::new("Type the path of a PNG or JPEG image and press Enter."),
            OutputLine::new("Or type 'cancel' to abort."),
        ]);
        self.reset_prompt();
        self.touch();
    }

    fn save_icon_preview(&mut self) {
        let Some(preview) = self.state.icon_preview.take() else {
            self.state.output.push(OutputLine::warning("No icon preview to save."));
            return;
        };

        let tech = preview.technology;
        let Some(id) = tech.id else {
            let draft = Arc::new(Technology {
                icon_string: Some(preview.file.file_name.clone()),
                ..(*tech).clone()
            });
            self.state.draft_icon = Some(preview.file);
            self.run_program(&TerminalProgram::edit_menu(&draft), &[]);
            return;
        };

        match self.api.upload_icon(id, &preview.file.file_name, &preview.file.bytes) {
            Ok(updated) => {
                let updated = Arc::new(updated);
                self.active_tech = Some(Arc::clone(&updated));
                self.finish_editing(&updated);
                self.state.output.push(OutputLine::success("Icon updated."));
            }
            Err(err) => {
                warn!(id, error = %err, "icon upload failed");
                self.state
                    .output
                    .push(OutputLine::error(format!("Error: failed to upload icon: {err}")));
                self.state.icon_preview = Some(super::IconPreview {
                    technology: tech,
                    file: preview.file,
                });
            }
        }
    }

    fn save_draft(&mut self, draft: &Arc<Technology>) {
        if draft.name.trim().is_empty() {
            self.state
                .output
                .push(OutputLine::error("A name is required before saving."));
            return;
        }

        let mut created = match self.api.create(&draft.to_request()) {
            Ok(created) => created,
            Err(err) => {
                warn!(error = %err, "create failed");
                self.state
                    .output
                    .push(OutputLine::error(format!("Error: failed to create technology: {err}")));
                return;
            }
        };

        if let (Some(id), Some(file)) = (created.id, self.state.draft_icon.take()) {
            match self.api.upload_icon(id, &file.file_name, &file.bytes) {
                Ok(with_icon) => created = with_icon,
                Err(err) => warn!(id, error = %err, "icon upload after create failed"),
            }
        }

        let created = Arc::new(created);
        self.active_tech = Some(Arc::clone(&created));
        self.show_technology(&created);
        self.state
            .output
            .push(OutputLine::success(format!("Created '{}'.", created.name)));
    }
}
