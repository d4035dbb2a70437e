// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Behavior of every program kind.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::output::{LineAction, OutputLine, RichSpan, Rgb, Severity};
use super::program::{ProgramContext, ProgramKind, TerminalProgram};
use super::search::rank_technologies;
use super::session::EditField;
use crate::ascii::{dominant_color, image_to_ascii};
use crate::technology::{compare_names, PageQuery, Technology, TechnologyField};

const UNCATEGORIZED: &str = "Uncategorized";
const CATEGORY_COLOR: Rgb = Rgb::new(0x5F, 0xD7, 0xFF);
const FETCH_ERROR: &str = "Error: unable to fetch technologies";

pub(super) fn run(program: &TerminalProgram, args: &[String], ctx: &mut ProgramContext<'_>) {
    match program.kind() {
        ProgramKind::Exo => run_exo(ctx),
        ProgramKind::Info => run_info(ctx),
        ProgramKind::Know if !args.is_empty() => {
            let query = args.join(" ");
            ctx.append(OutputLine::new(format!("Searching for '{query}'...")));
            ctx.execute_command(format!("find {query}"));
        }
        ProgramKind::Know => run_know(ctx),
        ProgramKind::Technologies => run_technologies(ctx),
        ProgramKind::Find => run_find(args, ctx),
        ProgramKind::Details(tech) => run_details(tech, ctx),
        ProgramKind::EditMenu(tech) => run_edit_menu(tech, ctx),
        ProgramKind::FieldEdit { tech, field } => run_field_edit(tech, *field, ctx),
        ProgramKind::IconEdit(tech) => run_icon_edit(tech, ctx),
        ProgramKind::CategoryEdit(tech) => run_category_edit(tech, ctx),
        ProgramKind::DeleteTechnology(tech) => run_delete(tech, ctx),
    }
}

fn run_exo(ctx: &mut ProgramContext<'_>) {
    ctx.clear_output();
    ctx.set_prompt_enabled(false);
    ctx.request_boot(None);
}

fn run_info(ctx: &mut ProgramContext<'_>) {
    let mut lines = [
        "Available commands:",
        "  info | help | ?       display this message",
        "  know | k              technologies grouped by category",
        "  technologies | tech   list technologies alphabetically",
        "  find <query>          search technologies by name",
        "  enhance <n>           set ASCII art width (10-100)",
        "  back | undo           go back to the previous program",
        "  clear | nuke          clear the screen",
        "  exo                   restart the console intro",
    ]
    .into_iter()
    .map(OutputLine::new)
    .collect::<Vec<_>>();

    if ctx.is_admin() {
        lines.push(OutputLine::blank());
        lines.extend(
            [
                "Admin commands:",
                "  edit [field]          edit the open technology (name, description, link, icon, category)",
                "  delete                delete the open technology",
                "  add                   create a new technology",
            ]
            .into_iter()
            .map(OutputLine::new),
        );
    }
    ctx.append_lines(lines);
}

fn fetch_all(ctx: &ProgramContext<'_>) -> Option<Vec<Arc<Technology>>> {
    match ctx.api().list(&PageQuery::all_by_name()) {
        Ok(page) => Some(page.content.into_iter().map(Arc::new).collect()),
        Err(err) => {
            warn!(error = %err, "failed to fetch technologies");
            None
        }
    }
}

fn run_know(ctx: &mut ProgramContext<'_>) {
    let Some(technologies) = fetch_all(ctx) else {
        ctx.append(OutputLine::error(FETCH_ERROR));
        return;
    };

    let mut groups: BTreeMap<String, Vec<Arc<Technology>>> = BTreeMap::new();
    for tech in technologies {
        let category = tech
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_owned();
        groups.entry(category).or_default().push(tech);
    }

    let mut categories = groups.into_iter().collect::<Vec<_>>();
    categories.sort_by(|(a, _), (b, _)| {
        (a == UNCATEGORIZED)
            .cmp(&(b == UNCATEGORIZED))
            .then_with(|| compare_names(a, b))
    });

    let mut lines = Vec::new();
    if categories.is_empty() {
        lines.push(OutputLine::new("No technologies yet."));
    }
    for (index, (category, mut techs)) in categories.into_iter().enumerate() {
        if index > 0 {
            lines.push(OutputLine::blank());
        }
        lines.push(OutputLine::rich(vec![
            RichSpan::colored(format!("[ {category} ]"), CATEGORY_COLOR).bold()
        ]));
        techs.sort_by(|a, b| compare_names(&a.name, &b.name));
        lines.extend(
            techs
                .iter()
                .map(|tech| OutputLine::new(format!("  {}", tech.name)).with_technology(tech)),
        );
    }

    if ctx.is_admin() {
        lines.push(OutputLine::blank());
        lines.push(OutputLine::action_line("+ Add new technology", LineAction::AddTechnology));
    }

    ctx.append_lines(lines);
    ctx.mark_technologies_executed();
}

fn run_technologies(ctx: &mut ProgramContext<'_>) {
    let Some(mut technologies) = fetch_all(ctx) else {
        ctx.append(OutputLine::error(FETCH_ERROR));
        return;
    };
    technologies.sort_by(|a, b| compare_names(&a.name, &b.name));
    ctx.append_lines(
        technologies
            .iter()
            .map(|tech| OutputLine::new(tech.name.clone()).with_technology(tech)),
    );
}

fn run_find(args: &[String], ctx: &mut ProgramContext<'_>) {
    let query = args.join(" ");
    if query.trim().is_empty() {
        ctx.append(OutputLine::warning("Usage: find <query>"));
        return;
    }
    let Some(technologies) = fetch_all(ctx) else {
        ctx.append(OutputLine::error(FETCH_ERROR));
        return;
    };

    let ranked = rank_technologies(&query, &technologies);
    if ranked.is_empty() {
        ctx.append(OutputLine::warning(format!("No technologies match '{query}'.")));
        return;
    }
    let mut lines = vec![OutputLine::new(format!("Results for '{query}':")), OutputLine::blank()];
    lines.extend(
        ranked
            .iter()
            .map(|tech| OutputLine::new(format!("  {}", tech.name)).with_technology(tech)),
    );
    ctx.append_lines(lines);
}

/// Colored ASCII rows for an icon image; empty when the image cannot be decoded.
pub(super) fn icon_lines(bytes: &[u8], width: u16) -> Vec<OutputLine> {
    match image_to_ascii(bytes, width) {
        Ok(art) => art.span_rows().into_iter().map(OutputLine::ascii).collect(),
        Err(err) => {
            debug!(error = %err, "icon not renderable");
            Vec::new()
        }
    }
}

fn run_details(tech: &Arc<Technology>, ctx: &mut ProgramContext<'_>) {
    let mut name_color = Rgb::WHITE;
    let mut lines = Vec::new();

    if let Some(id) = tech.id {
        match ctx.api().icon(id) {
            Ok(bytes) => {
                let ascii = icon_lines(&bytes, ctx.ascii_width());
                if !ascii.is_empty() {
                    lines.extend(ascii);
                    lines.push(OutputLine::blank());
                }
                name_color = dominant_color(&bytes).unwrap_or(Rgb::WHITE);
            }
            Err(err) => debug!(id, error = %err, "no icon"),
        }
    }

    lines.push(OutputLine::rich(vec![RichSpan::colored(tech.name.clone(), name_color)]));
    lines.push(OutputLine::blank());

    if let Some(description) = tech.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(OutputLine::new(description));
        lines.push(OutputLine::blank());
    }

    if let Some(link) = tech.link.as_deref().filter(|l| !l.is_empty()) {
        lines.push(
            OutputLine::new(format!("Link: {link}"))
                .with_rich(vec![
                    RichSpan::plain("Link: "),
                    RichSpan::colored(link, CATEGORY_COLOR),
                ])
                .with_link(link),
        );
    }

    ctx.append_lines(lines);
}

fn menu_entry(
    tech: &Arc<Technology>,
    creating: bool,
    label: &str,
    edit_label: &str,
    is_set: bool,
    action: LineAction,
) -> OutputLine {
    if creating {
        let text = if is_set { format!("{label} ✓") } else { label.to_owned() };
        let line = OutputLine::edit(text, action, tech);
        if is_set {
            line.with_severity(Severity::Success)
        } else {
            line
        }
    } else {
        OutputLine::edit(edit_label, action, tech)
    }
}

fn run_edit_menu(tech: &Arc<Technology>, ctx: &mut ProgramContext<'_>) {
    if !ctx.is_admin() {
        ctx.append(OutputLine::error("Unauthorized. This command is for admins only."));
        return;
    }

    let creating = tech.is_draft();
    let header = if creating {
        "Fill in the new technology fields:".to_owned()
    } else {
        format!("What would you like to edit for {}?", tech.name)
    };
    let has_icon = tech.icon_string.is_some() || (creating && ctx.draft_icon().is_some());

    let mut lines = vec![
        OutputLine::new(header),
        OutputLine::blank(),
        menu_entry(
            tech,
            creating,
            "Set Name",
            "Edit Name",
            !tech.name.is_empty(),
            LineAction::EditField(TechnologyField::Name),
        ),
        menu_entry(
            tech,
            creating,
            "Set Description",
            "Edit Description",
            tech.description.is_some(),
            LineAction::EditField(TechnologyField::Description),
        ),
        menu_entry(
            tech,
            creating,
            "Set Link",
            "Edit Link",
            tech.link.is_some(),
            LineAction::EditField(TechnologyField::Link),
        ),
        menu_entry(
            tech,
            creating,
            "Set Category",
            "Edit Category",
            tech.category.is_some(),
            LineAction::EditCategory,
        ),
        menu_entry(tech, creating, "Set Icon", "Change Icon", has_icon, LineAction::EditIcon),
        OutputLine::blank(),
    ];

    if creating {
        lines.push(OutputLine::edit("Save New Technology", LineAction::CreateSave, tech));
        lines.push(OutputLine::edit("Cancel", LineAction::CreateCancel, tech));
    } else {
        lines.push(
            OutputLine::edit("DELETE Technology", LineAction::DeleteTechnology, tech)
                .with_severity(Severity::Error),
        );
    }
    ctx.append_lines(lines);
}

fn run_field_edit(tech: &Arc<Technology>, field: TechnologyField, ctx: &mut ProgramContext<'_>) {
    if !ctx.is_admin() {
        ctx.append(OutputLine::error("Unauthorized. Admins only."));
        return;
    }

    ctx.start_field_edit_session(tech, EditField::Text(field));
    let current = tech.field(field).unwrap_or("<empty>");
    ctx.append_lines([
        OutputLine::new(format!("{} editing mode", field.pretty())),
        OutputLine::blank(),
        OutputLine::new(format!("Current {field}: {current}")),
        OutputLine::blank(),
        OutputLine::new(format!("Type the new {field} and press Enter to save.")),
        OutputLine::new("Or type 'cancel' to abort."),
    ]);
}

fn run_icon_edit(tech: &Arc<Technology>, ctx: &mut ProgramContext<'_>) {
    if !ctx.is_admin() {
        ctx.append(OutputLine::error("Unauthorized"));
        return;
    }

    let mut lines = Vec::new();
    if let Some(id) = tech.id {
        if let Ok(bytes) = ctx.api().icon(id) {
            lines.extend(icon_lines(&bytes, ctx.ascii_width()));
        }
    } else if let Some(file) = ctx.draft_icon() {
        lines.extend(icon_lines(&file.bytes, ctx.ascii_width()));
    }
    lines.push(OutputLine::blank());

    if tech.is_draft() {
        lines.push(OutputLine::edit("Upload icon", LineAction::UploadIcon, tech));
    } else {
        lines.push(OutputLine::edit("Upload new icon", LineAction::UploadIcon, tech));
        lines.push(OutputLine::edit(
            "Set icon path",
            LineAction::EditField(TechnologyField::IconPath),
            tech,
        ));
    }
    ctx.append_lines(lines);
}

fn run_category_edit(tech: &Arc<Technology>, ctx: &mut ProgramContext<'_>) {
    if !ctx.is_admin() {
        ctx.append(OutputLine::error("Unauthorized"));
        return;
    }

    ctx.start_field_edit_session(tech, EditField::Text(TechnologyField::Category));

    let categories = match ctx.api().categories() {
        Ok(categories) => categories,
        Err(err) => {
            warn!(error = %err, "failed to fetch categories");
            ctx.append_lines([
                OutputLine::error("Error: Unable to fetch categories"),
                OutputLine::new("Type a category name and press Enter, or 'cancel' to abort."),
            ]);
            return;
        }
    };

    let heading = if tech.is_draft() {
        "Choose a category for the new technology:".to_owned()
    } else {
        format!("Current category: {}", tech.category.as_deref().unwrap_or("<empty>"))
    };
    let mut lines = vec![
        OutputLine::new(heading),
        OutputLine::blank(),
        OutputLine::new("Available categories:"),
        OutputLine::blank(),
    ];
    lines.extend(categories.into_iter().enumerate().map(|(index, category)| {
        OutputLine::edit(
            format!("{}. {category}", index + 1),
            LineAction::SelectCategory(category),
            tech,
        )
    }));
    lines.extend([
        OutputLine::blank(),
        OutputLine::new("Or type a new category name and press Enter."),
        OutputLine::new("Type 'cancel' to abort."),
    ]);
    ctx.append_lines(lines);
}

fn run_delete(tech: &Arc<Technology>, ctx: &mut ProgramContext<'_>) {
    if !ctx.is_admin() {
        ctx.append(OutputLine::error("Unauthorized. Admins only."));
        return;
    }

    ctx.start_delete_session(tech);
    ctx.append_lines([
        OutputLine::new(format!("Are you sure you want to DELETE '{}'?", tech.name)),
        OutputLine::warning("This action is irreversible."),
        OutputLine::blank(),
        OutputLine::edit("YES", LineAction::ConfirmDelete, tech).with_severity(Severity::Error),
        OutputLine::edit("NO", LineAction::CancelDelete, tech),
        OutputLine::blank(),
        OutputLine::new("(Alternatively, type 'y' or 'n' then Enter.)"),
    ]);
}
