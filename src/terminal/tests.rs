// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use super::*;
use crate::api::{ApiError, MemoryTechnologyApi, TechnologyApi};
use crate::auth::{AuthState, AuthStore};
use crate::technology::{Page, PageQuery, TechnologyField, TechnologyId, TechnologyRequest};

fn tech(name: &str, category: Option<&str>) -> Technology {
    Technology {
        name: name.to_owned(),
        category: category.map(str::to_owned),
        link: (name == "Rust").then(|| "https://www.rust-lang.org".to_owned()),
        ..Technology::default()
    }
}

/// Rust=1, Go=2, React=3, Ansible=4.
fn catalog() -> Arc<MemoryTechnologyApi> {
    Arc::new(MemoryTechnologyApi::with_technologies([
        tech("Rust", Some("Backend")),
        tech("Go", Some("Backend")),
        tech("React", Some("Frontend")),
        tech("Ansible", None),
    ]))
}

fn terminal_with(api: Arc<dyn TechnologyApi>, admin: bool) -> (Terminal, AuthStore) {
    let store = AuthStore::new(if admin { AuthState::local_admin() } else { AuthState::anonymous() });
    let terminal = Terminal::new(api, store.subscribe(), TerminalConfig::instant());
    (terminal, store)
}

fn terminal(api: &Arc<MemoryTechnologyApi>, admin: bool) -> (Terminal, AuthStore) {
    terminal_with(api.clone(), admin)
}

fn texts(terminal: &Terminal) -> Vec<String> {
    terminal.output().iter().map(|line| line.text().to_owned()).collect()
}

fn position(terminal: &Terminal, text: &str) -> usize {
    terminal
        .output()
        .iter()
        .position(|line| line.text().trim() == text)
        .unwrap_or_else(|| panic!("no line {text:?} in {:#?}", texts(terminal)))
}

fn click(terminal: &mut Terminal, text: &str) {
    let index = position(terminal, text);
    terminal.activate_line(index);
}

fn last_line(terminal: &Terminal) -> &OutputLine {
    terminal.output().last().expect("output is empty")
}

fn current(terminal: &Terminal) -> Option<&str> {
    terminal.current_program().map(|id| id.as_str())
}

fn open_rust(terminal: &mut Terminal) {
    terminal.execute_command("know");
    click(terminal, "Rust");
    assert_eq!(current(terminal), Some("tech-detail-1"));
}

#[test]
fn line_ids_strictly_increase_across_commands() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    for command in ["know", "info", "enhance 30", "technologies", "undo", "nope", "find go", "back"] {
        t.execute_command(command);
        let ids = t.output().iter().map(OutputLine::id).collect::<Vec<_>>();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "after {command}: {ids:?}");
    }
}

#[test]
fn first_know_keeps_screen_and_later_runs_clear() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("know");
    assert_eq!(t.output()[0].text(), "EXO> know");
    assert_eq!(current(&t), Some("know"));
    assert!(t.history().is_empty());

    t.execute_command("know");
    assert_eq!(t.history().len(), 1);
    assert_eq!(t.output()[0].text(), "[ Backend ]");
    assert_eq!(last_line(&t).text(), "< Back - Know");
}

#[test]
fn echo_keeps_the_command_as_typed() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("  KNOW ");
    assert_eq!(t.output()[0].text(), "EXO>   KNOW ");
    assert!(t.output()[0].is_echo());
    assert_eq!(current(&t), Some("know"));
}

#[test]
fn know_groups_by_category_with_uncategorized_last() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("know");
    assert_eq!(
        texts(&t)[1..],
        [
            "[ Backend ]",
            "  Go",
            "  Rust",
            " ",
            "[ Frontend ]",
            "  React",
            " ",
            "[ Uncategorized ]",
            "  Ansible",
        ]
    );
    assert!(t.output()[2].technology().is_some());
}

#[test]
fn admins_get_an_add_line_in_the_listing() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    t.execute_command("know");
    let line = last_line(&t);
    assert_eq!(line.text(), "+ Add new technology");
    assert_eq!(line.action(), Some(&LineAction::AddTechnology));
}

#[rstest]
#[case("technologies")]
#[case("find rust")]
#[case("k")]
fn clearing_program_is_undone_by_one_back(#[case] command: &str) {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("know");
    let before = t.output().to_vec();

    t.execute_command(command);
    let entry = t.history().last().cloned().expect("history entry");
    assert_eq!(entry.id.as_deref(), Some("know"));
    assert_eq!(entry.output[..before.len()], before[..]);
    assert_eq!(entry.output.len(), before.len() + 1);

    t.execute_command("undo");
    assert_eq!(t.output(), entry.output.as_slice());
    assert_eq!(current(&t), Some("know"));
    assert!(t.history().is_empty());
}

#[test]
fn undo_with_empty_history_only_warns() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("info");
    assert_eq!(current(&t), Some("info"));
    let before = t.output().to_vec();

    t.execute_command("undo");
    assert_eq!(t.output()[..before.len()], before[..]);
    let added = &t.output()[before.len()..];
    assert_eq!(added.len(), 2);
    assert!(added[0].is_echo());
    assert_eq!(added[1].severity(), Some(Severity::Warning));
    assert_eq!(current(&t), Some("info"));
}

#[rstest]
#[case("enhance 5", 10)]
#[case("enhance 500", 100)]
#[case("enhance 42", 42)]
#[case("RESOLUTION 64", 64)]
#[case("enhance -3", 10)]
fn resolution_is_clamped_without_clearing(#[case] command: &str, #[case] width: u16) {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("know");
    let before = t.output().to_vec();

    t.execute_command(command);
    assert_eq!(t.ascii_width(), width);
    assert_eq!(t.output()[..before.len()], before[..]);
    assert_eq!(t.output().len(), before.len() + 2);
}

#[rstest]
#[case("enhance")]
#[case("enhance lots")]
fn invalid_resolution_warns(#[case] command: &str) {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command(command);
    assert_eq!(t.ascii_width(), 40);
    assert_eq!(last_line(&t).severity(), Some(Severity::Warning));
}

#[rstest]
#[case("edit", "edit")]
#[case("edit name", "edit")]
#[case("delete", "delete")]
#[case("add", "add")]
#[case("ADD now", "add")]
#[case("frobnicate", "frobnicate")]
#[case("FOO bar", "foo")]
fn privileged_commands_look_unknown_to_visitors(#[case] input: &str, #[case] shown: &str) {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    open_rust(&mut t);

    t.execute_command(input);
    let line = last_line(&t);
    assert_eq!(line.text(), format!("Unknown command: '{shown}' (try 'info')"));
    assert_eq!(line.severity(), Some(Severity::Error));
    assert_eq!(current(&t), Some("tech-detail-1"));
}

#[test]
fn empty_input_is_ignored() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("   ");
    assert!(t.output().is_empty());
}

fn delete_session_for_rust() -> (Arc<MemoryTechnologyApi>, Terminal, AuthStore) {
    let api = catalog();
    let (mut t, auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("delete");
    assert!(matches!(t.session(), Session::ConfirmDelete { .. }));
    (api, t, auth)
}

#[rstest]
#[case("confirm")]
#[case("y")]
#[case("yes")]
#[case("YES")]
#[case("Yes")]
#[case("CONFIRM")]
fn confirming_deletes_once_and_lists(#[case] answer: &str) {
    let (api, mut t, _auth) = delete_session_for_rust();
    t.execute_command(answer);

    assert_eq!(api.calls().delete, 1);
    assert!(api.snapshot().iter().all(|tech| tech.name != "Rust"));
    assert_eq!(current(&t), Some("know"));
    assert!(!t.session().is_active());
    assert!(!texts(&t).iter().any(|text| text == "  Rust"));
    assert_eq!(last_line(&t).text(), "Deleted 'Rust'.");
}

#[rstest]
#[case("cancel")]
#[case("n")]
#[case("no")]
#[case("NO")]
fn declining_returns_to_details(#[case] answer: &str) {
    let (api, mut t, _auth) = delete_session_for_rust();
    t.execute_command(answer);

    assert_eq!(api.calls().delete, 0);
    assert_eq!(current(&t), Some("tech-detail-1"));
    assert!(!t.session().is_active());
}

#[rstest]
#[case("maybe")]
#[case("yess")]
#[case("delete")]
fn unclear_answers_reprompt(#[case] answer: &str) {
    let (api, mut t, _auth) = delete_session_for_rust();
    let before = t.output().len();
    t.execute_command(answer);

    assert_eq!(api.calls().delete, 0);
    assert!(matches!(t.session(), Session::ConfirmDelete { .. }));
    let added = &t.output()[before..];
    assert_eq!(added.len(), 2);
    assert!(added[0].is_echo());
    assert_eq!(added[1].severity(), Some(Severity::Warning));
}

#[test]
fn clicking_yes_line_deletes() {
    let (api, mut t, _auth) = delete_session_for_rust();
    click(&mut t, "YES");
    assert_eq!(api.calls().delete, 1);
    assert_eq!(current(&t), Some("know"));
}

#[test]
fn back_line_restores_listing_after_details() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("know");
    let listing = t.output().to_vec();

    click(&mut t, "Rust");
    assert_eq!(t.output()[0].text(), "Rust");
    assert_eq!(last_line(&t).text(), "< Back - Know");

    click(&mut t, "< Back - Know");
    assert_eq!(t.output(), listing.as_slice());
    assert_eq!(current(&t), Some("know"));
}

#[test]
fn exo_resets_program_and_history() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    open_rust(&mut t);
    t.execute_command("technologies");
    assert!(!t.history().is_empty());

    t.execute_command("exo");
    assert_eq!(current(&t), None);
    assert!(t.history().is_empty());
    assert!(t.output().is_empty());
    assert!(!t.prompt_enabled());
    assert!(t.has_pending_boot());

    t.complete_pending_boot();
    assert!(t.prompt_enabled());
    assert!(!t.output().is_empty());
    assert!(t.output().iter().all(OutputLine::is_init_line));
    assert_eq!(current(&t), None);
}

#[test]
fn boot_types_know_below_the_banner() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.boot();
    assert!(!t.prompt_enabled());
    t.complete_pending_boot();

    assert!(t.output()[0].is_init_line());
    let echo = position(&t, "EXO> know");
    assert!(t.output()[..echo].iter().all(OutputLine::is_init_line));
    assert!(texts(&t).iter().any(|text| text == "  Rust"));
    assert_eq!(current(&t), Some("know"));
    assert!(t.history().is_empty());
    assert!(t.prompt_enabled());
    assert!(t.input().is_empty());
}

#[test]
fn know_with_query_queues_a_search() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("know rus");
    assert_eq!(current(&t), Some("find"));
    position(&t, "Results for 'rus':");
    position(&t, "Rust");
    assert_eq!(last_line(&t).text(), "< Back - Know");
}

#[test]
fn details_show_admin_edit_line_before_back() {
    let api = catalog();
    let (mut admin, _a) = terminal(&api, true);
    open_rust(&mut admin);
    let edit = position(&admin, "Edit");
    assert_eq!(admin.output()[edit].action(), Some(&LineAction::EditMenu));
    assert_eq!(edit + 1, admin.output().len() - 1);

    let (mut visitor, _v) = terminal(&api, false);
    open_rust(&mut visitor);
    assert!(visitor.output().iter().all(|line| !line.is_edit_line()));
}

#[test]
fn link_lines_request_opening_the_url() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    open_rust(&mut t);
    click(&mut t, "Link: https://www.rust-lang.org");
    assert_eq!(t.take_open_url().as_deref(), Some("https://www.rust-lang.org"));
    assert_eq!(t.take_open_url(), None);
    assert_eq!(current(&t), Some("tech-detail-1"));
}

#[test]
fn plain_lines_toggle_selection() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    t.execute_command("info");
    t.activate_line(1);
    assert_eq!(t.selected(), Some(1));
    t.activate_line(1);
    assert_eq!(t.selected(), None);
}

#[test]
fn keyboard_input_builds_and_submits_commands() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    for ch in "infoo".chars() {
        t.push_char(ch);
    }
    t.backspace();
    assert_eq!(t.input(), "info");
    t.submit();
    assert_eq!(t.output()[0].text(), "EXO> info");
    assert!(t.input().is_empty());

    t.push_char('x');
    t.select_previous();
    assert_eq!(t.selected(), Some(t.output().len() - 1));
    t.backspace();
    assert_eq!(t.input(), "x");
    t.push_char('y');
    assert_eq!(t.selected(), None);
}

#[test]
fn field_edit_updates_and_confirms_below_details() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit description");
    assert_eq!(
        t.session(),
        &Session::FieldEdit {
            tech: Arc::clone(t.active_technology().expect("active")),
            field: EditField::Text(TechnologyField::Description),
        }
    );
    position(&t, "Current description: <empty>");

    t.execute_command("Memory safe.");
    assert_eq!(api.calls().update, 1);
    assert!(!t.session().is_active());
    assert_eq!(current(&t), Some("tech-detail-1"));
    assert!(position(&t, "Memory safe.") < position(&t, "Description updated."));
    assert_eq!(last_line(&t).text(), "Description updated.");
    assert_eq!(
        t.active_technology().and_then(|tech| tech.description.as_deref()),
        Some("Memory safe.")
    );
}

#[test]
fn failed_update_keeps_session_open() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit link");
    api.fail_next(ApiError::Status {
        code: 500,
        message: "boom".to_owned(),
    });

    t.execute_command("https://rust-lang.org");
    assert_eq!(api.calls().update, 1);
    assert!(matches!(t.session(), Session::FieldEdit { .. }));
    let output = t.output();
    assert_eq!(output[output.len() - 2].severity(), Some(Severity::Error));

    t.execute_command("https://doc.rust-lang.org");
    assert!(!t.session().is_active());
    assert_eq!(
        api.snapshot()[0].link.as_deref(),
        Some("https://doc.rust-lang.org")
    );
}

#[test]
fn cancel_leaves_field_untouched() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit name");
    t.execute_command("CANCEL");
    assert_eq!(api.calls().update, 0);
    assert!(!t.session().is_active());
    assert_eq!(current(&t), Some("tech-detail-1"));
}

#[test]
fn edit_without_field_opens_menu() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit whatever");
    assert_eq!(current(&t), Some("tech-edit-1"));
    position(&t, "Edit Name");
    assert_eq!(
        t.output()[position(&t, "DELETE Technology")].severity(),
        Some(Severity::Error)
    );
}

#[test]
fn edit_requires_an_open_technology() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    t.execute_command("know");
    t.execute_command("edit");
    assert_eq!(last_line(&t).severity(), Some(Severity::Error));
    assert_eq!(current(&t), Some("know"));
}

#[test]
fn drafts_collect_fields_locally_until_saved() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    t.execute_command("add");
    assert_eq!(current(&t), Some("tech-edit-"));
    position(&t, "Fill in the new technology fields:");

    click(&mut t, "Set Name");
    t.execute_command("Zig");
    assert_eq!(api.calls().update, 0);
    assert_eq!(api.calls().create, 0);
    let set = position(&t, "Set Name ✓");
    assert_eq!(t.output()[set].severity(), Some(Severity::Success));

    t.execute_command("edit link");
    t.execute_command("https://ziglang.org");
    position(&t, "Set Link ✓");

    click(&mut t, "Save New Technology");
    assert_eq!(api.calls().create, 1);
    let created = api.snapshot().into_iter().find(|tech| tech.name == "Zig").expect("created");
    assert_eq!(created.link.as_deref(), Some("https://ziglang.org"));
    assert_eq!(current(&t), Some("tech-detail-5"));
    assert_eq!(last_line(&t).text(), "Created 'Zig'.");
}

#[test]
fn saving_a_nameless_draft_is_refused() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    click_add_line(&mut t);
    click(&mut t, "Save New Technology");
    assert_eq!(api.calls().create, 0);
    assert_eq!(last_line(&t).severity(), Some(Severity::Error));
}

fn click_add_line(t: &mut Terminal) {
    t.execute_command("know");
    click(t, "+ Add new technology");
    assert_eq!(current(t), Some("tech-edit-"));
}

#[test]
fn cancelling_creation_returns_to_listing() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    click_add_line(&mut t);
    click(&mut t, "Cancel");
    assert_eq!(current(&t), Some("know"));
    assert!(t.active_technology().is_none());
}

#[test]
fn selecting_a_category_updates_it() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    t.execute_command("know");
    click(&mut t, "Go");
    t.execute_command("edit category");
    position(&t, "Current category: Backend");
    assert!(matches!(t.session(), Session::FieldEdit { .. }));

    click(&mut t, "2. Frontend");
    assert_eq!(api.calls().update, 1);
    assert!(!t.session().is_active());
    let go = api.snapshot().into_iter().find(|tech| tech.name == "Go").expect("go");
    assert_eq!(go.category.as_deref(), Some("Frontend"));
    assert_eq!(last_line(&t).text(), "Category updated.");
}

#[test]
fn failed_category_selection_keeps_session_open() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit category");
    api.fail_next(ApiError::Status {
        code: 500,
        message: "boom".to_owned(),
    });

    click(&mut t, "2. Frontend");
    assert_eq!(api.calls().update, 1);
    assert_eq!(
        t.session(),
        &Session::FieldEdit {
            tech: Arc::clone(t.active_technology().expect("active")),
            field: EditField::Text(TechnologyField::Category),
        }
    );
    assert_eq!(last_line(&t).text(), "Type the new category again, or 'cancel' to abort.");

    t.execute_command("Frontend");
    assert!(!t.session().is_active());
    assert!(!texts(&t).iter().any(|text| text.starts_with("Unknown command")));
    assert_eq!(api.snapshot()[0].category.as_deref(), Some("Frontend"));
    assert_eq!(last_line(&t).text(), "Category updated.");
}

#[rstest]
#[case::typed_command(false)]
#[case::edit_menu(true)]
fn updated_details_go_back_to_where_editing_started(#[case] via_menu: bool) {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    if via_menu {
        click(&mut t, "Edit");
        click(&mut t, "Edit Name");
    } else {
        t.execute_command("edit name");
    }

    t.execute_command("Ferris");
    assert_eq!(current(&t), Some("tech-detail-1"));
    assert_eq!(t.history().len(), 1);
    assert_eq!(last_line(&t).text(), "Name updated.");
    position(&t, "< Back - Know");

    t.execute_command("back");
    assert_eq!(current(&t), Some("know"));
    assert!(!texts(&t).iter().any(|text| text.starts_with("Type the new name")));
}

#[test]
fn cancelled_edit_does_not_leave_the_prompt_in_history() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit link");
    t.execute_command("cancel");
    assert_eq!(current(&t), Some("tech-detail-1"));
    position(&t, "< Back - Know");

    t.execute_command("back");
    assert_eq!(current(&t), Some("know"));
}

#[test]
fn typed_category_creates_a_new_one() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit category");
    t.execute_command("Systems");
    assert_eq!(api.categories().expect("categories"), vec!["Backend", "Frontend", "Systems"]);
}

fn write_icon(tag: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("exo-icon-{tag}-{}.png", std::process::id()));
    let bytes = crate::api::memory::disc_icon_png([200, 40, 40]).expect("png");
    std::fs::write(&path, bytes).expect("write icon");
    path
}

fn upload_prompt_for_rust() -> (Arc<MemoryTechnologyApi>, Terminal, AuthStore) {
    let api = catalog();
    let (mut t, auth) = terminal(&api, true);
    open_rust(&mut t);
    t.execute_command("edit icon");
    assert_eq!(current(&t), Some("icon-edit-1"));
    click(&mut t, "Upload new icon");
    assert_eq!(
        t.session(),
        &Session::FieldEdit {
            tech: Arc::clone(t.active_technology().expect("active")),
            field: EditField::IconFile,
        }
    );
    (api, t, auth)
}

#[test]
fn icon_preview_then_save_uploads() {
    let (api, mut t, _auth) = upload_prompt_for_rust();
    let path = write_icon("save");
    t.execute_command(&path.display().to_string());

    assert!(t.icon_preview().is_some());
    assert!(!t.session().is_active());
    assert!(t.output().iter().any(OutputLine::is_ascii_line));

    click(&mut t, "Save");
    assert_eq!(api.calls().upload_icon, 1);
    assert!(t.icon_preview().is_none());
    assert_eq!(current(&t), Some("tech-detail-1"));
    assert!(t.output().iter().any(OutputLine::is_ascii_line));
    assert_eq!(last_line(&t).text(), "Icon updated.");
    let _ = std::fs::remove_file(path);
}

#[test]
fn icon_preview_discard_returns_to_editor() {
    let (api, mut t, _auth) = upload_prompt_for_rust();
    let path = write_icon("discard");
    t.execute_command(&path.display().to_string());

    click(&mut t, "Discard");
    assert_eq!(api.calls().upload_icon, 0);
    assert!(t.icon_preview().is_none());
    assert_eq!(current(&t), Some("icon-edit-1"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn unreadable_icon_path_reprompts() {
    let (_api, mut t, _auth) = upload_prompt_for_rust();
    t.execute_command("/definitely/not/here.png");
    assert!(matches!(t.session(), Session::FieldEdit { field: EditField::IconFile, .. }));
    let output = t.output();
    assert_eq!(output[output.len() - 2].severity(), Some(Severity::Error));
}

#[test]
fn draft_icon_is_uploaded_after_create() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, true);
    t.execute_command("add");
    t.execute_command("edit name");
    t.execute_command("Zig");
    t.execute_command("edit icon");
    click(&mut t, "Upload icon");
    let path = write_icon("draft");
    t.execute_command(&path.display().to_string());
    click(&mut t, "Save");
    assert_eq!(api.calls().upload_icon, 0);
    position(&t, "Set Icon ✓");

    click(&mut t, "Save New Technology");
    assert_eq!(api.calls().create, 1);
    assert_eq!(api.calls().upload_icon, 1);
    let _ = std::fs::remove_file(path);
}

#[test]
fn listing_failure_is_reported_inline() {
    let api = catalog();
    let (mut t, _auth) = terminal(&api, false);
    api.fail_next(ApiError::Transport("offline".to_owned()));
    t.execute_command("know");
    let line = last_line(&t);
    assert_eq!(line.text(), "Error: unable to fetch technologies");
    assert_eq!(line.severity(), Some(Severity::Error));

    t.execute_command("know");
    position(&t, "Rust");
}

#[test]
fn auth_changes_are_observed_by_a_running_terminal() {
    let api = catalog();
    let (mut t, auth) = terminal(&api, false);
    open_rust(&mut t);
    t.execute_command("edit");
    assert_eq!(last_line(&t).text(), "Unknown command: 'edit' (try 'info')");

    auth.set(AuthState::local_admin());
    t.execute_command("edit");
    assert_eq!(current(&t), Some("tech-edit-1"));

    auth.logout();
    t.execute_command("delete");
    assert_eq!(last_line(&t).text(), "Unknown command: 'delete' (try 'info')");
}

/// Delegates to the in-memory catalog, stalling on every update.
struct SlowApi {
    inner: Arc<MemoryTechnologyApi>,
    delay: Duration,
}

impl TechnologyApi for SlowApi {
    fn list(&self, query: &PageQuery) -> Result<Page<Technology>, ApiError> {
        self.inner.list(query)
    }

    fn get(&self, id: TechnologyId) -> Result<Technology, ApiError> {
        self.inner.get(id)
    }

    fn create(&self, request: &TechnologyRequest) -> Result<Technology, ApiError> {
        self.inner.create(request)
    }

    fn update(&self, id: TechnologyId, request: &TechnologyRequest) -> Result<Technology, ApiError> {
        std::thread::sleep(self.delay);
        self.inner.update(id, request)
    }

    fn delete(&self, id: TechnologyId) -> Result<(), ApiError> {
        self.inner.delete(id)
    }

    fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.inner.categories()
    }

    fn icon(&self, id: TechnologyId) -> Result<Vec<u8>, ApiError> {
        self.inner.icon(id)
    }

    fn upload_icon(&self, id: TechnologyId, file_name: &str, bytes: &[u8]) -> Result<Technology, ApiError> {
        self.inner.upload_icon(id, file_name, bytes)
    }

    fn update_icon_path(&self, id: TechnologyId, path: &str) -> Result<Technology, ApiError> {
        self.inner.update_icon_path(id, path)
    }

    fn set_token(&self, token: Option<String>) {
        self.inner.set_token(token);
    }
}

#[test]
fn commands_run_to_completion_before_the_next_starts() {
    let api = catalog();
    let slow = Arc::new(SlowApi {
        inner: Arc::clone(&api),
        delay: Duration::from_millis(30),
    });
    let (mut t, _auth) = terminal_with(slow, true);
    open_rust(&mut t);
    t.execute_command("edit name");

    t.execute_command("Rustacean");
    t.execute_command("technologies");

    assert_eq!(api.calls().update, 1);
    let names = texts(&t);
    assert!(names.iter().any(|text| text == "Rustacean"));
    assert!(!names.iter().any(|text| text == "Rust"));
}
