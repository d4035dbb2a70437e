// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts a [`crate::terminal::Terminal`] engine inside a ratatui + crossterm shell: the output
//! buffer fills a bordered panel, the prompt sits under it, and a footer lists the keys. Scrolling
//! up past the first line (after the cooldown) collapses the panel.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::terminal::{
    OutputLine, ScrollController, Terminal as ExoTerminal, WheelDirection, WheelOutcome, PROMPT,
};

mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND: &str = "EXO";
const PROMPT_CURSOR: &str = "█";
const TICK: Duration = Duration::from_millis(30);
const TOAST_TTL: Duration = Duration::from_secs(2);

include!("chrome.rs");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiOptions {
    /// Play the boot banner with its delays; otherwise it is printed at once.
    pub animate_boot: bool,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self { animate_boot: true }
    }
}

/// Runs the interactive terminal UI until the user quits.
///
/// Must be called from a thread that can reach a tokio runtime (for example inside
/// `spawn_blocking`) when `options.animate_boot` is set; otherwise boot falls back to the
/// instant path.
pub fn run(engine: ExoTerminal, options: TuiOptions) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut app = App::new(engine, theme);
    app.engine.boot();
    let runtime = tokio::runtime::Handle::try_current().ok();
    match runtime.as_ref() {
        Some(handle) if options.animate_boot => app.engine.spawn_pending_boot(handle),
        _ => app.engine.complete_pending_boot(),
    }

    let mut terminal = TerminalSession::new()?;
    info!("tui started");

    while !app.should_quit {
        app.engine.pump_boot();
        if app.engine.has_pending_boot() {
            match runtime.as_ref() {
                Some(handle) => app.engine.spawn_pending_boot(handle),
                None => app.engine.complete_pending_boot(),
            }
        }

        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key, now),
                Event::Mouse(mouse) => app.handle_mouse(mouse, now),
                _ => {}
            }
            if let Some(action) = app.take_external_action() {
                if let Err(err) = app.execute_external_action(action) {
                    warn!(error = %err, "external action failed");
                    app.set_toast(format!("External action failed: {err}"));
                }
            }
        }
    }

    info!("tui stopped");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let now = Instant::now();
    let admin = app.engine.is_admin();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title(app))
        .border_style(app.theme.border_style(app.collapsed));
    let inner = block.inner(main_area);
    frame.render_widget(block, main_area);

    if app.collapsed {
        app.output_area = Rect::default();
        frame.render_widget(Paragraph::new(collapsed_hint_line(&app.theme)), inner);
    } else {
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        let output_area = panes[0];
        let prompt_area = panes[1];
        app.output_area = output_area;
        app.sync_scroll(now);

        let top = app.scroll.top();
        let selected = app.engine.selected();
        let lines = app
            .engine
            .output()
            .iter()
            .enumerate()
            .skip(top)
            .take(output_area.height as usize)
            .map(|(index, line)| output_line_to_line(line, &app.theme, selected == Some(index)))
            .collect::<Vec<_>>();
        frame.render_widget(
            Paragraph::new(lines).style(app.theme.base_style()),
            output_area,
        );
        frame.render_widget(Paragraph::new(prompt_line(app)), prompt_area);
    }

    let toast_suffix = match app.toast.as_ref() {
        Some(toast) if toast.expires_at > now => format!(" | {}", toast.message),
        _ => String::new(),
    };
    frame.render_widget(
        Paragraph::new(footer_help_line(app, admin, &toast_suffix)),
        status_area,
    );

    if app.show_help {
        render_help(frame, main_area);
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExternalAction {
    OpenUrl(String),
}

/// Left button press on the output panel, waiting for release.
#[derive(Debug, Clone, Copy)]
struct Press {
    index: Option<usize>,
    dragged: bool,
}

struct App {
    engine: ExoTerminal,
    scroll: ScrollController,
    theme: TuiTheme,
    collapsed: bool,
    show_help: bool,
    should_quit: bool,
    toast: Option<Toast>,
    pending_external_action: Option<ExternalAction>,
    output_area: Rect,
    press: Option<Press>,
}

impl App {
    fn new(engine: ExoTerminal, theme: TuiTheme) -> Self {
        let scroll = ScrollController::new(engine.config());
        Self {
            engine,
            scroll,
            theme,
            collapsed: false,
            show_help: false,
            should_quit: false,
            toast: None,
            pending_external_action: None,
            output_area: Rect::default(),
            press: None,
        }
    }

    fn viewport_rows(&self) -> usize {
        self.output_area.height as usize
    }

    fn sync_scroll(&mut self, now: Instant) {
        self.scroll
            .sync(self.engine.output().len(), self.viewport_rows(), now);
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d')) {
            self.should_quit = true;
            return;
        }
        if self.handle_key_code(key.code, now) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode, now: Instant) -> bool {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return false;
        }

        if self.collapsed {
            self.expand();
            if !matches!(code, KeyCode::Char(_) | KeyCode::Backspace) {
                return false;
            }
        }

        match code {
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => {
                if self.engine.selected().is_none() {
                    return true;
                }
                self.engine.clear_selection();
            }
            KeyCode::Up => {
                self.engine.select_previous();
                self.reveal_selection(now);
            }
            KeyCode::Down => {
                self.engine.select_next();
                self.reveal_selection(now);
            }
            KeyCode::PageUp => self.scroll_page(-1, now),
            KeyCode::PageDown => self.scroll_page(1, now),
            KeyCode::Home => self.scroll.scroll_by(isize::MIN, now),
            KeyCode::End => self.scroll.scroll_by(isize::MAX, now),
            KeyCode::Enter => {
                self.engine.submit();
                self.after_engine_action();
            }
            KeyCode::Backspace => self.engine.backspace(),
            KeyCode::Char(ch) => self.engine.push_char(ch),
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                if self.collapsed {
                    return;
                }
                if self.scroll.wheel(WheelDirection::Up, now) == WheelOutcome::Propagate {
                    self.collapse();
                }
            }
            MouseEventKind::ScrollDown => {
                if self.collapsed {
                    self.expand();
                    return;
                }
                self.scroll.wheel(WheelDirection::Down, now);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.collapsed {
                    self.expand();
                    return;
                }
                self.press = Some(Press {
                    index: self.line_at(mouse.column, mouse.row),
                    dragged: false,
                });
                self.scroll.drag_start(mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(press) = self.press.as_mut() else {
                    return;
                };
                if let Some(outcome) = self.scroll.drag_move(mouse.row, now) {
                    press.dragged = true;
                    if outcome == WheelOutcome::Propagate {
                        self.collapse();
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.scroll.drag_end();
                let Some(press) = self.press.take() else {
                    return;
                };
                if press.dragged {
                    return;
                }
                if let Some(index) = press.index {
                    self.engine.activate_line(index);
                    self.after_engine_action();
                }
            }
            _ => {}
        }
    }

    /// Output index under a screen cell, if that cell shows a line.
    fn line_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.output_area;
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);
        if !inside {
            return None;
        }
        let index = self.scroll.top() + usize::from(row - area.y);
        (index < self.engine.output().len()).then_some(index)
    }

    fn reveal_selection(&mut self, now: Instant) {
        if let Some(index) = self.engine.selected() {
            self.scroll.reveal(index, now);
        }
    }

    fn scroll_page(&mut self, direction: isize, now: Instant) {
        let page = self.viewport_rows().max(1) as isize;
        self.scroll.scroll_by(direction * page, now);
    }

    fn collapse(&mut self) {
        debug!("terminal panel collapsed");
        self.collapsed = true;
        self.press = None;
        self.scroll.drag_end();
    }

    fn expand(&mut self) {
        debug!("terminal panel expanded");
        self.collapsed = false;
    }

    fn after_engine_action(&mut self) {
        if let Some(url) = self.engine.take_open_url() {
            self.pending_external_action = Some(ExternalAction::OpenUrl(url));
        }
    }

    fn take_external_action(&mut self) -> Option<ExternalAction> {
        self.pending_external_action.take()
    }

    fn execute_external_action(&mut self, action: ExternalAction) -> Result<(), String> {
        match action {
            ExternalAction::OpenUrl(url) => {
                info!(%url, "opening link");
                open::that_detached(&url).map_err(|err| format!("cannot open {url}: {err}"))?;
                self.set_toast(format!("Opened {url}"));
                Ok(())
            }
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
}
