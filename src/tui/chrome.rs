// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Panel title, output line, prompt, footer, and help helpers used by TUI rendering.
fn panel_title(app: &App) -> String {
    if app.collapsed {
        return format!(" {FOOTER_BRAND} (collapsed) ");
    }
    let program = app
        .engine
        .current_program()
        .and_then(|id| app.engine.program_name(id))
        .filter(|name| !name.is_empty());
    match program {
        Some(name) => format!(" {FOOTER_BRAND} // {name} "),
        None => format!(" {FOOTER_BRAND} "),
    }
}

fn output_line_style(line: &OutputLine, theme: &TuiTheme) -> Style {
    if let Some(severity) = line.severity() {
        return theme.severity_style(severity);
    }
    if line.link_url().is_some() {
        return theme.link_style();
    }
    if line.is_back_line() {
        return theme.back_style();
    }
    if line.is_edit_line() {
        return theme.action_style();
    }
    if line.is_init_line() {
        return theme.init_style();
    }
    theme.base_style()
}

fn output_line_to_line(line: &OutputLine, theme: &TuiTheme, selected: bool) -> Line<'static> {
    let overlay = if selected {
        theme.selection_style()
    } else {
        Style::default()
    };

    if let Some(spans) = line.rich_spans() {
        let overlay = if line.link_url().is_some() {
            Style::default()
                .add_modifier(Modifier::UNDERLINED)
                .patch(overlay)
        } else {
            overlay
        };
        return Line::from(
            spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text.clone(),
                        theme.rich_style(span.color, span.bold).patch(overlay),
                    )
                })
                .collect::<Vec<_>>(),
        );
    }

    if line.is_echo() {
        let rest = line
            .text()
            .strip_prefix(PROMPT)
            .unwrap_or(line.text())
            .to_owned();
        return Line::from(vec![
            Span::styled(PROMPT.to_owned(), theme.prompt_style().patch(overlay)),
            Span::styled(rest, theme.echo_style().patch(overlay)),
        ]);
    }

    Line::from(Span::styled(
        line.text().to_owned(),
        output_line_style(line, theme).patch(overlay),
    ))
}

fn prompt_line(app: &App) -> Line<'static> {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(PROMPT.to_owned(), theme.prompt_style()),
        Span::raw(" "),
        Span::styled(app.engine.input().to_owned(), theme.base_style()),
    ];
    if app.engine.prompt_enabled() {
        spans.push(Span::styled(PROMPT_CURSOR.to_owned(), theme.prompt_style()));
    }
    Line::from(spans)
}

fn collapsed_hint_line(theme: &TuiTheme) -> Line<'static> {
    Line::from(Span::styled(
        "Scroll down, click, or press any key to reopen the terminal.".to_owned(),
        theme.echo_style(),
    ))
}

fn footer_help_line(app: &App, admin: bool, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    if app.collapsed {
        push_footer_entry(&mut spans, "OPEN", "any key");
        push_footer_entry(&mut spans, "QUIT", "Ctrl-C");
    } else {
        let prompt_disabled = !app.engine.prompt_enabled();
        push_footer_entry_maybe_disabled(&mut spans, "RUN", "Enter", prompt_disabled);
        push_footer_entry_maybe_disabled(&mut spans, "SELECT", "↑/↓", prompt_disabled);
        push_footer_entry(&mut spans, "SCROLL", "PgUp/PgDn");
        push_footer_entry(&mut spans, "HELP", "F1");
        push_footer_entry(&mut spans, "QUIT", "Ctrl-C");
        push_footer_entry(&mut spans, "ASCII", &app.engine.ascii_width().to_string());
    }
    if admin {
        push_footer_entry(&mut spans, "MODE", "admin");
    }

    if !toast_suffix.is_empty() {
        spans.push(Span::styled(
            toast_suffix.to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }

    Line::from(spans)
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_KEYS: [(&str, &str); 8] = [
    ("F1/Esc", "Help (toggle)"),
    ("Ctrl-C", "Quit"),
    ("Enter", "Run input, or activate the selected line"),
    ("↑/↓", "Select previous/next line"),
    ("Esc", "Clear selection (quit when nothing is selected)"),
    ("PgUp/PgDn", "Scroll one page"),
    ("Home/End", "Jump to first/last line"),
    ("Wheel/Click", "Scroll, open lines and links"),
];

const HELP_COMMANDS: [(&str, &str); 7] = [
    ("know [query]", "Browse technologies by category"),
    ("find <query>", "Search technologies"),
    ("technologies", "Flat technology listing"),
    ("info", "List available commands"),
    ("back", "Return to the previous screen"),
    ("clear", "Wipe screen and history"),
    ("resolution <n>", "ASCII art width (10-100)"),
];

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let area = centered_rect(80, 80, area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = HELP_KEYS
        .iter()
        .chain(HELP_COMMANDS.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Keys ---", header_style)));
    for (key, desc) in HELP_KEYS {
        lines.push(help_kv(key, desc, key_col_width, key_style));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("--- Commands ---", header_style)));
    for (key, desc) in HELP_COMMANDS {
        lines.push(help_kv(key, desc, key_col_width, key_style));
    }

    let block = Block::default().borders(Borders::ALL).title(" Help ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.extend(footer_value_spans(value, disabled));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_value_spans(value: &str, disabled: bool) -> Vec<Span<'static>> {
    let color = if disabled {
        Color::DarkGray
    } else {
        FOOTER_KEY_COLOR
    };
    vec![Span::styled(
        value.to_owned(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )]
}
