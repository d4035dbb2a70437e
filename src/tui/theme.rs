// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::terminal::{Rgb, Severity};

const PALETTE_ENV: &str = "EXO_TUI_PALETTE";

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let value = match env::var(PALETTE_ENV) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: PALETTE_ENV.to_string(),
                    value: "<non-unicode>".to_string(),
                });
            }
        };
        Self::from_palette_value(value.as_deref())
    }

    fn from_palette_value(value: Option<&str>) -> Result<Self, ThemeError> {
        let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(Self::default());
        };
        let palette = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
            name: PALETTE_ENV.to_string(),
            value: format!("{trimmed} ({error})"),
        })?;
        Ok(Self {
            palette: Some(palette),
        })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn ansi_color(&self, color: Ansi16) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi_color(color.idx()),
            None => color.into(),
        }
    }

    pub(crate) fn border_style(&self, collapsed: bool) -> Style {
        if collapsed {
            self.base_style().fg(self.ansi_color(Ansi16::BrightBlack))
        } else {
            self.base_style().fg(self.ansi_color(Ansi16::Green))
        }
    }

    pub(crate) fn prompt_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::BrightGreen))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn echo_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightBlack))
    }

    pub(crate) fn init_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Green))
    }

    pub(crate) fn back_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Cyan))
    }

    pub(crate) fn action_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Yellow))
    }

    pub(crate) fn link_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::BrightBlue))
            .add_modifier(Modifier::UNDERLINED)
    }

    pub(crate) fn severity_style(&self, severity: Severity) -> Style {
        let color = match severity {
            Severity::Error => Ansi16::Red,
            Severity::Warning => Ansi16::Yellow,
            Severity::Success => Ansi16::Green,
        };
        self.base_style().fg(self.ansi_color(color))
    }

    /// Truecolor spans from rendered ASCII art and category headers pass through untouched.
    pub(crate) fn rich_style(&self, color: Option<Rgb>, bold: bool) -> Style {
        let mut style = self.base_style();
        if let Some(rgb) = color {
            style = style.fg(Color::Rgb(rgb.r, rgb.g, rgb.b));
        }
        if bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.severity_style(Severity::Error)
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg, then the 16 ansi colors), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let fg = parse_palette_color(parts[0])?;
        let bg = parse_palette_color(parts[1])?;

        let mut ansi = [Color::Reset; 16];
        for (idx, part) in parts.iter().skip(2).enumerate() {
            ansi[idx] = parse_palette_color(part)?;
        }

        Ok(Self { fg, bg, ansi })
    }

    fn ansi_color(&self, idx: usize) -> Color {
        self.ansi[idx]
    }
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 3 {
            return Err(format!("invalid rgb: value: {trimmed}"));
        }
        let r = parse_hex_channel(parts[0])?;
        let g = parse_hex_channel(parts[1])?;
        let b = parse_hex_channel(parts[2])?;
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    match value.len() {
        2 => u8::from_str_radix(value, 16).map_err(|_| format!("invalid rgb: component {value}")),
        4 => u16::from_str_radix(value, 16)
            .map(|parsed| (parsed >> 8) as u8)
            .map_err(|_| format!("invalid rgb: component {value}")),
        _ => Err(format!(
            "invalid rgb: component {value} (expected 2 or 4 hex digits)"
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ansi16 {
    Red,
    Green,
    Yellow,
    Cyan,
    BrightBlack,
    BrightGreen,
    BrightBlue,
}

impl Ansi16 {
    const fn idx(self) -> usize {
        match self {
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Cyan => 6,
            Self::BrightBlack => 8,
            Self::BrightGreen => 10,
            Self::BrightBlue => 12,
        }
    }
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        match value {
            Ansi16::Red => Color::Red,
            Ansi16::Green => Color::Green,
            Ansi16::Yellow => Color::Yellow,
            Ansi16::Cyan => Color::Cyan,
            Ansi16::BrightBlack => Color::DarkGray,
            Ansi16::BrightGreen => Color::LightGreen,
            Ansi16::BrightBlue => Color::LightBlue,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "#111111,#222222,#000000,#ff0000,#00ff00,#ffff00,#0000ff,#ff00ff,#00ffff,#ffffff,#1a1a1a,#ff1111,#11ff11,#ffff11,#1111ff,#ff11ff,#11ffff,#fefefe";

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = TuiPalette::parse_csv(CSV).expect("palette");

        assert_eq!(palette.fg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette.bg, Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(palette.ansi_color(1), Color::Rgb(0xff, 0, 0));
        assert_eq!(palette.ansi_color(15), Color::Rgb(0xfe, 0xfe, 0xfe));
    }

    #[test]
    fn palette_override_rejects_invalid_csv() {
        let err = TuiPalette::parse_csv("nope").unwrap_err();
        assert!(err.contains("expected"));

        let err = TuiTheme::from_palette_value(Some("nope")).unwrap_err();
        assert!(err.to_string().starts_with("invalid env EXO_TUI_PALETTE=nope"));
    }

    #[test]
    fn blank_palette_value_keeps_terminal_colors() {
        let theme = TuiTheme::from_palette_value(Some("   ")).expect("theme");
        assert_eq!(theme.base_style(), Style::default());
        assert_eq!(theme.error_style().fg, Some(Color::Red));
    }

    #[test]
    fn severity_styles_follow_palette_slots() {
        let theme = TuiTheme::from_palette_value(Some(CSV)).expect("theme");
        assert_eq!(theme.severity_style(Severity::Error).fg, Some(Color::Rgb(0xff, 0, 0)));
        assert_eq!(theme.severity_style(Severity::Success).fg, Some(Color::Rgb(0, 0xff, 0)));
        assert_eq!(theme.severity_style(Severity::Warning).fg, Some(Color::Rgb(0xff, 0xff, 0)));
        assert_eq!(theme.base_style().bg, Some(Color::Rgb(0x22, 0x22, 0x22)));
    }

    #[test]
    fn rgb_x11_notation_is_accepted() {
        assert_eq!(parse_palette_color("rgb:ff/80/00"), Ok(Color::Rgb(0xff, 0x80, 0)));
        assert_eq!(parse_palette_color("rgb:ffff/8000/0000"), Ok(Color::Rgb(0xff, 0x80, 0)));
        assert!(parse_palette_color("rgb:f/f").is_err());
    }

    #[test]
    fn rich_spans_keep_their_truecolor() {
        let style = TuiTheme::default().rich_style(Some(Rgb::new(1, 2, 3)), true);
        assert_eq!(style.fg, Some(Color::Rgb(1, 2, 3)));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
