// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Output buffer lines.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::technology::{Technology, TechnologyField};

static NEXT_LINE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide, strictly increasing line identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn next_line_id() -> LineId {
    LineId(NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness, 0..=255.
    pub fn brightness(self) -> u32 {
        (u32::from(self.r) * 299 + u32::from(self.g) * 587 + u32::from(self.b) * 114) / 1000
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichSpan {
    pub text: String,
    pub color: Option<Rgb>,
    pub bold: bool,
}

impl RichSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn colored(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// What activating an edit line does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    EditMenu,
    EditField(TechnologyField),
    EditCategory,
    EditIcon,
    UploadIcon,
    SelectCategory(String),
    DeleteTechnology,
    ConfirmDelete,
    CancelDelete,
    IconSave,
    IconDiscard,
    CreateSave,
    CreateCancel,
    AddTechnology,
}

impl fmt::Display for LineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EditMenu => f.write_str("edit-menu"),
            Self::EditField(field) => write!(f, "edit-{field}"),
            Self::EditCategory => f.write_str("edit-category"),
            Self::EditIcon => f.write_str("edit-icon"),
            Self::UploadIcon => f.write_str("upload-icon"),
            Self::SelectCategory(name) => write!(f, "select-category-{name}"),
            Self::DeleteTechnology => f.write_str("delete"),
            Self::ConfirmDelete => f.write_str("delete-yes"),
            Self::CancelDelete => f.write_str("delete-no"),
            Self::IconSave => f.write_str("icon-save"),
            Self::IconDiscard => f.write_str("icon-discard"),
            Self::CreateSave => f.write_str("create-save"),
            Self::CreateCancel => f.write_str("create-cancel"),
            Self::AddTechnology => f.write_str("add-new-tech"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    id: LineId,
    text: String,
    rich: Option<Vec<RichSpan>>,
    is_init_line: bool,
    is_ascii_line: bool,
    is_back_line: bool,
    is_edit_line: bool,
    is_echo: bool,
    action: Option<LineAction>,
    technology: Option<Arc<Technology>>,
    link_url: Option<String>,
    severity: Option<Severity>,
}

impl OutputLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: next_line_id(),
            text: text.into(),
            rich: None,
            is_init_line: false,
            is_ascii_line: false,
            is_back_line: false,
            is_edit_line: false,
            is_echo: false,
            action: None,
            technology: None,
            link_url: None,
            severity: None,
        }
    }

    pub fn blank() -> Self {
        Self::new(" ")
    }

    pub fn echo(input: &str) -> Self {
        let mut line = Self::new(format!("EXO> {input}"));
        line.is_echo = true;
        line
    }

    pub fn init(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line = if text.trim().is_empty() { Self::blank() } else { Self::new(text) };
        line.is_init_line = true;
        line
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text).with_severity(Severity::Error)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text).with_severity(Severity::Warning)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text).with_severity(Severity::Success)
    }

    /// `< Back` or `< Back - <name>`.
    pub fn back(target_name: Option<&str>) -> Self {
        let text = match target_name {
            Some(name) if !name.is_empty() => format!("< Back - {name}"),
            _ => "< Back".to_owned(),
        };
        let mut line = Self::new(text);
        line.is_back_line = true;
        line
    }

    /// An admin edit line bound to `tech`.
    pub fn edit(text: impl Into<String>, action: LineAction, tech: &Arc<Technology>) -> Self {
        let mut line = Self::new(text);
        line.is_edit_line = true;
        line.action = Some(action);
        line.technology = Some(Arc::clone(tech));
        line
    }

    /// An admin edit line not bound to any technology.
    pub fn action_line(text: impl Into<String>, action: LineAction) -> Self {
        let mut line = Self::new(text);
        line.is_edit_line = true;
        line.action = Some(action);
        line
    }

    /// A line rendered from colored spans; `text` is the concatenated plain text.
    pub fn rich(spans: Vec<RichSpan>) -> Self {
        let text = spans.iter().map(|span| span.text.as_str()).collect::<String>();
        let mut line = Self::new(text);
        line.rich = Some(spans);
        line
    }

    pub fn ascii(spans: Vec<RichSpan>) -> Self {
        let mut line = Self::rich(spans);
        line.is_ascii_line = true;
        line
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_technology(mut self, tech: &Arc<Technology>) -> Self {
        self.technology = Some(Arc::clone(tech));
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }

    pub fn with_rich(mut self, spans: Vec<RichSpan>) -> Self {
        self.rich = Some(spans);
        self
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rich_spans(&self) -> Option<&[RichSpan]> {
        self.rich.as_deref()
    }

    pub fn is_init_line(&self) -> bool {
        self.is_init_line
    }

    pub fn is_ascii_line(&self) -> bool {
        self.is_ascii_line
    }

    pub fn is_back_line(&self) -> bool {
        self.is_back_line
    }

    pub fn is_edit_line(&self) -> bool {
        self.is_edit_line
    }

    pub fn is_echo(&self) -> bool {
        self.is_echo
    }

    pub fn action(&self) -> Option<&LineAction> {
        self.action.as_ref()
    }

    pub fn technology(&self) -> Option<&Arc<Technology>> {
        self.technology.as_ref()
    }

    pub fn link_url(&self) -> Option<&str> {
        self.link_url.as_deref()
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }
}
