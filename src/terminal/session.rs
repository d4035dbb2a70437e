// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive input sessions.
//!
//! While a session is active the next submitted line is consumed by it instead of being parsed
//! as a command.

use std::sync::Arc;

use crate::technology::{Technology, TechnologyField};

/// What a field-edit session captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Text(TechnologyField),
    /// Local image path for the icon upload preview.
    IconFile,
}

impl EditField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Text(field) => field.as_str(),
            Self::IconFile => "icon file",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    None,
    FieldEdit {
        tech: Arc<Technology>,
        field: EditField,
    },
    ConfirmDelete {
        tech: Arc<Technology>,
    },
}

impl Session {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn technology(&self) -> Option<&Arc<Technology>> {
        match self {
            Self::None => None,
            Self::FieldEdit { tech, .. } | Self::ConfirmDelete { tech } => Some(tech),
        }
    }
}

/// Answer to a delete confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Unrecognized,
}

impl Confirmation {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "confirm" | "y" | "yes" => Self::Yes,
            "cancel" | "n" | "no" => Self::No,
            _ => Self::Unrecognized,
        }
    }
}

pub fn is_cancel(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("cancel")
}
