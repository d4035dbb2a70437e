// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Technology catalog data model.
//!
//! Mirrors the JSON shapes served by the portfolio API (camelCase on the wire).

use std::fmt;

use serde::{Deserialize, Serialize};

pub type TechnologyId = u64;

/// One catalog entry. `id` is `None` for a draft that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TechnologyId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Technology {
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Key used to build per-entity program ids (`id`, or the name for drafts).
    pub fn program_key(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => self.name.clone(),
        }
    }

    pub fn field(&self, field: TechnologyField) -> Option<&str> {
        match field {
            TechnologyField::Name => Some(self.name.as_str()).filter(|name| !name.is_empty()),
            TechnologyField::Description => self.description.as_deref(),
            TechnologyField::Link => self.link.as_deref(),
            TechnologyField::Category => self.category.as_deref(),
            TechnologyField::IconPath => self.icon_string.as_deref(),
        }
    }

    /// Returns a copy with `field` replaced by `value`.
    pub fn with_field(&self, field: TechnologyField, value: &str) -> Self {
        let mut next = self.clone();
        let value = value.to_owned();
        match field {
            TechnologyField::Name => next.name = value,
            TechnologyField::Description => next.description = Some(value),
            TechnologyField::Link => next.link = Some(value),
            TechnologyField::Category => next.category = Some(value),
            TechnologyField::IconPath => next.icon_string = Some(value),
        }
        next
    }

    pub fn to_request(&self) -> TechnologyRequest {
        TechnologyRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            icon_path: self.icon_string.clone(),
            category: self.category.clone(),
        }
    }
}

/// Editable text fields of a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TechnologyField {
    Name,
    Description,
    Link,
    Category,
    IconPath,
}

impl TechnologyField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Link => "link",
            Self::Category => "category",
            Self::IconPath => "icon",
        }
    }

    pub fn pretty(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Link => "Link",
            Self::Category => "Category",
            Self::IconPath => "Icon",
        }
    }
}

impl fmt::Display for TechnologyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Sent to the backend as `iconString`.
    #[serde(rename = "iconString", default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDir,
}

impl PageQuery {
    /// First page of up to 100 entries sorted by name, as the listings request it.
    pub fn all_by_name() -> Self {
        Self {
            page: 0,
            size: 100,
            sort_by: "name".to_owned(),
            sort_dir: SortDir::Asc,
        }
    }
}

/// Case-insensitive ordering used by every listing.
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_payload() {
        let tech: Technology = serde_json::from_str(
            r#"{"id":7,"name":"Rust","iconString":"icons/rust.png","category":"Backend","createdAt":"2025-01-01T00:00:00"}"#,
        )
        .expect("parse technology");
        assert_eq!(tech.id, Some(7));
        assert_eq!(tech.icon_string.as_deref(), Some("icons/rust.png"));
        assert_eq!(tech.category.as_deref(), Some("Backend"));
        assert!(tech.description.is_none());
    }

    #[test]
    fn request_sends_icon_path_as_icon_string() {
        let request = Technology {
            name: "Rust".to_owned(),
            icon_string: Some("icons/rust.png".to_owned()),
            ..Technology::default()
        }
        .to_request();
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["iconString"], "icons/rust.png");
        assert!(json.get("iconPath").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn page_defaults_missing_totals() {
        let page: Page<Technology> =
            serde_json::from_str(r#"{"content":[{"name":"Go"}]}"#).expect("parse page");
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn with_field_replaces_only_that_field() {
        let tech = Technology {
            id: Some(1),
            name: "Rust".to_owned(),
            ..Technology::default()
        };
        let next = tech.with_field(TechnologyField::Link, "https://rust-lang.org");
        assert_eq!(next.link.as_deref(), Some("https://rust-lang.org"));
        assert_eq!(next.name, "Rust");
        assert_eq!(next.field(TechnologyField::Description), None);
    }

    #[test]
    fn draft_program_key_uses_name() {
        let draft = Technology::draft().with_field(TechnologyField::Name, "Zig");
        assert!(draft.is_draft());
        assert_eq!(draft.program_key(), "Zig");
    }

    #[test]
    fn names_compare_case_insensitively() {
        let mut names = vec!["rust", "Go", "alpine", "Bash"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["alpine", "Bash", "Go", "rust"]);
    }
}
