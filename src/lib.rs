// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Exo: the technologies terminal of a portfolio site, as a terminal application.
//!
//! [`terminal::Terminal`] is the command interpreter. It owns the output buffer, the program
//! registry and the navigation history, and talks to the catalog through [`api::TechnologyApi`].
//! [`tui`] hosts it in a ratatui shell.

pub mod api;
pub mod ascii;
pub mod auth;
pub mod config;
pub mod logging;
pub mod technology;
pub mod terminal;
pub mod tui;
