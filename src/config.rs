// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal engine tuning knobs.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct TerminalConfig {
    /// Initial ASCII art width (clamped to 10..=100).
    pub ascii_width: u16,
    /// How long the viewport must sit at the top before an upward wheel escapes to the host.
    pub scroll_cooldown: Duration,
    /// Vertical drag distance that triggers one line step.
    pub drag_threshold: f32,
    /// Pixel-equivalent height of one terminal row, used to measure drags.
    pub row_pixels: f32,
    pub boot_line_delay: Duration,
    pub boot_autorun_pause: Duration,
    pub typing_delay: Duration,
    /// Command typed and submitted after the boot banner; `None` leaves the prompt idle.
    pub autorun_command: Option<String>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            ascii_width: 40,
            scroll_cooldown: Duration::from_millis(800),
            drag_threshold: 50.0,
            row_pixels: 16.0,
            boot_line_delay: Duration::from_millis(80),
            boot_autorun_pause: Duration::from_millis(1200),
            typing_delay: Duration::from_millis(40),
            autorun_command: Some("know".to_owned()),
        }
    }
}

impl TerminalConfig {
    /// Zero delays, for tests and `--no-boot`.
    pub fn instant() -> Self {
        Self {
            boot_line_delay: Duration::ZERO,
            boot_autorun_pause: Duration::ZERO,
            typing_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
