// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-granular scrolling over the output buffer.
//!
//! Upward gestures at the very top are swallowed until the viewport has rested there for the
//! configured cooldown; after that they propagate so the host can collapse the panel.

use std::time::{Duration, Instant};

use crate::config::TerminalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    Consumed,
    Propagate,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_row: u16,
    fired: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollController {
    top: usize,
    len: usize,
    viewport: usize,
    cooldown: Duration,
    drag_threshold: f32,
    row_pixels: f32,
    reached_top_at: Option<Instant>,
    drag: Option<Drag>,
}

impl ScrollController {
    pub fn new(config: &TerminalConfig) -> Self {
        Self {
            top: 0,
            len: 0,
            viewport: 0,
            cooldown: config.scroll_cooldown,
            drag_threshold: config.drag_threshold,
            row_pixels: config.row_pixels,
            reached_top_at: None,
            drag: None,
        }
    }

    /// First visible line.
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn max_top(&self) -> usize {
        self.len.saturating_sub(self.viewport)
    }

    pub fn at_top(&self) -> bool {
        self.top == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.top >= self.max_top()
    }

    /// Adopts the current buffer length and viewport height. Growth pins the view to the bottom.
    pub fn sync(&mut self, len: usize, viewport: usize, now: Instant) {
        let grew = len > self.len;
        self.len = len;
        self.viewport = viewport;
        if grew {
            self.top = self.max_top();
        } else {
            self.top = self.top.min(self.max_top());
        }
        self.track_top(now);
    }

    fn track_top(&mut self, now: Instant) {
        if self.top == 0 {
            self.reached_top_at.get_or_insert(now);
        } else {
            self.reached_top_at = None;
        }
    }

    pub fn wheel(&mut self, direction: WheelDirection, now: Instant) -> WheelOutcome {
        match direction {
            WheelDirection::Up if self.top > 0 => {
                self.top -= 1;
                self.track_top(now);
                WheelOutcome::Consumed
            }
            WheelDirection::Up => {
                let since = *self.reached_top_at.get_or_insert(now);
                if now.saturating_duration_since(since) >= self.cooldown {
                    WheelOutcome::Propagate
                } else {
                    WheelOutcome::Consumed
                }
            }
            WheelDirection::Down => {
                if self.top < self.max_top() {
                    self.top += 1;
                    self.track_top(now);
                }
                WheelOutcome::Consumed
            }
        }
    }

    /// PageUp/PageDown style movement. Never propagates.
    pub fn scroll_by(&mut self, delta: isize, now: Instant) {
        self.top = self.top.saturating_add_signed(delta).min(self.max_top());
        self.track_top(now);
    }

    pub fn drag_start(&mut self, row: u16) {
        self.drag = Some(Drag {
            start_row: row,
            fired: false,
        });
    }

    /// Fires one step once the drag exceeds the threshold; further movement waits for a new press.
    pub fn drag_move(&mut self, row: u16, now: Instant) -> Option<WheelOutcome> {
        let drag = self.drag.as_mut()?;
        if drag.fired {
            return None;
        }
        let dy = (f32::from(row) - f32::from(drag.start_row)) * self.row_pixels;
        if dy.abs() <= self.drag_threshold {
            return None;
        }
        drag.fired = true;
        let direction = if dy > 0.0 { WheelDirection::Up } else { WheelDirection::Down };
        Some(self.wheel(direction, now))
    }

    pub fn drag_end(&mut self) {
        self.drag = None;
    }

    /// Scrolls the minimum amount that makes line `index` visible.
    pub fn reveal(&mut self, index: usize, now: Instant) {
        if index < self.top {
            self.top = index;
        } else if self.viewport > 0 && index >= self.top + self.viewport {
            self.top = (index + 1 - self.viewport).min(self.max_top());
        }
        self.track_top(now);
    }
}
