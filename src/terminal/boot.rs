// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed boot animation.
//!
//! The banner lines are emitted one by one, then the autorun command (if any) is typed
//! character by character and submitted. Steps are strictly sequential; the only way to stop
//! the animation early is to drop its [`BootHandle`].

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::TerminalConfig;

const BANNER: &str = include_str!("../../assets/boot.txt");

/// Asks the host to play the boot animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootRequest {
    pub autorun: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootEvent {
    Line(String),
    /// The prompt input as typed so far.
    Typed(String),
    Submit(String),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Sleep(Duration),
    Emit(BootEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootSequence {
    steps: Vec<Step>,
}

impl BootSequence {
    pub fn new(config: &TerminalConfig, autorun: Option<String>) -> Self {
        Self::with_banner(BANNER, config, autorun)
    }

    pub fn with_banner(banner: &str, config: &TerminalConfig, autorun: Option<String>) -> Self {
        let mut steps = Vec::new();
        for line in banner.lines() {
            steps.push(Step::Emit(BootEvent::Line(line.to_owned())));
            steps.push(Step::Sleep(config.boot_line_delay));
        }

        if let Some(command) = autorun.filter(|command| !command.trim().is_empty()) {
            steps.push(Step::Sleep(config.boot_autorun_pause));
            let mut typed = String::new();
            for ch in command.chars() {
                typed.push(ch);
                steps.push(Step::Emit(BootEvent::Typed(typed.clone())));
                steps.push(Step::Sleep(config.typing_delay));
            }
            steps.push(Step::Emit(BootEvent::Submit(command)));
        }

        steps.push(Step::Emit(BootEvent::Finished));
        Self { steps }
    }

    /// The events in emission order, without the pauses between them.
    pub fn steps(&self) -> Vec<BootEvent> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Emit(event) => Some(event.clone()),
                Step::Sleep(_) => None,
            })
            .collect()
    }

    async fn play(self, tx: UnboundedSender<BootEvent>) {
        for step in self.steps {
            match step {
                Step::Sleep(delay) if delay.is_zero() => {}
                Step::Sleep(delay) => tokio::time::sleep(delay).await,
                Step::Emit(event) => {
                    if tx.send(event).is_err() {
                        debug!("boot receiver dropped");
                        return;
                    }
                }
            }
        }
    }
}

/// Aborts the animation when dropped.
#[derive(Debug)]
pub struct BootHandle {
    task: JoinHandle<()>,
}

impl BootHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for BootHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_boot_sequence(
    runtime: &Handle,
    sequence: BootSequence,
) -> (BootHandle, UnboundedReceiver<BootEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = runtime.spawn(sequence.play(tx));
    (BootHandle { task }, rx)
}
