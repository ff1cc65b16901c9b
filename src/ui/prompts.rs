//! ui::prompts
//!
//! Confirmations and dismissable alerts.
//!
//! # Design
//!
//! Dialog chrome belongs to the host UI, so the marker components talk to a
//! [`Prompter`]. Two implementations ship here:
//!
//! - [`TerminalPrompter`] asks on stdin and prints alerts to stderr. In
//!   non-interactive mode a confirmation either auto-accepts (`--yes`) or
//!   fails with [`PromptError::NotInteractive`]. A host that reports the
//!   returned error itself can turn alert printing off.
//! - [`ScriptedPrompter`] answers from a queue and records everything it was
//!   shown, for tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

/// Errors from prompts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// A yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub header: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmRequest {
    /// The question asked before deleting a point.
    pub fn delete_point() -> Self {
        Self {
            header: "Confirm Delete".into(),
            message: "Are you sure you want to delete this point?".into(),
            confirm_label: "Delete".into(),
            cancel_label: "Cancel".into(),
        }
    }
}

/// A dismissable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub header: String,
    pub message: String,
}

impl Alert {
    pub fn new(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            message: message.into(),
        }
    }
}

/// Host dialog surface.
pub trait Prompter {
    /// Ask for confirmation.
    ///
    /// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
    fn confirm(&self, request: &ConfirmRequest) -> Result<bool, PromptError>;

    /// Show a notification the user dismisses.
    fn alert(&self, alert: &Alert);
}

/// Prompter for a terminal session.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter {
    interactive: bool,
    assume_yes: bool,
    print_alerts: bool,
}

impl TerminalPrompter {
    pub fn new(interactive: bool, assume_yes: bool) -> Self {
        Self {
            interactive,
            assume_yes,
            print_alerts: true,
        }
    }

    /// Log alerts instead of printing them.
    ///
    /// Every alert accompanies an error the caller also receives, so a host
    /// that prints returned errors would otherwise show the message twice.
    pub fn without_alerts(mut self) -> Self {
        self.print_alerts = false;
        self
    }

    pub fn prints_alerts(&self) -> bool {
        self.print_alerts
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, request: &ConfirmRequest) -> Result<bool, PromptError> {
        if self.assume_yes {
            return Ok(true);
        }
        if !self.interactive {
            return Err(PromptError::NotInteractive);
        }

        let mut stderr = std::io::stderr();
        write!(
            stderr,
            "{}\n{} [{}/{}] ",
            request.header,
            request.message,
            request.confirm_label.to_lowercase(),
            request.cancel_label.to_lowercase()
        )
        .and_then(|_| stderr.flush())
        .map_err(|e| PromptError::IoError(e.to_string()))?;

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PromptError::IoError(e.to_string()))?;
        if read == 0 {
            return Err(PromptError::Cancelled);
        }

        Ok(parse_answer(&line, &request.confirm_label))
    }

    fn alert(&self, alert: &Alert) {
        if self.print_alerts {
            eprintln!("{}: {}", alert.header, alert.message);
        } else {
            debug!(header = %alert.header, message = %alert.message, "alert");
        }
    }
}

/// Accept `y`, `yes`, or the confirm label itself (case-insensitive).
fn parse_answer(line: &str, confirm_label: &str) -> bool {
    let answer = line.trim().to_lowercase();
    answer == "y" || answer == "yes" || answer == confirm_label.to_lowercase()
}

/// Prompter that answers from a script.
///
/// When the script runs out, confirmations are declined.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Result<bool, PromptError>>>,
    asked: RefCell<Vec<ConfirmRequest>>,
    alerts: RefCell<Vec<Alert>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for upcoming confirmations.
    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        let prompter = Self::new();
        prompter
            .answers
            .borrow_mut()
            .extend(answers.into_iter().map(Ok));
        prompter
    }

    /// Queue a failure for the next confirmation.
    pub fn push_error(&self, err: PromptError) {
        self.answers.borrow_mut().push_back(Err(err));
    }

    /// Confirmations asked so far.
    pub fn asked(&self) -> Vec<ConfirmRequest> {
        self.asked.borrow().clone()
    }

    /// Alerts shown so far.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, request: &ConfirmRequest) -> Result<bool, PromptError> {
        self.asked.borrow_mut().push(request.clone());
        self.answers.borrow_mut().pop_front().unwrap_or(Ok(false))
    }

    fn alert(&self, alert: &Alert) {
        self.alerts.borrow_mut().push(alert.clone());
    }
}
