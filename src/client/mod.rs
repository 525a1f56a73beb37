//! The simplifier form.
//!
//! The client:
//! - Validates and accepts one paragraph at a time
//! - Runs the provider call on a background task
//! - Settles the form with either the simplified text or the fixed error
//! - Renders the form in the terminal (or prints the outcome in pipe mode)

pub mod state;
pub mod tui;
pub mod view;

pub use tui::run_tui;

use crate::locale::Strings;
use crate::simplifier::Simplifier;
use anyhow::{bail, Context, Result};
use state::{Completion, FormState, Phase, RequestId, SimplificationResult, SubmitRejection, Submission};
use std::io::{self, Write};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Owns the form state and hands provider calls to background tasks.
///
/// Completions come back on the channel given to [`SimplifierClient::new`]
/// and must be passed to [`SimplifierClient::settle`].
pub struct SimplifierClient {
    simplifier: Simplifier,
    form: FormState,
    completions: mpsc::UnboundedSender<Completion>,
}

impl SimplifierClient {
    pub fn new(simplifier: Simplifier, completions: mpsc::UnboundedSender<Completion>) -> Self {
        Self {
            simplifier,
            form: FormState::default(),
            completions,
        }
    }

    pub fn phase(&self) -> &Phase {
        self.form.phase()
    }

    pub fn trigger_enabled(&self) -> bool {
        self.form.trigger_enabled()
    }

    pub fn strings(&self) -> &'static Strings {
        self.simplifier.language().strings()
    }

    /// Accept `raw` and start the provider call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, raw: &str) -> Result<RequestId, SubmitRejection> {
        let submission = self.form.submit(raw)?;
        let id = submission.id;
        info!(
            request = %id,
            chars = submission.request.original_text().chars().count(),
            "Simplification requested"
        );

        let simplifier = self.simplifier.clone();
        let completions = self.completions.clone();
        let failure_message = self.strings().error_message;
        tokio::spawn(async move {
            // The call runs in its own task so a panicking provider still
            // produces a completion and the form leaves Loading.
            let call = tokio::spawn(async move { resolve(&simplifier, submission).await });
            let completion = match call.await {
                Ok(completion) => completion,
                Err(e) => {
                    error!(request = %id, "Simplification task aborted: {}", e);
                    Completion {
                        id,
                        result: SimplificationResult::Failure {
                            message: failure_message.to_string(),
                        },
                    }
                }
            };
            if completions.send(completion).is_err() {
                warn!(request = %id, "Form closed before the answer arrived");
            }
        });
        Ok(id)
    }

    /// Apply a completion from the channel. Returns false for stale ones.
    pub fn settle(&mut self, completion: Completion) -> bool {
        let id = completion.id;
        let applied = self.form.settle(completion);
        if !applied {
            warn!(request = %id, "Ignoring stale completion");
        }
        applied
    }
}

/// Run one submission to completion.
///
/// Provider failures are logged here and replaced by the fixed localized
/// message; the cause never reaches the view.
pub async fn resolve(simplifier: &Simplifier, submission: Submission) -> Completion {
    let Submission { id, request } = submission;
    let result = match simplifier.simplify(request.original_text()).await {
        Ok(text) => {
            info!(request = %id, chars = text.chars().count(), "Simplification succeeded");
            SimplificationResult::Success { text }
        }
        Err(e) => {
            error!(request = %id, "Simplification failed: {}", e);
            SimplificationResult::Failure {
                message: simplifier.language().strings().error_message.to_string(),
            }
        }
    };
    Completion { id, result }
}

/// How a one-shot (pipe mode) run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeOutcome {
    Simplified(String),
    Failed(String),
    EmptyInput,
}

impl PipeOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipeOutcome::Simplified(_) => 0,
            PipeOutcome::Failed(_) => 1,
            PipeOutcome::EmptyInput => 2,
        }
    }

    /// Print the simplified text to `out`, or the localized notice to `err`.
    pub fn report(&self, strings: &Strings, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        match self {
            PipeOutcome::Simplified(text) => writeln!(out, "{}", text),
            PipeOutcome::Failed(message) => {
                writeln!(err, "{} {}", strings.error_label, message)?;
                writeln!(err, "{}", strings.error_hint)
            }
            PipeOutcome::EmptyInput => writeln!(err, "{}", strings.input_required.trim()),
        }
    }
}

/// Run the form lifecycle once for `raw`, without a terminal.
pub async fn run_once(simplifier: Simplifier, raw: &str) -> Result<PipeOutcome> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut client = SimplifierClient::new(simplifier, tx);
    match client.submit(raw) {
        Ok(_) => {}
        Err(SubmitRejection::EmptyInput) => return Ok(PipeOutcome::EmptyInput),
        Err(SubmitRejection::Busy) => bail!("A simplification is already in flight"),
    }

    let completion = rx
        .recv()
        .await
        .context("Simplification task ended without an answer")?;
    client.settle(completion);

    match client.phase() {
        Phase::Result(text) => Ok(PipeOutcome::Simplified(text.clone())),
        Phase::ErrorDisplayed(message) => Ok(PipeOutcome::Failed(message.clone())),
        other => bail!("Unexpected form state after completion: {:?}", other),
    }
}
