//! Form state machine.
//!
//! `Idle -> Loading -> (Result | ErrorDisplayed)`, and the next submission
//! goes back to `Loading`. At most one request is outstanding; the trigger
//! control is enabled exactly when nothing is in flight.

use std::fmt;

/// Identifies one accepted submission.
///
/// Completions are tagged with the id of the request they answer so a late
/// answer to an older request can never overwrite the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A paragraph accepted for simplification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplificationRequest {
    original_text: String,
}

impl SimplificationRequest {
    /// Trim `raw`; `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                original_text: trimmed.to_string(),
            })
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }
}

/// Outcome of one simplification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimplificationResult {
    Success { text: String },
    Failure { message: String },
}

/// What the result area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Result(String),
    ErrorDisplayed(String),
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Nothing but whitespace was entered.
    EmptyInput,
    /// A request is already outstanding.
    Busy,
}

/// An accepted submission, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: RequestId,
    pub request: SimplificationRequest,
}

/// The provider's answer for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: RequestId,
    pub result: SimplificationResult,
}

#[derive(Debug)]
pub struct FormState {
    phase: Phase,
    in_flight: Option<RequestId>,
    next_id: u64,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            in_flight: None,
            next_id: 1,
        }
    }
}

impl FormState {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// True when the submit control accepts input.
    pub fn trigger_enabled(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Validate `raw` and enter `Loading`.
    ///
    /// A rejected submission leaves the state untouched.
    pub fn submit(&mut self, raw: &str) -> Result<Submission, SubmitRejection> {
        if self.in_flight.is_some() {
            return Err(SubmitRejection::Busy);
        }
        let request = SimplificationRequest::new(raw).ok_or(SubmitRejection::EmptyInput)?;

        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.in_flight = Some(id);
        self.phase = Phase::Loading;
        Ok(Submission { id, request })
    }

    /// Apply a completion. Returns false (and changes nothing) when the
    /// completion does not answer the outstanding request.
    pub fn settle(&mut self, completion: Completion) -> bool {
        if self.in_flight != Some(completion.id) {
            return false;
        }
        self.in_flight = None;
        self.phase = match completion.result {
            SimplificationResult::Success { text } => Phase::Result(text),
            SimplificationResult::Failure { message } => Phase::ErrorDisplayed(message),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(id: RequestId, text: &str) -> Completion {
        Completion {
            id,
            result: SimplificationResult::Success {
                text: text.to_string(),
            },
        }
    }

    #[test]
    fn test_request_is_trimmed() {
        let request = SimplificationRequest::new("  some text \n").unwrap();
        assert_eq!(request.original_text(), "some text");
        assert!(SimplificationRequest::new(" \t\n ").is_none());
        assert!(SimplificationRequest::new("").is_none());
    }

    #[test]
    fn test_initial_state() {
        let form = FormState::default();
        assert_eq!(form.phase(), &Phase::Idle);
        assert!(form.trigger_enabled());
    }

    #[test]
    fn test_empty_submit_changes_nothing() {
        let mut form = FormState::default();
        assert_eq!(form.submit("   "), Err(SubmitRejection::EmptyInput));
        assert_eq!(form.phase(), &Phase::Idle);
        assert!(form.trigger_enabled());

        // Also from a displayed result.
        let submission = form.submit("text").unwrap();
        form.settle(success(submission.id, "done"));
        assert_eq!(form.submit(""), Err(SubmitRejection::EmptyInput));
        assert_eq!(form.phase(), &Phase::Result("done".to_string()));
    }

    #[test]
    fn test_submit_enters_loading_and_disables_trigger() {
        let mut form = FormState::default();
        let submission = form.submit("  paragraph ").unwrap();
        assert_eq!(submission.request.original_text(), "paragraph");
        assert_eq!(form.phase(), &Phase::Loading);
        assert!(!form.trigger_enabled());
    }

    #[test]
    fn test_second_submit_while_loading_is_refused() {
        let mut form = FormState::default();
        form.submit("first").unwrap();
        assert_eq!(form.submit("second"), Err(SubmitRejection::Busy));
        assert_eq!(form.phase(), &Phase::Loading);
    }

    #[test]
    fn test_settle_success_and_failure_reenable_trigger() {
        let mut form = FormState::default();
        let first = form.submit("text").unwrap();
        assert!(form.settle(success(first.id, "simple")));
        assert_eq!(form.phase(), &Phase::Result("simple".to_string()));
        assert!(form.trigger_enabled());

        let second = form.submit("text again").unwrap();
        assert_ne!(first.id, second.id);
        assert!(form.settle(Completion {
            id: second.id,
            result: SimplificationResult::Failure {
                message: "failed".to_string(),
            },
        }));
        assert_eq!(form.phase(), &Phase::ErrorDisplayed("failed".to_string()));
        assert!(form.trigger_enabled());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut form = FormState::default();
        let first = form.submit("one").unwrap();
        form.settle(success(first.id, "one simplified"));
        let second = form.submit("two").unwrap();

        assert!(!form.settle(success(first.id, "late answer")));
        assert_eq!(form.phase(), &Phase::Loading);
        assert!(!form.trigger_enabled());

        assert!(form.settle(success(second.id, "two simplified")));
        assert_eq!(form.phase(), &Phase::Result("two simplified".to_string()));
    }

    #[test]
    fn test_completion_without_request_is_ignored() {
        let mut form = FormState::default();
        assert!(!form.settle(success(RequestId(7), "unsolicited")));
        assert_eq!(form.phase(), &Phase::Idle);
    }
}
