//! Capture flow states and their transition rules.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// State of a capture conversation.
///
/// `Completed` is the only hard terminal; `Error` is recoverable and the
/// record keeps accepting input from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Initial,
    Receiving,
    ProcessingAudio,
    ProcessingPhotos,
    Validating,
    ReadyToPublish,
    AwaitingApproval,
    Publishing,
    Completed,
    Error,
}

impl CaptureState {
    /// Returns true if a transition from self to target is valid.
    ///
    /// Same-state transitions are always allowed (repeated texts keep the
    /// record in `Validating`, repeated pins in `Receiving`).
    pub fn can_transition_to(&self, target: &Self) -> bool {
        if self == target {
            return !self.is_terminal();
        }
        self.valid_transitions().contains(target)
    }

    /// All valid target states from the current state, self excluded.
    pub fn valid_transitions(&self) -> Vec<Self> {
        use CaptureState::*;
        match self {
            Initial => vec![
                Receiving,
                ProcessingAudio,
                ProcessingPhotos,
                Validating,
                AwaitingApproval,
                Error,
            ],
            Receiving => vec![
                ProcessingAudio,
                ProcessingPhotos,
                Validating,
                ReadyToPublish,
                AwaitingApproval,
                Error,
            ],
            ProcessingAudio => vec![Validating, Error],
            ProcessingPhotos => vec![Receiving, Error],
            Validating => vec![
                ProcessingAudio,
                ProcessingPhotos,
                Receiving,
                ReadyToPublish,
                AwaitingApproval,
                Error,
            ],
            ReadyToPublish => vec![
                ProcessingAudio,
                ProcessingPhotos,
                Validating,
                Receiving,
                AwaitingApproval,
                Error,
            ],
            AwaitingApproval => vec![
                Publishing,
                ProcessingAudio,
                ProcessingPhotos,
                Validating,
                Receiving,
                Error,
            ],
            // A failed publication leaves the record here; the operator can
            // re-approve or the next message lands in Error and recovers.
            Publishing => vec![Completed, AwaitingApproval, Error],
            Completed => vec![],
            Error => vec![
                ProcessingAudio,
                ProcessingPhotos,
                Validating,
                Receiving,
                AwaitingApproval,
            ],
        }
    }

    /// Performs a transition with validation.
    pub fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::invalid_transition(self, target))
        }
    }

    /// Checks if this state has no valid outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaptureState::Completed)
    }
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CaptureState::Initial => "initial",
            CaptureState::Receiving => "receiving",
            CaptureState::ProcessingAudio => "processing_audio",
            CaptureState::ProcessingPhotos => "processing_photos",
            CaptureState::Validating => "validating",
            CaptureState::ReadyToPublish => "ready_to_publish",
            CaptureState::AwaitingApproval => "awaiting_approval",
            CaptureState::Publishing => "publishing",
            CaptureState::Completed => "completed",
            CaptureState::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CaptureState::*;

    #[test]
    fn happy_path_transitions_are_valid() {
        assert!(Initial.can_transition_to(&ProcessingAudio));
        assert!(ProcessingAudio.can_transition_to(&Validating));
        assert!(Validating.can_transition_to(&ReadyToPublish));
        assert!(ReadyToPublish.can_transition_to(&AwaitingApproval));
        assert!(AwaitingApproval.can_transition_to(&Publishing));
        assert!(Publishing.can_transition_to(&Completed));
    }

    #[test]
    fn photo_pass_returns_to_receiving() {
        assert!(Receiving.can_transition_to(&ProcessingPhotos));
        assert!(ProcessingPhotos.can_transition_to(&Receiving));
        assert!(!ProcessingPhotos.can_transition_to(&Validating));
    }

    #[test]
    fn error_is_recoverable() {
        assert!(Validating.can_transition_to(&Error));
        assert!(Error.can_transition_to(&Validating));
        assert!(Error.can_transition_to(&ProcessingAudio));
        assert!(!Error.is_terminal());
    }

    #[test]
    fn approval_is_reachable_from_any_non_terminal_state() {
        for state in [Initial, Receiving, Validating, ReadyToPublish, Publishing, Error] {
            assert!(
                state.can_transition_to(&AwaitingApproval),
                "{:?} should allow approval",
                state
            );
        }
        assert!(!Completed.can_transition_to(&AwaitingApproval));
    }

    #[test]
    fn completed_is_the_only_terminal() {
        assert!(Completed.is_terminal());
        assert!(Completed.valid_transitions().is_empty());
        for state in [
            Initial,
            Receiving,
            ProcessingAudio,
            ProcessingPhotos,
            Validating,
            ReadyToPublish,
            AwaitingApproval,
            Publishing,
            Error,
        ] {
            assert!(!state.is_terminal(), "{:?} should not be terminal", state);
        }
    }

    #[test]
    fn same_state_transition_is_allowed_except_completed() {
        assert!(Validating.can_transition_to(&Validating));
        assert!(Receiving.can_transition_to(&Receiving));
        assert!(!Completed.can_transition_to(&Completed));
    }

    #[test]
    fn transition_to_rejects_invalid_target() {
        let result = Publishing.transition_to(Receiving);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.message.contains("Publishing"));
        assert!(err.message.contains("Receiving"));
    }

    #[test]
    fn failed_publication_can_be_retried() {
        // Publication failure leaves the record in Publishing; a second
        // approval must be able to run.
        assert!(Publishing.can_transition_to(&AwaitingApproval));
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&ReadyToPublish).unwrap();
        assert_eq!(json, "\"ready_to_publish\"");
    }
}
