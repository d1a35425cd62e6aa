//! Outcome types for query submissions.

use thiserror::Error;

use crate::models::DisplayEntry;

/// Shown when a failure carries no message of its own.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Shown inline when the engine could not interpret the question.
pub const UNRECOGNIZED_MESSAGE: &str = "Sorry, I don't understand the question";

/// Identifier assigned to each background submission.
pub type SubmissionId = u64;

/// Why a submission produced no display entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The call failed, or the engine reported an error. Shown as a notice.
    #[error("{message}")]
    Transport { message: String },

    /// The engine understood the request but not the question. Shown inline.
    #[error("Sorry, I don't understand the question")]
    Unrecognized,

    /// Blank questions are rejected before anything is sent.
    #[error("Question cannot be empty")]
    EmptyQuestion,
}

impl SubmitError {
    /// Creates a transport error, substituting `FALLBACK_MESSAGE` for a blank message.
    ///
    /// # Examples
    ///
    /// ```
    /// use voiceassist::pipeline::{FALLBACK_MESSAGE, SubmitError};
    ///
    /// let err = SubmitError::transport("");
    /// assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    ///
    /// let err = SubmitError::transport("Invalid input");
    /// assert_eq!(err.to_string(), "Invalid input");
    /// ```
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        Self::Transport { message }
    }

    /// Returns true if the failure was caused by the question itself.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Unrecognized | Self::EmptyQuestion)
    }
}

/// A finished background submission, delivered to the thread that owns the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: SubmissionId,
    pub question: String,
    pub outcome: Result<Vec<DisplayEntry>, SubmitError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_whitespace_message_uses_fallback() {
        assert_eq!(
            SubmitError::transport(" \n"),
            SubmitError::Transport {
                message: FALLBACK_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn unrecognized_display() {
        assert_eq!(SubmitError::Unrecognized.to_string(), UNRECOGNIZED_MESSAGE);
    }

    #[test]
    fn input_errors_are_distinguished_from_transport() {
        assert!(SubmitError::Unrecognized.is_input_error());
        assert!(SubmitError::EmptyQuestion.is_input_error());
        assert!(!SubmitError::transport("boom").is_input_error());
    }
}
