use serde::{Deserialize, Serialize};

use super::Pod;

/// A single question sent to the knowledge engine.
///
/// Queries are ephemeral: one is built per submission and dropped once the
/// engine has answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The user's question, exactly as typed.
    pub input: String,
}

impl Query {
    /// Creates a query wrapping the given question.
    ///
    /// # Examples
    ///
    /// ```
    /// use voiceassist::Query;
    ///
    /// let query = Query::new("distance to the moon");
    /// assert_eq!(query.input(), "distance to the moon");
    /// assert!(!query.is_blank());
    /// ```
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the question text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns true if the question is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }
}

/// The engine's answer to a query that made it across the transport.
///
/// `is_error` and `is_success` are independent flags reported by the engine:
/// an errored result carries a message, and a result that is neither errored
/// nor successful means the engine could not interpret the question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The engine flagged the request itself as invalid.
    pub is_error: bool,
    /// Message accompanying `is_error`, if the engine supplied one.
    pub error_message: Option<String>,
    /// The engine understood the question and produced pods.
    pub is_success: bool,
    /// Answer pods in the order the engine returned them.
    pub pods: Vec<Pod>,
    /// Server-side evaluation time in seconds.
    pub timing: Option<f64>,
    /// Comma-separated data types the engine recognised in the input.
    pub data_types: Option<String>,
}

impl QueryResult {
    /// Creates a successful result carrying the given pods.
    pub fn success(pods: Vec<Pod>) -> Self {
        Self {
            is_success: true,
            pods,
            ..Self::default()
        }
    }

    /// Creates a result the engine flagged as an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Creates a result for a question the engine could not interpret.
    pub fn not_understood() -> Self {
        Self::default()
    }

    /// Returns the error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the number of pods not flagged as errored.
    pub fn valid_pod_count(&self) -> usize {
        self.pods.iter().filter(|pod| !pod.is_error).count()
    }
}
