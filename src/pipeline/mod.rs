//! Question answering over the knowledge engine.
//!
//! This module provides the `QueryPipeline`, which sends one question to a
//! `KnowledgeEngine` and flattens the answer pods into display entries, and
//! the `Dispatcher`, which runs submissions off the UI thread and hands their
//! completions back over a channel.

mod dispatch;
mod query_pipeline;
mod types;

pub use dispatch::{CancelToken, Dispatcher, Submission};
pub use query_pipeline::{QueryPipeline, classify, flatten_pods};
pub use types::{Completion, FALLBACK_MESSAGE, SubmissionId, SubmitError, UNRECOGNIZED_MESSAGE};
