//! Background dispatch of submissions with channel-based delivery.
//!
//! Each submission runs on its own worker thread. Results travel back over an
//! `mpsc` channel and are drained by the owner of the `Dispatcher` (the UI
//! event loop), so display state is only ever mutated on that thread.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::query_pipeline::QueryPipeline;
use super::types::{Completion, SubmissionId};

/// Cancellation flag shared between a submission handle and its worker.
///
/// Cancelling does not interrupt the remote call; it only stops the
/// completion from being delivered.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to an outstanding background submission.
#[derive(Debug, Clone)]
pub struct Submission {
    id: SubmissionId,
    question: String,
    token: CancelToken,
}

impl Submission {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Cancels the submission; its completion will be discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Runs submissions off the calling thread and collects their completions.
///
/// There is no queue and no cap: every dispatched question proceeds
/// independently of the others.
pub struct Dispatcher {
    pipeline: Arc<QueryPipeline>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    next_id: SubmissionId,
}

impl Dispatcher {
    /// Creates a dispatcher for the given pipeline.
    pub fn new(pipeline: Arc<QueryPipeline>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            pipeline,
            sender,
            receiver,
            next_id: 1,
        }
    }

    /// Starts a background submission and returns its handle immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn dispatch(&mut self, question: impl Into<String>) -> io::Result<Submission> {
        let id = self.next_id;
        self.next_id += 1;

        let submission = Submission {
            id,
            question: question.into(),
            token: CancelToken::new(),
        };

        let pipeline = Arc::clone(&self.pipeline);
        let sender = self.sender.clone();
        let token = submission.token.clone();
        let question = submission.question.clone();

        thread::Builder::new()
            .name(format!("query-{id}"))
            .spawn(move || {
                let outcome = pipeline.submit(&question);
                if token.is_cancelled() {
                    debug!(id, "discarding cancelled submission");
                    return;
                }
                // The receiver is gone only when the dispatcher was dropped.
                let _ = sender.send(Completion {
                    id,
                    question,
                    outcome,
                });
            })?;

        debug!(id, "submission dispatched");
        Ok(submission)
    }

    /// Drains every completion that has arrived, without blocking.
    ///
    /// Call this from the thread that owns the display state.
    pub fn try_completions(&self) -> Vec<Completion> {
        self.receiver.try_iter().collect()
    }

    /// Waits up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, KnowledgeEngine};
    use crate::models::{DisplayEntry, PodBuilder, Query, QueryResult};

    /// Engine that echoes the question back as a single pod.
    struct EchoEngine;

    impl KnowledgeEngine for EchoEngine {
        fn perform_query(&self, query: &Query) -> Result<QueryResult, EngineError> {
            Ok(QueryResult::success(vec![
                PodBuilder::new().title("Echo").text(query.input()).build(),
            ]))
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(QueryPipeline::new(Arc::new(EchoEngine))))
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn dispatch_assigns_increasing_ids() {
        let mut dispatcher = dispatcher();
        let first = dispatcher.dispatch("a").unwrap();
        let second = dispatcher.dispatch("b").unwrap();

        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
        assert_eq!(second.question(), "b");
    }

    #[test]
    fn completion_is_delivered_over_channel() {
        let mut dispatcher = dispatcher();
        let submission = dispatcher.dispatch("hello").unwrap();

        let completion = dispatcher
            .recv_timeout(Duration::from_secs(5))
            .expect("completion should arrive");

        assert_eq!(completion.id, submission.id());
        assert_eq!(completion.question, "hello");
        assert_eq!(
            completion.outcome,
            Ok(vec![DisplayEntry::new("Echo", "hello")])
        );
    }

    #[test]
    fn try_completions_is_empty_when_nothing_dispatched() {
        let dispatcher = dispatcher();
        assert!(dispatcher.try_completions().is_empty());
        assert!(dispatcher.recv_timeout(Duration::from_millis(10)).is_none());
    }
}
