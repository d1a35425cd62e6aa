//! Query pipeline implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::KnowledgeEngine;
use crate::models::{DisplayEntry, Pod, Query, QueryResult};

use super::types::SubmitError;

/// Sends questions to a knowledge engine and flattens the answers.
///
/// Built once at startup and shared by handle; it holds no per-query state.
pub struct QueryPipeline {
    engine: Arc<dyn KnowledgeEngine>,
}

impl QueryPipeline {
    /// Creates a new `QueryPipeline` backed by the given engine.
    #[must_use]
    pub fn new(engine: Arc<dyn KnowledgeEngine>) -> Self {
        Self { engine }
    }

    /// Submits a question and returns one display entry per valid pod.
    ///
    /// Entries come back in pod order. Callers that keep a most-recent-first
    /// list should insert them with `DisplayList::prepend_all`.
    ///
    /// # Errors
    ///
    /// - `SubmitError::EmptyQuestion` for a blank question (nothing is sent)
    /// - `SubmitError::Transport` if the call fails or the engine reports an error
    /// - `SubmitError::Unrecognized` if the engine could not interpret the question
    pub fn submit(&self, question: &str) -> Result<Vec<DisplayEntry>, SubmitError> {
        let query = Query::new(question);
        if query.is_blank() {
            return Err(SubmitError::EmptyQuestion);
        }

        let result = self.engine.perform_query(&query).map_err(|e| {
            warn!(error = %e, "query failed");
            SubmitError::transport(e.to_string())
        })?;

        let entries = classify(result)?;
        info!(input = query.input(), entries = entries.len(), "query answered");
        Ok(entries)
    }
}

/// Interprets an engine result, flattening it on success.
///
/// The error flag is checked before the success flag; a result that is
/// neither errored nor successful was not understood.
///
/// # Examples
///
/// ```
/// use voiceassist::pipeline::{SubmitError, classify};
/// use voiceassist::{DisplayEntry, PodBuilder, QueryResult};
///
/// let result = QueryResult::success(vec![PodBuilder::new().title("Result").text("42").build()]);
/// assert_eq!(classify(result), Ok(vec![DisplayEntry::new("Result", "42")]));
///
/// assert_eq!(classify(QueryResult::not_understood()), Err(SubmitError::Unrecognized));
/// ```
pub fn classify(result: QueryResult) -> Result<Vec<DisplayEntry>, SubmitError> {
    if result.is_error {
        let message = result.error_message.unwrap_or_default();
        warn!(message = %message, "engine reported an error");
        return Err(SubmitError::transport(message));
    }

    if !result.is_success {
        debug!("engine did not understand the question");
        return Err(SubmitError::Unrecognized);
    }

    debug!(
        pods = result.pods.len(),
        valid = result.valid_pod_count(),
        "flattening pods"
    );
    Ok(flatten_pods(&result.pods))
}

/// Flattens pods into display entries, skipping pods flagged as errored.
pub fn flatten_pods(pods: &[Pod]) -> Vec<DisplayEntry> {
    pods.iter()
        .filter(|pod| {
            if pod.is_error {
                debug!(title = pod.title(), "skipping errored pod");
            }
            !pod.is_error
        })
        .map(DisplayEntry::from_pod)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use crate::models::{ContentElement, Image, PodBuilder, Subpod};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine that answers every query with the same canned result.
    struct CannedEngine {
        result: QueryResult,
        calls: AtomicUsize,
    }

    impl CannedEngine {
        fn new(result: QueryResult) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl KnowledgeEngine for CannedEngine {
        fn perform_query(&self, _query: &Query) -> Result<QueryResult, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    struct FailingEngine;

    impl KnowledgeEngine for FailingEngine {
        fn perform_query(&self, _query: &Query) -> Result<QueryResult, EngineError> {
            Err(EngineError::Http { status: 503 })
        }
    }

    #[test]
    fn single_text_pod_becomes_single_entry() {
        let engine = CannedEngine::new(QueryResult::success(vec![
            PodBuilder::new()
                .title("Result")
                .subpod(Subpod::new(vec![ContentElement::plain_text("42")]))
                .build(),
        ]));
        let pipeline = QueryPipeline::new(engine.clone());

        let entries = pipeline.submit("6 * 7").unwrap();
        assert_eq!(entries, vec![DisplayEntry::new("Result", "42")]);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn engine_error_becomes_transport_with_engine_message() {
        let engine = CannedEngine::new(QueryResult::error("Invalid input"));
        let pipeline = QueryPipeline::new(engine);

        assert_eq!(
            pipeline.submit("???"),
            Err(SubmitError::Transport {
                message: "Invalid input".to_string()
            })
        );
    }

    #[test]
    fn error_flag_wins_over_success_flag() {
        let mut result = QueryResult::success(vec![PodBuilder::new().title("A").text("a").build()]);
        result.is_error = true;
        result.error_message = Some("partial failure".to_string());

        assert_eq!(
            classify(result),
            Err(SubmitError::transport("partial failure"))
        );
    }

    #[test]
    fn engine_error_without_message_uses_fallback() {
        let mut result = QueryResult::error("");
        result.error_message = None;

        assert_eq!(classify(result), Err(SubmitError::transport("")));
    }

    #[test]
    fn not_understood_becomes_unrecognized() {
        let pipeline = QueryPipeline::new(CannedEngine::new(QueryResult::not_understood()));
        assert_eq!(pipeline.submit("blorp"), Err(SubmitError::Unrecognized));
    }

    #[test]
    fn transport_failure_carries_error_display() {
        let pipeline = QueryPipeline::new(Arc::new(FailingEngine));
        assert_eq!(
            pipeline.submit("pi"),
            Err(SubmitError::Transport {
                message: "HTTP error: status 503".to_string()
            })
        );
    }

    #[test]
    fn blank_question_is_rejected_without_calling_engine() {
        let engine = CannedEngine::new(QueryResult::not_understood());
        let pipeline = QueryPipeline::new(engine.clone());

        assert_eq!(pipeline.submit("   "), Err(SubmitError::EmptyQuestion));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn flatten_skips_errored_pods() {
        let pods = vec![
            PodBuilder::new().title("Input").text("pi").build(),
            PodBuilder::new().title("Broken").error(true).text("x").build(),
            PodBuilder::new().title("Decimal").text("3.14").build(),
        ];

        let entries = flatten_pods(&pods);
        let titles: Vec<&str> = entries.iter().map(DisplayEntry::title).collect();
        assert_eq!(titles, vec!["Input", "Decimal"]);
    }

    #[test]
    fn flatten_keeps_pods_without_text() {
        let pods = vec![
            PodBuilder::new()
                .title("Plot")
                .subpod(Subpod::new(vec![ContentElement::Image(Image::default())]))
                .build(),
        ];

        assert_eq!(flatten_pods(&pods), vec![DisplayEntry::new("Plot", "")]);
    }

    #[test]
    fn entry_count_matches_valid_pod_count() {
        let result = QueryResult::success(vec![
            PodBuilder::new().title("Input").text("pi").build(),
            PodBuilder::new().title("Broken").error(true).build(),
            PodBuilder::new().title("Plot").build(),
            PodBuilder::new().title("Decimal").text("3.14").build(),
        ]);
        let valid = result.valid_pod_count();

        let entries = classify(result).unwrap();
        assert_eq!(valid, 3);
        assert_eq!(entries.len(), valid);
    }

    #[test]
    fn successful_result_with_no_pods_yields_no_entries() {
        assert_eq!(classify(QueryResult::success(vec![])), Ok(vec![]));
    }
}
