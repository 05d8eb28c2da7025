//! Search-box controller: turns input changes into lookups and owns the
//! result list that the window displays.
//!
//! Requests are never cancelled. With [`ResponseOrdering::Arrival`] every
//! successful response replaces the list when it arrives, so a slow response
//! to an older query can overwrite a newer one. [`ResponseOrdering::Latest`]
//! drops responses older than the last one applied.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{SearchBackend, SearchError, SearchFuture, SearchResult};
use crate::config::ResponseOrdering;
use crate::render::{self, ResultBlock};

/// Issue-order number of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Receives failed lookups
pub trait ErrorSink: Send + Sync {
    fn report(&self, query: &str, error: &SearchError);
}

/// Default sink: log and move on
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, query: &str, error: &SearchError) {
        tracing::warn!("Search for '{}' failed: {}", query, error);
    }
}

/// A request that has been issued but not yet applied
pub struct PendingSearch {
    pub id: RequestId,
    pub response: SearchFuture,
}

/// What `complete` did with a response
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result list was replaced
    Applied { count: usize },
    /// A newer response was already applied (only with `Latest` ordering)
    Stale,
    /// The lookup failed; the result list is unchanged
    Failed(SearchError),
    /// No such request is pending
    Unknown,
}

pub struct Controller {
    backend: Arc<dyn SearchBackend>,
    ordering: ResponseOrdering,
    sink: Box<dyn ErrorSink>,
    results: Vec<SearchResult>,
    next_id: u64,
    last_applied: Option<RequestId>,
    /// Pending request → query text
    pending: HashMap<RequestId, String>,
}

impl Controller {
    pub fn new(backend: Arc<dyn SearchBackend>, ordering: ResponseOrdering) -> Self {
        Self {
            backend,
            ordering,
            sink: Box::new(LogSink),
            results: Vec::new(),
            next_id: 0,
            last_applied: None,
            pending: HashMap::new(),
        }
    }

    /// Replace the default logging sink
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Issue a lookup for the current input text. The text is used as-is.
    pub fn search(&mut self, query: &str) -> PendingSearch {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        tracing::debug!(
            "search #{} via {}: query='{}', in flight={}",
            id.0,
            self.backend.name(),
            query,
            self.pending.len()
        );
        self.pending.insert(id, query.to_string());
        PendingSearch {
            id,
            response: self.backend.search(query),
        }
    }

    /// Apply a finished lookup
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<Vec<SearchResult>, SearchError>,
    ) -> Completion {
        let Some(query) = self.pending.remove(&id) else {
            tracing::debug!("complete: unknown request #{}", id.0);
            return Completion::Unknown;
        };

        match outcome {
            Ok(results) => {
                if self.ordering == ResponseOrdering::Latest
                    && self.last_applied.is_some_and(|last| id < last)
                {
                    tracing::debug!("Dropping stale response #{} for '{}'", id.0, query);
                    return Completion::Stale;
                }
                tracing::debug!("Applying #{} for '{}': {} results", id.0, query, results.len());
                let count = results.len();
                self.results = results;
                self.last_applied = Some(id);
                Completion::Applied { count }
            }
            Err(error) => {
                self.sink.report(&query, &error);
                Completion::Failed(error)
            }
        }
    }

    /// Records currently on display
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn blocks(&self) -> Vec<ResultBlock> {
        render::blocks(&self.results)
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn last_applied(&self) -> Option<RequestId> {
        self.last_applied
    }

    /// Most recently issued request, whether or not it has completed
    pub fn last_issued(&self) -> Option<RequestId> {
        (self.next_id > 0).then_some(RequestId(self.next_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::oneshot;

    use super::*;
    use crate::backend::decode_results;

    type Reply = Result<Vec<SearchResult>, SearchError>;

    /// Backend whose responses are released by the test, one channel per call
    #[derive(Default)]
    struct ScriptedBackend {
        queries: Mutex<Vec<String>>,
        replies: Mutex<Vec<oneshot::Sender<Reply>>>,
    }

    impl ScriptedBackend {
        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }

        fn take_reply(&self, index: usize) -> oneshot::Sender<Reply> {
            let mut replies = self.replies.lock().unwrap();
            let (tx, _) = oneshot::channel();
            std::mem::replace(&mut replies[index], tx)
        }
    }

    impl SearchBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn search(&self, query: &str) -> SearchFuture {
            self.queries.lock().unwrap().push(query.to_string());
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push(tx);
            Box::pin(async move {
                rx.await
                    .unwrap_or_else(|_| Err(SearchError::Network("dropped".into())))
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<(String, SearchError)>>>);

    impl ErrorSink for RecordingSink {
        fn report(&self, query: &str, error: &SearchError) {
            self.0.lock().unwrap().push((query.to_string(), error.clone()));
        }
    }

    fn controller(ordering: ResponseOrdering) -> (Controller, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::default());
        (Controller::new(backend.clone(), ordering), backend)
    }

    fn results(names: &[&str]) -> Vec<SearchResult> {
        names.iter().map(|n| SearchResult::new(*n, "1")).collect()
    }

    fn headings(controller: &Controller) -> Vec<String> {
        controller.blocks().into_iter().map(|b| b.heading).collect()
    }

    #[test]
    fn each_search_issues_one_request_with_verbatim_text() {
        let (mut controller, backend) = controller(ResponseOrdering::Arrival);
        for text in ["a", "ab", " ab ", "", "a&b"] {
            controller.search(text);
        }
        assert_eq!(backend.queries(), vec!["a", "ab", " ab ", "", "a&b"]);
        assert_eq!(controller.in_flight(), 5);
    }

    #[test]
    fn renders_response_in_order() {
        let (mut controller, _backend) = controller(ResponseOrdering::Arrival);
        let pending = controller.search("x");
        let body = decode_results(br#"[{"name":"A","price":"1"},{"name":"B","price":"2"}]"#);

        assert_eq!(
            controller.complete(pending.id, body),
            Completion::Applied { count: 2 }
        );
        let blocks = controller.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].heading.as_str(), blocks[0].body.as_str()), ("A", "1"));
        assert_eq!((blocks[1].heading.as_str(), blocks[1].body.as_str()), ("B", "2"));
    }

    #[test]
    fn empty_response_clears_previous_results() {
        let (mut controller, _backend) = controller(ResponseOrdering::Arrival);
        let first = controller.search("lamp");
        controller.complete(first.id, Ok(results(&["Lamp"])));
        assert_eq!(controller.results().len(), 1);

        let second = controller.search("lampx");
        controller.complete(second.id, decode_results(b"[]"));
        assert!(controller.results().is_empty());
        assert!(controller.blocks().is_empty());
    }

    #[test]
    fn same_response_renders_identically() {
        let (mut controller, _backend) = controller(ResponseOrdering::Arrival);
        let first = controller.search("a");
        controller.complete(first.id, Ok(results(&["A", "B"])));
        let before = controller.blocks();

        let second = controller.search("a");
        controller.complete(second.id, Ok(results(&["A", "B"])));
        assert_eq!(controller.blocks(), before);
    }

    #[test]
    fn missing_price_does_not_fail() {
        let (mut controller, _backend) = controller(ResponseOrdering::Arrival);
        let pending = controller.search("a");
        let completion = controller.complete(pending.id, decode_results(br#"[{"name":"A"}]"#));

        assert_eq!(completion, Completion::Applied { count: 1 });
        assert_eq!(controller.blocks()[0].body, "");
    }

    #[test]
    fn failure_keeps_results_and_reaches_sink() {
        let sink = RecordingSink::default();
        let backend = Arc::new(ScriptedBackend::default());
        let mut controller =
            Controller::new(backend, ResponseOrdering::Arrival).with_error_sink(sink.clone());

        let first = controller.search("lamp");
        controller.complete(first.id, Ok(results(&["Lamp"])));

        let second = controller.search("lamps");
        let error = SearchError::Decode("expected value at line 1 column 1".into());
        assert_eq!(
            controller.complete(second.id, Err(error.clone())),
            Completion::Failed(error.clone())
        );

        assert_eq!(headings(&controller), vec!["Lamp"]);
        assert_eq!(*sink.0.lock().unwrap(), vec![("lamps".to_string(), error)]);
    }

    #[test]
    fn unknown_or_repeated_completion_is_ignored() {
        let (mut controller, _backend) = controller(ResponseOrdering::Arrival);
        let pending = controller.search("a");
        controller.complete(pending.id, Ok(results(&["A"])));

        assert_eq!(
            controller.complete(pending.id, Ok(results(&["B"]))),
            Completion::Unknown
        );
        assert_eq!(headings(&controller), vec!["A"]);
    }

    #[test]
    fn latest_ordering_drops_stale_responses() {
        let (mut controller, _backend) = controller(ResponseOrdering::Latest);
        let r1 = controller.search("a");
        let r2 = controller.search("ab");

        controller.complete(r2.id, Ok(results(&["AB"])));
        assert_eq!(controller.complete(r1.id, Ok(results(&["A"]))), Completion::Stale);
        assert_eq!(headings(&controller), vec!["AB"]);
        assert_eq!(controller.last_applied(), Some(r2.id));
    }

    /// Both requests are in flight; the later one resolves first.
    #[tokio::test]
    async fn arrival_order_wins_over_issue_order() {
        let (mut controller, backend) = controller(ResponseOrdering::Arrival);
        let r1 = controller.search("a");
        let r2 = controller.search("ab");
        assert_eq!(backend.queries(), vec!["a", "ab"]);

        backend.take_reply(1).send(Ok(results(&["AB"]))).unwrap();
        let outcome = r2.response.await;
        controller.complete(r2.id, outcome);
        assert_eq!(headings(&controller), vec!["AB"]);

        backend.take_reply(0).send(Ok(results(&["A", "AA"]))).unwrap();
        let outcome = r1.response.await;
        controller.complete(r1.id, outcome);
        assert_eq!(headings(&controller), vec!["A", "AA"]);
        assert_eq!(controller.in_flight(), 0);
    }
}
