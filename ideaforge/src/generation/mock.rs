//! Mock generator for tests and offline runs.

use super::{Fragment, FragmentStream, GenerationRequest, TextGenerator};
use crate::errors::GenerationError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One recorded generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Zero-based position in the global call order.
    pub order: usize,
    /// The role of the request.
    pub role: String,
    /// The input text of the request.
    pub input: String,
}

/// Scripted mock generator.
///
/// Responses are served in call order and split into word fragments. In echo
/// mode the response is the request input itself, which makes wiring between
/// stages observable. A scripted failure position aborts that call before
/// any fragment is produced.
#[derive(Debug)]
pub struct MockGenerator {
    responses: Vec<String>,
    echo_mode: bool,
    fail_at: Option<usize>,
    call_count: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    /// Creates a mock that serves the given responses in call order.
    #[must_use]
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            echo_mode: false,
            fail_at: None,
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that echoes each request's input back as its response.
    #[must_use]
    pub fn echo() -> Self {
        Self {
            responses: Vec::new(),
            echo_mode: true,
            fail_at: None,
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Scripts a failure at the given zero-based call position.
    #[must_use]
    pub fn with_failure_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Returns the number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Returns all recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Resets the call counter and the recorded calls.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.calls.lock().clear();
    }

    /// Splits a response into word-sized fragments, keeping whitespace.
    fn fragments_for(text: &str) -> Vec<Fragment> {
        text.split_inclusive(' ').map(Fragment::text).collect()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<FragmentStream, GenerationError> {
        let order = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(RecordedCall {
            order,
            role: request.role.clone(),
            input: request.input.clone(),
        });

        if self.fail_at == Some(order) {
            return Err(GenerationError::Scripted(format!(
                "scripted failure at call {order}"
            )));
        }

        let text = if self.echo_mode {
            request.input
        } else {
            self.responses.get(order).cloned().unwrap_or_default()
        };

        let fragments: Vec<Result<Fragment, GenerationError>> =
            Self::fragments_for(&text).into_iter().map(Ok).collect();

        Ok(Box::pin(futures::stream::iter(fragments)))
    }
}
