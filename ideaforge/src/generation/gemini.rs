//! Streaming client for the Gemini `streamGenerateContent` API.
//!
//! Responses arrive as server-sent events; each `data:` payload carries a
//! JSON chunk whose candidate text parts become fragments. Chunks without
//! text (safety annotations, usage metadata) become payload-less fragments.

use super::{Fragment, FragmentStream, GenerationRequest, TextGenerator};
use crate::config::GeneratorConfig;
use crate::errors::GenerationError;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;
use tracing::debug;

/// Streaming text generator backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
    api_key: String,
}

impl GeminiGenerator {
    /// Creates a new generator with the given configuration and API key.
    pub fn new(
        config: GeneratorConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(request: &GenerationRequest) -> serde_json::Value {
        json!({
            "system_instruction": {
                "parts": [{ "text": request.system_prompt() }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.input }]
            }]
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<FragmentStream, GenerationError> {
        debug!(model = %self.config.model, "starting generation call");

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::api(status.as_u16(), message));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(sse_fragment_stream(body))
    }
}

/// Converts a raw SSE byte stream into a fragment stream.
fn sse_fragment_stream<S>(body: S) -> FragmentStream
where
    S: futures::Stream<Item = Result<Vec<u8>, reqwest::Error>> + Send + Unpin + 'static,
{
    let state = SseState {
        body,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((parse_event(&event), state));
            }
            if state.done {
                return None;
            }
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    state.decoder.push(&chunk);
                    state.pending.extend(state.decoder.drain_events());
                }
                Some(Err(err)) => {
                    state.done = true;
                    return Some((Err(GenerationError::Http(err)), state));
                }
                None => state.done = true,
            }
        }
    }))
}

struct SseState<S> {
    body: S,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    done: bool,
}

/// Incremental SSE line decoder.
///
/// Network chunks split events at arbitrary byte positions; the decoder
/// buffers until complete lines are available and yields `data:` payloads.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
    }

    fn drain_events(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() && data != "[DONE]" {
                    events.push(data.to_string());
                }
            }
        }
        events
    }
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Parses one SSE `data:` payload into a fragment.
fn parse_event(data: &str) -> Result<Fragment, GenerationError> {
    let event: StreamEvent = serde_json::from_str(data)
        .map_err(|err| GenerationError::MalformedEvent(err.to_string()))?;

    let mut text = String::new();
    for candidate in event.candidates {
        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(piece) = part.text {
                    text.push_str(&piece);
                }
            }
        }
    }

    if text.is_empty() {
        Ok(Fragment::empty())
    } else {
        Ok(Fragment::text(text))
    }
}
