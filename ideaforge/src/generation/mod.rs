//! Text-generation capability: trait, request, and fragment types.
//!
//! The pipeline treats generation as an opaque external capability: a stage
//! hands over a role, instruction lines, and input text, and receives back a
//! finite stream of fragments.

mod gemini;
mod mock;

pub use gemini::GeminiGenerator;
pub use mock::{MockGenerator, RecordedCall};

use crate::errors::GenerationError;
use async_trait::async_trait;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// One incremental piece of generated text.
///
/// Fragments without a payload are ignored by the accumulator, not treated
/// as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Fragment {
    /// Creates a fragment carrying text.
    #[must_use]
    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }

    /// Creates a payload-less fragment.
    #[must_use]
    pub const fn empty() -> Self {
        Self { payload: None }
    }

    /// Returns true if the fragment carries no payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}

/// A finite stream of generated fragments.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<Fragment, GenerationError>> + Send>>;

/// A single generation call: role, instruction lines, input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The role the generator should assume.
    pub role: String,
    /// Instruction lines, in order.
    pub instructions: Vec<String>,
    /// The input text for this call.
    pub input: String,
}

impl GenerationRequest {
    /// Creates a new request with no instructions.
    #[must_use]
    pub fn new(role: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            instructions: Vec::new(),
            input: input.into(),
        }
    }

    /// Sets the instruction lines.
    #[must_use]
    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// The system prompt: the role followed by the instruction lines.
    #[must_use]
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.role.clone();
        for line in &self.instructions {
            prompt.push('\n');
            prompt.push_str(line);
        }
        prompt
    }
}

/// Trait for streaming text-generation backends.
///
/// Implementations start the call and return the fragment stream; consuming
/// it to completion is the caller's responsibility.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Starts a generation call and returns its fragment stream.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<FragmentStream, GenerationError>;
}
