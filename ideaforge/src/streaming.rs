//! Streaming accumulation of generation fragments.

use crate::errors::GenerationError;
use crate::generation::FragmentStream;
use crate::progress::ProgressSink;
use crate::stages::StageName;
use futures::StreamExt;
use std::time::Duration;

/// Consumes a fragment stream to completion, returning the assembled text.
///
/// The sink is notified after every payload-carrying fragment with the delta
/// and the text assembled so far; fragments without a payload are skipped.
/// An error item aborts accumulation and fails the stage. `pacing` inserts a
/// fixed delay between fragments; it is cosmetic only and `Duration::ZERO`
/// disables it.
pub async fn accumulate(
    stage: StageName,
    mut fragments: FragmentStream,
    sink: &dyn ProgressSink,
    pacing: Duration,
) -> Result<String, GenerationError> {
    let mut assembled = String::new();

    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        if let Some(payload) = fragment.payload {
            assembled.push_str(&payload);
            sink.fragment(stage, &payload, &assembled);
        }
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }

    Ok(assembled)
}
