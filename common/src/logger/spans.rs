use tracing::Span;

use super::TraceId;

/// Root span for one polling pass over the tracked set.
pub fn poll_span(trace_id: &TraceId) -> Span {
    tracing::info_span!("poll", trace_id = %trace_id)
}

/// Child span for the evaluation of a single token within a pass.
pub fn token_span(token_id: &str) -> Span {
    tracing::info_span!("token", token = %token_id)
}
