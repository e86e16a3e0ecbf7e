//! Structured log events for key pipeline operations.

/// Log a completed query.
pub fn query_completed(query_id: &str, domain: &str, latency_ms: u64, matched: usize, generated: bool) {
    tracing::info!(
        event = "query_completed",
        query_id = %query_id,
        domain = %domain,
        latency_ms = latency_ms,
        matched = matched,
        generated = generated,
        "query completed"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a domain halt after a fatal error.
pub fn domain_halted(domain: &str, cause: &str) {
    tracing::error!(
        event = "domain_halted",
        domain = %domain,
        cause = %cause,
        "domain halted"
    );
}
