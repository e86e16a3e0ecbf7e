//! Span definitions per operation: query, search, routing, enrichment, generation, lifecycle.

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($query_id:expr, $domain:expr) => {
        tracing::info_span!("tacit.query", query_id = %$query_id, domain = %$domain)
    };
}

/// Create a knowledge base search span.
#[macro_export]
macro_rules! search_span {
    ($domain:expr, $limit:expr) => {
        tracing::info_span!("tacit.search", domain = %$domain, limit = $limit)
    };
}

/// Create a routing span.
#[macro_export]
macro_rules! routing_span {
    ($policy:expr, $specialists:expr) => {
        tracing::info_span!("tacit.routing", policy = %$policy, specialists = $specialists)
    };
}

/// Create an enrichment span.
#[macro_export]
macro_rules! enrichment_span {
    ($stages:expr) => {
        tracing::info_span!("tacit.enrichment", stages = $stages)
    };
}

/// Create a generation provider span.
#[macro_export]
macro_rules! generation_span {
    ($provider:expr, $timeout_ms:expr) => {
        tracing::info_span!("tacit.generation", provider = %$provider, timeout_ms = $timeout_ms)
    };
}

/// Create a lifecycle span.
#[macro_export]
macro_rules! lifecycle_span {
    ($action:expr, $unit_id:expr) => {
        tracing::info_span!("tacit.lifecycle", action = %$action, unit_id = %$unit_id)
    };
}

pub mod names {
    pub const QUERY: &str = "tacit.query";
    pub const SEARCH: &str = "tacit.search";
    pub const ROUTING: &str = "tacit.routing";
    pub const ENRICHMENT: &str = "tacit.enrichment";
    pub const GENERATION: &str = "tacit.generation";
    pub const LIFECYCLE: &str = "tacit.lifecycle";
}

#[cfg(test)]
mod tests {
    #[test]
    fn spans_build_without_a_subscriber() {
        let span = crate::query_span!("q1", "diy");
        let _guard = span.enter();
        let _search = crate::search_span!("diy", 10usize);
        let _routing = crate::routing_span!("multi_specialist", 4usize);
        let _enrich = crate::enrichment_span!(3usize);
        let _gen = crate::generation_span!("mock", 2000u64);
        let _life = crate::lifecycle_span!("promote", "u1");
    }
}
