//! Default values for every configuration section.

// Storage
pub const DEFAULT_DB_PATH: &str = "tacit.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// Embedding
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "tfidf";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_TOKEN_BUDGET: usize = 256;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOCAL_FALLBACK: bool = true;

// Retrieval
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_MIN_SCORE: f64 = 0.0;

// Lifecycle
pub const DEFAULT_CERTIFICATION_THRESHOLD: f64 = 0.8;
pub const DEFAULT_CANDIDATE_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_DEDUP_SIMILARITY: f64 = 0.9;

// Generation
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_GENERATION_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_CONFIDENCE_CEILING: f64 = 0.7;
pub const DEFAULT_MAX_CONTEXT_UNITS: usize = 3;

// Formatting
pub const DEFAULT_FORMAT: &str = "markdown";
pub const DEFAULT_MAX_RENDERED_UNITS: usize = 3;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 50_000;
pub const DEFAULT_TRACE_RETENTION: usize = 10_000;
