/// Tacit system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag carried by every unit awaiting review.
pub const TAG_CANDIDATE: &str = "candidate";

/// Tag carried by every unit produced by generation fallback.
pub const TAG_GENERATED: &str = "generated";

/// Maximum accepted query length in characters.
pub const MAX_QUERY_CHARS: usize = 4_096;

/// Maximum characters of the origin query used as a generated unit's name.
pub const GENERATED_NAME_MAX_CHARS: usize = 80;

/// Component name used in degradation events for the embedding encoder.
pub const COMPONENT_ENCODER: &str = "encoder";

/// Component name used in degradation events for the generation provider.
pub const COMPONENT_GENERATION: &str = "generation";
