pub mod degradation_event;
pub mod generation;
pub mod query;
pub mod result;
pub mod review;
pub mod search;
pub mod trace;

pub use degradation_event::DegradationEvent;
pub use generation::{
    DocumentReference, GeneratedAnswer, GenerationRequest, GenerationResponse, TokenUsage,
};
pub use query::{OutputFormat, QueryFlags, QueryRequest, QueryResponse, UnitScore};
pub use result::{Annotation, Citation, GenerationRecord, QueryResult};
pub use review::{PromotionRecommendation, Review, UnitDraft, UnitEdit};
pub use search::{ScoredUnit, SearchOutcome, SearchWeights};
pub use trace::{QueryTrace, TraceBuilder, TraceDetail, TraceError, TraceEvent, TraceStage};
