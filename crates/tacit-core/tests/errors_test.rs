use tacit_core::errors::*;

#[test]
fn unit_not_found_carries_id() {
    let err = TacitError::UnitNotFound {
        id: "abc-123".into(),
    };
    assert!(err.to_string().contains("abc-123"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn degraded_search_carries_component_and_fallback() {
    let err = TacitError::DegradedSearch {
        component: "encoder".into(),
        fallback: "lexical".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("encoder"));
    assert!(msg.contains("lexical"));
    assert!(err.is_recoverable());
}

// --- From impls ---

#[test]
fn storage_error_converts_to_tacit_error() {
    let err: TacitError = StorageError::SqliteError {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, TacitError::Storage(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn provider_timeout_is_recoverable() {
    let err: TacitError = ProviderError::Timeout {
        provider: "openrouter".into(),
        timeout_ms: 500,
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::ProviderTimeout);
    assert!(err.is_recoverable());
    assert!(!err.is_fatal_for_domain());
}

#[test]
fn provider_failure_is_recoverable() {
    let err: TacitError = ProviderError::Failure {
        provider: "mock".into(),
        reason: "empty".into(),
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::ProviderFailure);
    assert!(err.is_recoverable());
}

#[test]
fn dimension_mismatch_is_fatal() {
    let err: TacitError = EmbeddingError::DimensionMismatch {
        expected: 384,
        actual: 128,
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    assert!(err.is_fatal_for_domain());
    assert!(!err.is_recoverable());
}

#[test]
fn config_error_is_fatal() {
    let err: TacitError = ConfigError::MalformedStage {
        stage: "generation_fallback".into(),
        reason: "no provider".into(),
    }
    .into();
    assert!(err.is_fatal_for_domain());
}

#[test]
fn validation_is_neither_recoverable_nor_fatal() {
    let err = TacitError::validation("empty query");
    assert!(!err.is_recoverable());
    assert!(!err.is_fatal_for_domain());
}

#[test]
fn error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorKind::ProviderTimeout).unwrap();
    assert_eq!(json, "\"provider_timeout\"");
}
