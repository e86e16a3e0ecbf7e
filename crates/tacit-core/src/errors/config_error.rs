/// Configuration errors. Always fatal for the affected domain.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("failed to read configuration file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed stage configuration for {stage}: {reason}")]
    MalformedStage { stage: String, reason: String },
}
