use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("runtime channel closed")]
    ChannelClosed,

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("unknown {what}: {value:?}")]
    Unknown { what: &'static str, value: String },

    #[error("malformed command: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
