use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to serialize message: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("invalid address in CIDR '{entry}'")]
    InvalidAddress { entry: String },
    #[error("invalid prefix in CIDR '{entry}'")]
    InvalidPrefix { entry: String },
}
