use crate::frame::{FrameState, PlotName};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("frame {name} is {state}")]
    InvalidState { name: PlotName, state: FrameState },
    #[error("frame {0} is already initialized")]
    AlreadyInitialized(PlotName),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported layout format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid layout: {0}")]
    Invalid(String),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedError {
    #[error("producer disconnected")]
    Disconnected,
}
