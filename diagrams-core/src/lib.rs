pub mod config;
pub mod error;
pub mod feed;
pub mod frame;
pub mod host;
pub mod registry;
pub mod value_handler;

pub use config::{ChannelSpec, DiagramConfig, Layout};
pub use error::{ConfigError, FeedError, FrameError};
pub use frame::{DiagramFrame, DiagramKind, FrameState, PlotName, PlotView};
pub use host::{DiagramHost, PollOutcome};
pub use registry::{FrameRegistry, OpenOutcome, UpdateReport};
pub use value_handler::ValueHandler;
