pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod tui;
pub mod utils;

pub use config::{AppConfig, ConfigError};
pub use engine::{EngineError, KnowledgeEngine, WolframClient, WolframClientBuilder};
pub use models::{
    ContentElement, DisplayEntry, DisplayList, Image, Pod, PodBuilder, Query, QueryResult, Sound,
    Subpod,
};
pub use pipeline::{CancelToken, Completion, Dispatcher, QueryPipeline, Submission, SubmitError};
