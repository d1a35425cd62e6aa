/// Knowledge engine client module.
///
/// This module provides the `KnowledgeEngine` seam the query pipeline depends on,
/// and a blocking HTTP implementation for the Wolfram|Alpha Full Results API.
mod client;
mod wire;

pub use client::{
    DEFAULT_BASE_URL, EngineError, KnowledgeEngine, WolframClient, WolframClientBuilder,
};
pub use wire::decode_query_result;
